//! JWT Verification
//!
//! Bearer tokens are verified with HS256 against the `JWT_SECRET`
//! environment variable. The subject claim carries the user id. Issuance is
//! the identity service's job; `issue_token` exists for tests and local
//! tooling and is not exposed over any route.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::shared::error::ChatError;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

/// Get JWT secret from environment
fn get_jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        tracing::warn!("[Auth] JWT_SECRET not set, using development default");
        "sitelink-dev-secret-change-in-production".to_string()
    })
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Create a JWT token for a user
///
/// Test/tooling helper only; production tokens come from the identity
/// service and are merely verified here.
pub fn issue_token(user_id: Uuid) -> Result<String, ChatError> {
    let now = unix_now();
    let claims = Claims {
        sub: user_id.to_string(),
        // 24 hours
        exp: now + 24 * 60 * 60,
        iat: now,
    };

    let key = EncodingKey::from_secret(get_jwt_secret().as_ref());
    encode(&Header::default(), &claims, &key)
        .map_err(|e| ChatError::authentication(format!("failed to encode token: {}", e)))
}

/// Verify signature and expiry, returning the decoded claims
pub fn verify_token(token: &str) -> Result<Claims, ChatError> {
    let key = DecodingKey::from_secret(get_jwt_secret().as_ref());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &key, &validation)
        .map_err(|e| ChatError::authentication(format!("invalid token: {}", e)))?;
    Ok(token_data.claims)
}

/// Verify a token and extract the user id from its subject claim
pub fn user_id_from_token(token: &str) -> Result<Uuid, ChatError> {
    let claims = verify_token(token)?;
    Uuid::parse_str(&claims.sub)
        .map_err(|e| ChatError::authentication(format!("invalid user id in token: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify_token() {
        let user_id = Uuid::new_v4();
        let token = issue_token(user_id).unwrap();
        assert!(!token.is_empty());

        let claims = verify_token(&token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_user_id_from_token() {
        let user_id = Uuid::new_v4();
        let token = issue_token(user_id).unwrap();
        assert_eq!(user_id_from_token(&token).unwrap(), user_id);
    }

    #[test]
    fn test_garbage_token_rejected() {
        let result = verify_token("not.a.token");
        assert!(matches!(result, Err(ChatError::Authentication { .. })));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let token = issue_token(Uuid::new_v4()).unwrap();
        let mut tampered = token.clone();
        tampered.pop();
        tampered.push(if token.ends_with('A') { 'B' } else { 'A' });
        assert!(verify_token(&tampered).is_err());
    }
}
