//! Authentication Extractor
//!
//! `AuthUser` pulls the bearer token from the `Authorization` header,
//! verifies it, and hands the caller's user id to REST handlers. The socket
//! gateway runs its own extraction because it also accepts tokens in the
//! handshake payload and query string.

use axum::{extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use uuid::Uuid;

use crate::backend::auth::sessions::verify_token;
use crate::shared::error::ChatError;

/// Authenticated caller identity derived from the token's subject claim
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

/// Axum extractor for authenticated REST requests
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ChatError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| ChatError::authentication("missing Authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ChatError::authentication("expected a bearer token"))?;

        let claims = verify_token(token)?;
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ChatError::authentication("invalid user id in token"))?;

        Ok(AuthUser(AuthenticatedUser { user_id }))
    }
}
