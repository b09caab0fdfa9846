//! Token Revocation Check
//!
//! Port onto the external revocation store. The check fails open: when the
//! store is unreachable, a token is treated as not-revoked rather than
//! blocking every connection on an outage.

use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::RwLock;

use crate::shared::error::ChatError;

/// Revocation lookup for bearer tokens
#[async_trait]
pub trait RevocationCheck: Send + Sync {
    async fn is_revoked(&self, token: &str) -> Result<bool, ChatError>;
}

/// Consult the revocation check, treating errors as not-revoked
pub async fn is_revoked_fail_open(check: &dyn RevocationCheck, token: &str) -> bool {
    match check.is_revoked(token).await {
        Ok(revoked) => revoked,
        Err(e) => {
            tracing::warn!("[Auth] Revocation check failed, failing open: {}", e);
            false
        }
    }
}

/// In-memory revocation list for the dev server and tests
#[derive(Default)]
pub struct InMemoryRevocationList {
    revoked: RwLock<HashSet<String>>,
}

impl InMemoryRevocationList {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn revoke(&self, token: impl Into<String>) {
        self.revoked.write().await.insert(token.into());
    }
}

#[async_trait]
impl RevocationCheck for InMemoryRevocationList {
    async fn is_revoked(&self, token: &str) -> Result<bool, ChatError> {
        Ok(self.revoked.read().await.contains(token))
    }
}
