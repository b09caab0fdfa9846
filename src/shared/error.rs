//! Shared Error Types
//!
//! The error taxonomy used by every surface of the chat core. The directory,
//! the message store port, and the socket gateway all speak this enum, so a
//! failure reason produced deep in a rule check can be surfaced verbatim in
//! an HTTP response or a socket acknowledgement.
//!
//! # Error Categories
//!
//! - `Authentication` - bad/missing/expired token; terminal at connect time
//! - `PermissionDenied` - caller is not a participant, or role-insufficient
//! - `NotFound` - chat/message/project id does not exist
//! - `Validation` - title length, participant bounds, missing required field
//! - `StoreUnavailable` - transient persistence or pub/sub failure
//! - `Serialization` - malformed JSON at a boundary
//!
//! # Thread Safety
//!
//! All error types are `Send + Sync` and can be safely shared across thread
//! boundaries.

use thiserror::Error;

/// Errors produced by the chat directory, stores, and the socket gateway
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// Token missing, malformed, expired, or revoked
    #[error("Authentication failed: {reason}")]
    Authentication {
        /// Human-readable failure reason
        reason: String,
    },

    /// Actor lacks membership or the role required for the action
    #[error("Permission denied: {reason}")]
    PermissionDenied {
        /// Human-readable failure reason
        reason: String,
    },

    /// Referenced entity does not exist
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of entity that was looked up
        entity: &'static str,
        /// The identifier that failed to resolve
        id: String,
    },

    /// Input failed a boundary validation
    #[error("Validation error in '{field}': {message}")]
    Validation {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// Persistence or fanout bus is transiently unreachable
    #[error("Store unavailable: {reason}")]
    StoreUnavailable {
        /// Human-readable failure reason
        reason: String,
    },

    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Human-readable error message
        message: String,
    },
}

impl ChatError {
    /// Create a new authentication error
    pub fn authentication(reason: impl Into<String>) -> Self {
        Self::Authentication {
            reason: reason.into(),
        }
    }

    /// Create a new permission-denied error
    pub fn permission_denied(reason: impl Into<String>) -> Self {
        Self::PermissionDenied {
            reason: reason.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new store-unavailable error
    pub fn store_unavailable(reason: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            reason: reason.into(),
        }
    }

    /// True for failures that are deterministic and must never be retried
    pub fn is_permanent(&self) -> bool {
        !matches!(self, Self::StoreUnavailable { .. })
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: format!("JSON error: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_display() {
        let error = ChatError::permission_denied("not a participant of this chat");
        let display = format!("{}", error);
        assert!(display.contains("Permission denied"));
        assert!(display.contains("not a participant"));
    }

    #[test]
    fn test_not_found_carries_entity_and_id() {
        let error = ChatError::not_found("chat", "abc-123");
        match error {
            ChatError::NotFound { entity, id } => {
                assert_eq!(entity, "chat");
                assert_eq!(id, "abc-123");
            }
            _ => panic!("Expected NotFound"),
        }
    }

    #[test]
    fn test_validation_error() {
        let error = ChatError::validation("title", "title must not be empty");
        match error {
            ChatError::Validation { field, message } => {
                assert_eq!(field, "title");
                assert_eq!(message, "title must not be empty");
            }
            _ => panic!("Expected Validation"),
        }
    }

    #[test]
    fn test_from_serde_error() {
        let invalid_json = "{ invalid json }";
        let result: Result<serde_json::Value, _> = serde_json::from_str(invalid_json);
        let chat_error: ChatError = result.unwrap_err().into();
        match chat_error {
            ChatError::Serialization { .. } => {}
            _ => panic!("Expected Serialization from serde error"),
        }
    }

    #[test]
    fn test_permanence_classification() {
        assert!(ChatError::permission_denied("x").is_permanent());
        assert!(ChatError::not_found("chat", "y").is_permanent());
        assert!(!ChatError::store_unavailable("db down").is_permanent());
    }
}
