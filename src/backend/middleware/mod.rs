//! Request Middleware

/// Bearer token extraction for REST handlers
pub mod auth;

pub use auth::{AuthUser, AuthenticatedUser};
