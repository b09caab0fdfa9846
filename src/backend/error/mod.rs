//! Backend Error Handling
//!
//! The chat core shares one error taxonomy (`shared::error::ChatError`)
//! across the REST surface and the socket gateway. This module maps that
//! taxonomy onto HTTP responses for the REST handlers; the gateway instead
//! folds errors into `message:ack` frames.

/// HTTP conversion for `ChatError`
pub mod conversion;

pub use conversion::status_code;
