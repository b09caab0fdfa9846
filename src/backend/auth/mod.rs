//! Authentication
//!
//! Token issuance lives in a sibling identity service; this crate only
//! consumes verification. `sessions` holds the JWT claims and verification,
//! `revocation` the fail-open revocation-check port.

/// Token revocation check port
pub mod revocation;

/// JWT claims and verification
pub mod sessions;

pub use revocation::{InMemoryRevocationList, RevocationCheck};
pub use sessions::{verify_token, Claims};
