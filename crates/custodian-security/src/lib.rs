//! # Custodian Security
//!
//! Credential hashing for principals. Secrets are never stored or cached in
//! plain text; only the Argon2 PHC string reaches the record store.

mod password;

pub use password::*;
