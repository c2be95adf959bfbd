//! # Custodian Core
//!
//! Core types, errors, and domain entities shared by every Custodian layer.
//! Nothing in here talks to a backend; the store and cache collaborators live
//! in `custodian-repository` and `custodian-service`.

pub mod context;
pub mod domain;
pub mod error;
pub mod id;
pub mod result;
pub mod traits;
pub mod validation;

pub use context::*;
pub use domain::*;
pub use error::*;
pub use id::*;
pub use result::*;
pub use traits::*;
pub use validation::*;
