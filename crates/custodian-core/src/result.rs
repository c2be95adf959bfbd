//! Result type aliases for Custodian.

use crate::CustodianError;

/// A specialized `Result` type for Custodian operations.
pub type CustodianResult<T> = Result<T, CustodianError>;
