//! Domain entities.
//!
//! Principals and roles share one lifecycle: created by the store, read
//! through the cache, patched sparsely, and soft deleted.

mod principal;
mod role;
mod status;

pub use principal::*;
pub use role::*;
pub use status::*;

/// Result of a soft delete against the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// A live row was marked deleted.
    Deleted,
    /// The row had already been soft deleted; nothing changed.
    AlreadyDeleted,
}

/// Returns `Some(value)` only for non-blank strings.
///
/// Sparse patches treat an empty string exactly like an absent field.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
