//! Custom Axum extractors.

mod deadline;
mod validated;

pub use deadline::*;
pub use validated::*;
