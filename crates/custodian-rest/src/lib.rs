//! # Custodian REST
//!
//! REST API layer using Axum.
//! Exposes principal and role management plus health endpoints.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
