//! Entity service implementations.
//!
//! Trait definitions live in the parent module (e.g. `role_service.rs`).

mod principal_service_impl;
mod role_service_impl;

pub use principal_service_impl::PrincipalServiceImpl;
pub use role_service_impl::RoleServiceImpl;
