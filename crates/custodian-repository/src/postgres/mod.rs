//! PostgreSQL repository implementations.

mod principal_repository;
mod role_repository;
mod rows;

pub use principal_repository::PgPrincipalRepository;
pub use role_repository::PgRoleRepository;
