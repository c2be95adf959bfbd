//! # Custodian Repository
//!
//! The record store: authoritative, durable storage for principals and roles.
//!
//! ```text
//! Entity service
//!   ↓  Arc<dyn PrincipalRepository> / Arc<dyn RoleRepository>
//! PgPrincipalRepository / PgRoleRepository
//!   ↓  DatabasePool (sqlx::PgPool)
//! PostgreSQL
//! ```
//!
//! The store owns id assignment, name uniqueness and soft deletion. Every
//! read filters out rows whose status is `deleted`.

pub mod pool;
pub mod postgres;
pub mod traits;

pub use pool::*;
pub use postgres::*;
pub use traits::*;
