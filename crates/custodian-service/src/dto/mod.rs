//! Data Transfer Objects (DTOs).

mod principal_dto;
mod role_dto;

pub use principal_dto::*;
pub use role_dto::*;
