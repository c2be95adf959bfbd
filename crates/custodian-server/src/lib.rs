//! # Custodian Server Library
//!
//! Wiring for the Custodian server: builds the record store, the cache and
//! the entity services from configuration and hands them to the REST layer.

pub mod di;
pub mod startup;
