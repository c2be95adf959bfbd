//! Core traits shared across layers.

use async_trait::async_trait;
use std::fmt::Display;

/// An entity with a store-assigned identifier that can be cached by id.
pub trait Entity {
    /// Identifier type assigned by the record store.
    type Id: Copy + Display + Send + Sync;

    /// Stable, lowercase entity type name. Used in cache keys and errors.
    const KIND: &'static str;

    /// Human readable type name for error messages.
    const RESOURCE: &'static str;

    /// Returns the entity's unique identifier.
    fn id(&self) -> Self::Id;
}

/// Trait for health checks.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Returns the name of this health check.
    fn name(&self) -> &str;

    /// Performs the health check.
    async fn check(&self) -> HealthStatus;
}

/// Health check status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// The component is healthy.
    Healthy,
    /// The component is degraded but functional.
    Degraded(String),
    /// The component is unhealthy.
    Unhealthy(String),
}

impl HealthStatus {
    /// Returns true if the status is healthy.
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    /// Returns true if the status is unhealthy.
    #[must_use]
    pub const fn is_unhealthy(&self) -> bool {
        matches!(self, Self::Unhealthy(_))
    }

    /// Short label for reporting.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded(_) => "degraded",
            Self::Unhealthy(_) => "unhealthy",
        }
    }
}
