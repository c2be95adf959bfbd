//! Dependency wiring.
//!
//! Every component is built once at startup and shared behind an `Arc`. The
//! entity services receive their store, cache and TTL explicitly.

use custodian_config::AppConfig;
use custodian_core::{CustodianResult, HealthCheck};
use custodian_repository::{
    create_pool, DatabasePool, PgPrincipalRepository, PgRoleRepository, PrincipalRepository,
    RoleRepository,
};
use custodian_rest::AppState;
use custodian_security::PasswordHasher;
use custodian_service::{
    CacheInterface, PrincipalService, PrincipalServiceImpl, RedisCacheService, RoleService,
    RoleServiceImpl,
};
use std::sync::Arc;
use tracing::info_span;

/// The fully wired application graph.
pub struct AppModule {
    db_pool: Arc<DatabasePool>,
    cache: Arc<RedisCacheService>,
    principal_service: Arc<dyn PrincipalService>,
    role_service: Arc<dyn RoleService>,
}

impl AppModule {
    /// Wires the services over an already created pool and cache.
    #[must_use]
    pub fn from_parts(
        config: &AppConfig,
        db_pool: Arc<DatabasePool>,
        cache: Arc<RedisCacheService>,
    ) -> Self {
        let ttl = config.cache.ttl();
        let password_hasher = Arc::new(PasswordHasher::with_cost(
            config.security.password_hash_cost,
        ));

        let principal_repository: Arc<dyn PrincipalRepository> =
            Arc::new(PgPrincipalRepository::new(db_pool.clone()));
        let role_repository: Arc<dyn RoleRepository> =
            Arc::new(PgRoleRepository::new(db_pool.clone()));
        let shared_cache: Arc<dyn CacheInterface> = cache.clone();

        let principal_service: Arc<dyn PrincipalService> = Arc::new(PrincipalServiceImpl::new(
            principal_repository,
            password_hasher,
            shared_cache.clone(),
            ttl,
            info_span!("principal_service"),
        ));
        let role_service: Arc<dyn RoleService> = Arc::new(RoleServiceImpl::new(
            role_repository,
            shared_cache,
            ttl,
            info_span!("role_service"),
        ));

        Self {
            db_pool,
            cache,
            principal_service,
            role_service,
        }
    }

    #[must_use]
    pub fn database_pool(&self) -> Arc<DatabasePool> {
        self.db_pool.clone()
    }

    #[must_use]
    pub fn principal_service(&self) -> Arc<dyn PrincipalService> {
        self.principal_service.clone()
    }

    #[must_use]
    pub fn role_service(&self) -> Arc<dyn RoleService> {
        self.role_service.clone()
    }

    /// Builds the REST state, registering the store and the cache for
    /// readiness checks.
    #[must_use]
    pub fn app_state(&self, config: &AppConfig) -> AppState {
        let db_check: Arc<dyn HealthCheck> = self.db_pool.clone();
        let cache_check: Arc<dyn HealthCheck> = self.cache.clone();

        AppState::new(
            self.principal_service(),
            self.role_service(),
            config.server.request_timeout(),
        )
        .with_health_check(db_check)
        .with_health_check(cache_check)
    }
}

/// Connects to the backends described by `config` and wires the services.
///
/// Migrations are applied here when `database.run_migrations` is set.
pub async fn build_app_module(config: &AppConfig) -> CustodianResult<AppModule> {
    let db_pool = create_pool(&config.database).await?;
    if config.database.run_migrations {
        db_pool.run_migrations().await?;
    }

    let cache = Arc::new(RedisCacheService::from_config(&config.redis)?);

    Ok(AppModule::from_parts(config, db_pool, cache))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    fn lazy_pool(config: &AppConfig) -> Arc<DatabasePool> {
        let pool = PgPoolOptions::new()
            .connect_lazy(&config.database.url)
            .unwrap();
        Arc::new(DatabasePool::with_pool(pool))
    }

    #[tokio::test]
    async fn test_from_parts_registers_health_checks() {
        let config = AppConfig::default();
        let module = AppModule::from_parts(
            &config,
            lazy_pool(&config),
            Arc::new(RedisCacheService::disabled()),
        );

        let state = module.app_state(&config);
        let names: Vec<&str> = state.health_checks.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["database", "cache"]);
        assert_eq!(state.request_timeout, config.server.request_timeout());
    }

    #[tokio::test]
    async fn test_services_are_shared() {
        let config = AppConfig::default();
        let module = AppModule::from_parts(
            &config,
            lazy_pool(&config),
            Arc::new(RedisCacheService::disabled()),
        );

        assert!(Arc::ptr_eq(&module.role_service(), &module.role_service()));
        assert!(Arc::ptr_eq(
            &module.principal_service(),
            &module.principal_service()
        ));
    }
}
