use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::CredentialService;
use crate::config::AppConfig;
use crate::database::{AccountStore, PgAccountStore, Repository};
use crate::services::AccountService;

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub credentials: Arc<CredentialService>,
    pub accounts: AccountService,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wires the Postgres-backed account store.
    pub fn new(pool: PgPool, credentials: CredentialService, config: AppConfig) -> Self {
        let store = Arc::new(PgAccountStore::new(pool.clone()));
        Self::with_account_store(pool, store, credentials, config)
    }

    pub fn with_account_store(
        pool: PgPool,
        store: Arc<dyn AccountStore>,
        credentials: CredentialService,
        config: AppConfig,
    ) -> Self {
        let credentials = Arc::new(credentials);
        Self {
            accounts: AccountService::new(store, credentials.clone()),
            pool,
            credentials,
            config: Arc::new(config),
        }
    }

    pub fn repository<T>(&self) -> Repository<T>
    where
        T: crate::database::models::TenantScoped,
    {
        Repository::new(self.pool.clone())
    }
}
