//! Builders wiring domain services to Diesel or in-memory adapters.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use workbench_backend::domain::ports::{
    PasswordResetRepository, RecordRepository, UserRepository, WorkspaceRepository,
};
use workbench_backend::domain::{
    AccountService, AccountServicePorts, Client, Product, RecordService, WorkspaceService,
};
use workbench_backend::inbound::http::state::HttpState;
use workbench_backend::outbound::memory::{
    InMemoryPasswordResetRepository, InMemoryRecordRepository, InMemoryUserRepository,
    InMemoryWorkspaceRepository,
};
use workbench_backend::outbound::persistence::{
    DbPool, DieselClientRepository, DieselPasswordResetRepository, DieselProductRepository,
    DieselUserRepository, DieselWorkspaceRepository,
};
use workbench_backend::outbound::security::{
    BcryptPasswordHasher, JwtTokenIssuer, LoggingResetNotifier,
};

use super::ServerConfig;

/// The driven ports shared by every service.
struct Repositories {
    users: Arc<dyn UserRepository>,
    resets: Arc<dyn PasswordResetRepository>,
    workspaces: Arc<dyn WorkspaceRepository>,
    clients: Arc<dyn RecordRepository<Client>>,
    products: Arc<dyn RecordRepository<Product>>,
}

impl Repositories {
    fn diesel(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            resets: Arc::new(DieselPasswordResetRepository::new(pool.clone())),
            workspaces: Arc::new(DieselWorkspaceRepository::new(pool.clone())),
            clients: Arc::new(DieselClientRepository::new(pool.clone())),
            products: Arc::new(DieselProductRepository::new(pool.clone())),
        }
    }

    fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            resets: Arc::new(InMemoryPasswordResetRepository::new()),
            workspaces: Arc::new(InMemoryWorkspaceRepository::new()),
            clients: Arc::new(InMemoryRecordRepository::<Client>::new()),
            products: Arc::new(InMemoryRecordRepository::<Product>::new()),
        }
    }

    fn for_config(config: &ServerConfig) -> Self {
        match &config.db_pool {
            Some(pool) => {
                info!("using PostgreSQL repositories");
                Self::diesel(pool)
            }
            None => {
                warn!("no database configured; data lives in memory and is lost on restart");
                Self::in_memory()
            }
        }
    }
}

/// Build the shared HTTP state from server configuration.
///
/// Built once and shared by every worker so the in-memory adapters hold a
/// single copy of the data.
pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    let repos = Repositories::for_config(config);
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let accounts = AccountService::new(AccountServicePorts {
        users: repos.users,
        resets: repos.resets,
        hasher: Arc::new(BcryptPasswordHasher::new(config.bcrypt_cost)),
        tokens: Arc::new(JwtTokenIssuer::new(
            config.token_key.as_bytes(),
            config.token_ttl,
            clock.clone(),
        )),
        notifier: Arc::new(LoggingResetNotifier),
        clock: clock.clone(),
    })
    .with_reset_code_ttl(config.reset_code_ttl);

    HttpState::new(
        Arc::new(accounts),
        Arc::new(WorkspaceService::new(repos.workspaces.clone(), clock)),
        Arc::new(RecordService::<Client>::new(
            repos.workspaces.clone(),
            repos.clients,
        )),
        Arc::new(RecordService::<Product>::new(
            repos.workspaces,
            repos.products,
        )),
    )
}
