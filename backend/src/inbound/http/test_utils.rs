//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use chrono::Duration;
use mockable::DefaultClock;

use crate::domain::{
    AccountService, AccountServicePorts, Client, Product, RecordService, WorkspaceService,
};
use crate::inbound::http::configure_api;
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{
    InMemoryPasswordResetRepository, InMemoryRecordRepository, InMemoryUserRepository,
    InMemoryWorkspaceRepository,
};
use crate::outbound::security::{BcryptPasswordHasher, JwtTokenIssuer, LoggingResetNotifier};

const TEST_SECRET: &[u8] = b"handler-tests-secret-handler-tests";

/// Fully wired state over in-memory adapters and the cheapest bcrypt cost.
pub fn in_memory_state() -> HttpState {
    let clock = Arc::new(DefaultClock);
    let workspaces = Arc::new(InMemoryWorkspaceRepository::new());
    let accounts = AccountService::new(AccountServicePorts {
        users: Arc::new(InMemoryUserRepository::new()),
        resets: Arc::new(InMemoryPasswordResetRepository::new()),
        hasher: Arc::new(BcryptPasswordHasher::new(4)),
        tokens: Arc::new(JwtTokenIssuer::new(
            TEST_SECRET,
            Duration::hours(1),
            clock.clone(),
        )),
        notifier: Arc::new(LoggingResetNotifier),
        clock: clock.clone(),
    });
    HttpState::new(
        Arc::new(accounts),
        Arc::new(WorkspaceService::new(workspaces.clone(), clock)),
        Arc::new(RecordService::<Client>::new(
            workspaces.clone(),
            Arc::new(InMemoryRecordRepository::<Client>::new()),
        )),
        Arc::new(RecordService::<Product>::new(
            workspaces,
            Arc::new(InMemoryRecordRepository::<Product>::new()),
        )),
    )
}

/// App exposing the full API over `state`.
pub fn api_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .configure(configure_api)
}
