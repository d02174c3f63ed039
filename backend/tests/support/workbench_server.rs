//! Real-socket server harness for behaviour tests.
//!
//! Actix spawns local tasks, so the server and every client call share one
//! current-thread runtime driven through a `LocalSet`. Dropping the harness
//! stops the server even when a step panics.

use std::future::Future;
use std::net::TcpListener;
use std::sync::Arc;

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpServer, web};
use chrono::Duration;
use mockable::DefaultClock;
use tokio::runtime::Runtime;
use tokio::task::LocalSet;
use workbench_backend::Trace;
use workbench_backend::domain::{
    AccountService, AccountServicePorts, Client, Product, RecordService, WorkspaceService,
};
use workbench_backend::inbound::http::configure_api;
use workbench_backend::inbound::http::state::HttpState;
use workbench_backend::outbound::memory::{
    InMemoryPasswordResetRepository, InMemoryRecordRepository, InMemoryUserRepository,
    InMemoryWorkspaceRepository,
};
use workbench_backend::outbound::security::{
    BcryptPasswordHasher, JwtTokenIssuer, LoggingResetNotifier,
};
use workbench_client::{ApiClient, SessionStore};

const TEST_SECRET: &[u8] = b"behaviour-tests-secret-behaviour-tests";

pub(crate) struct TestServer {
    runtime: Runtime,
    local: LocalSet,
    base_url: String,
    handle: ServerHandle,
}

impl TestServer {
    pub(crate) fn start() -> Self {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("tokio runtime");
        let local = LocalSet::new();
        let (base_url, handle) = local
            .block_on(&runtime, async { spawn_server(in_memory_state()) })
            .expect("server should start");
        Self {
            runtime,
            local,
            base_url,
            handle,
        }
    }

    /// Drive `future` to completion alongside the server.
    pub(crate) fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.local.block_on(&self.runtime, future)
    }

    /// A fresh client with an in-memory session.
    pub(crate) fn client(&self) -> ApiClient {
        ApiClient::new(&self.base_url, SessionStore::in_memory()).expect("api client")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let handle = self.handle.clone();
        self.local.block_on(&self.runtime, async move {
            handle.stop(true).await;
        });
    }
}

fn in_memory_state() -> HttpState {
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

fn spawn_server(state: HttpState) -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;
    let data = web::Data::new(state);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(Trace)
            .configure(configure_api)
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .map_err(|err| err.to_string())?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);
    Ok((format!("http://{addr}"), handle))
}
