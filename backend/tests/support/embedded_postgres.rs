//! Embedded PostgreSQL for the Diesel adapter suites.
//!
//! One cluster is shared by the whole test binary. Each test gets its own
//! temporary database with the embedded migrations applied, so suites never
//! see each other's rows.
//!
//! Hosts that cannot start the cluster (no network for the first binary
//! download, sandboxed `/var/tmp`) skip with a `SKIP-TEST-CLUSTER` marker.
//! Set `REQUIRE_TEST_CLUSTER=1` to turn that into a failure in CI.

use std::time::Duration;

use diesel::{Connection, PgConnection, RunQueryDsl};
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use tokio::runtime::Runtime;
use workbench_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

const SHARED_CLUSTER_RETRIES: usize = 5;
const SHARED_CLUSTER_RETRY_DELAY: Duration = Duration::from_millis(500);

/// A migrated database plus a pool and runtime for driving repositories.
pub(crate) struct PgContext {
    pub(crate) runtime: Runtime,
    pub(crate) pool: DbPool,
    pub(crate) database_url: String,
    _database: TemporaryDatabase,
}

impl PgContext {
    pub(crate) fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

/// Shared cluster handle, retried while a parallel bootstrap finishes.
fn shared_cluster_handle() -> Result<&'static ClusterHandle, String> {
    ensure_stable_password();
    let mut attempt = 1;
    loop {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(error) if attempt >= SHARED_CLUSTER_RETRIES => return Err(error.to_string()),
            Err(_) => {
                std::thread::sleep(SHARED_CLUSTER_RETRY_DELAY);
                attempt += 1;
            }
        }
    }
}

/// Pins `PG_PASSWORD` so a data directory reused by a later run still
/// accepts the password it was initialised with.
fn ensure_stable_password() {
    if std::env::var_os("PG_PASSWORD").is_none() {
        // SAFETY: runs before the cluster bootstrap spawns threads, and the
        // value is identical for every caller.
        unsafe {
            std::env::set_var("PG_PASSWORD", "workbench_embedded_test");
        }
    }
}

fn setup_context() -> Result<PgContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster_handle()?;
    let database = cluster
        .create_temporary_database()
        .map_err(|err| format!("{err:?}"))?;
    let database_url = database.url().to_string();

    runtime
        .block_on(run_pending_migrations(&database_url))
        .map_err(|err| err.to_string())?;
    let config = PoolConfig::new(database_url.as_str())
        .with_max_size(2)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    Ok(PgContext {
        runtime,
        pool,
        database_url,
        _database: database,
    })
}

/// Provision a fresh database, or `None` when the cluster is unavailable.
pub(crate) fn pg_context() -> Option<PgContext> {
    match setup_context() {
        Ok(context) => Some(context),
        Err(reason) if require_test_cluster() => {
            panic!("test cluster setup failed: {reason}")
        }
        Err(reason) => {
            eprintln!("SKIP-TEST-CLUSTER: {reason}");
            None
        }
    }
}

fn require_test_cluster() -> bool {
    std::env::var("REQUIRE_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Drop `table` to simulate schema loss.
pub(crate) fn drop_table(url: &str, table: &str) -> Result<(), String> {
    let mut conn = PgConnection::establish(url).map_err(|err| err.to_string())?;
    let escaped = table.replace('"', "\"\"");
    diesel::sql_query(format!(r#"DROP TABLE IF EXISTS "{escaped}" CASCADE"#))
        .execute(&mut conn)
        .map(|_| ())
        .map_err(|err| err.to_string())
}
