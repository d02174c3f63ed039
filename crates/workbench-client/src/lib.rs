//! Typed client for the Workbench API plus the `workbench` command line.
//!
//! [`ApiClient`] wraps every `/api/v1` endpoint and decodes responses into
//! the records in [`models`]. Authentication state lives in a
//! [`SessionStore`], persisted as one JSON file between invocations and
//! cleared whenever the server rejects the stored token.
//!
//! ```no_run
//! use workbench_client::{ApiClient, SessionStore};
//!
//! # async fn demo() -> Result<(), workbench_client::ClientError> {
//! let mut api = ApiClient::new("http://localhost:8080", SessionStore::in_memory())?;
//! api.login("ada", "secret").await?;
//! let workspace = api.create_workspace("My Team").await?;
//! api.select_workspace(workspace.id).await?;
//! let clients = api.list_clients().await?;
//! # drop(clients);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cli;
pub mod envelope;
pub mod error;
pub mod models;
pub mod session;

pub use api::ApiClient;
pub use envelope::{Envelope, decode_envelope};
pub use error::{ApiError, ClientError, SessionError};
pub use session::{Session, SessionStore};
