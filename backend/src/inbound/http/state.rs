//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports, so
//! they can be exercised with mocks or in-memory services.

use std::sync::Arc;

use crate::domain::ports::{AccountCommand, RecordCommand, WorkspaceCommand};
use crate::domain::{Client, Product};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub workspaces: Arc<dyn WorkspaceCommand>,
    pub clients: Arc<dyn RecordCommand<Client>>,
    pub products: Arc<dyn RecordCommand<Product>>,
}

impl HttpState {
    pub fn new(
        accounts: Arc<dyn AccountCommand>,
        workspaces: Arc<dyn WorkspaceCommand>,
        clients: Arc<dyn RecordCommand<Client>>,
        products: Arc<dyn RecordCommand<Product>>,
    ) -> Self {
        Self {
            accounts,
            workspaces,
            clients,
            products,
        }
    }
}
