//! PostgreSQL adapters for the repository ports.
//!
//! Row structs (`models.rs`) and table definitions (`schema.rs`) stay private
//! to this module; repositories translate them to domain types and map every
//! Diesel or pool failure to the port's own error enum.
//!
//! ```ignore
//! use workbench_backend::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/workbench")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_client_repository;
mod diesel_error_mapping;
mod diesel_password_reset_repository;
mod diesel_product_repository;
mod diesel_user_repository;
mod diesel_workspace_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_client_repository::DieselClientRepository;
pub use diesel_password_reset_repository::DieselPasswordResetRepository;
pub use diesel_product_repository::DieselProductRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use diesel_workspace_repository::DieselWorkspaceRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
