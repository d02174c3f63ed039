//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Command`) are called by inbound adapters. Driven ports
//! (repositories, hashing, tokens, notifications) are implemented by outbound
//! adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod password_hasher;
mod password_reset_repository;
mod record_command;
mod record_repository;
mod reset_notifier;
mod token_issuer;
mod user_repository;
mod workspace_command;
mod workspace_repository;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::AccountCommand;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use password_reset_repository::MockPasswordResetRepository;
pub use password_reset_repository::{
    PasswordResetPersistenceError, PasswordResetRecord, PasswordResetRepository,
};
pub use record_command::RecordCommand;
pub use record_repository::{RecordPersistenceError, RecordRepository};
#[cfg(test)]
pub use reset_notifier::MockResetNotifier;
pub use reset_notifier::{ResetNotifier, ResetNotifierError};
#[cfg(test)]
pub use token_issuer::MockTokenIssuer;
pub use token_issuer::{TokenError, TokenIssuer};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use workspace_command::MockWorkspaceCommand;
pub use workspace_command::WorkspaceCommand;
#[cfg(test)]
pub use workspace_repository::MockWorkspaceRepository;
pub use workspace_repository::{WorkspacePersistenceError, WorkspaceRepository};
