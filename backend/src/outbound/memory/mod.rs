//! In-process adapters backing every persistence port with locked vectors.
//!
//! Used when no database URL is configured and by the integration tests.
//! State lives only as long as the adapter; restarting the server forgets
//! everything.

mod password_resets;
mod records;
mod users;
mod workspaces;

pub use password_resets::InMemoryPasswordResetRepository;
pub use records::InMemoryRecordRepository;
pub use users::InMemoryUserRepository;
pub use workspaces::InMemoryWorkspaceRepository;

/// Message used when a lock was poisoned by a panicking writer.
const POISONED: &str = "in-memory store lock poisoned";
