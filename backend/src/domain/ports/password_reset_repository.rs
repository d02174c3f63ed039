//! Port for storing outstanding password reset codes.
//!
//! Only the SHA-256 digest of a code is persisted. Taking a code removes it,
//! so every code can be redeemed at most once.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{ResetCodeDigest, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by password reset adapters.
    pub enum PasswordResetPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "password reset repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "password reset repository query failed: {message}",
    }
}

/// A pending reset request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetRecord {
    pub digest: ResetCodeDigest,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordResetRepository: Send + Sync {
    /// Persist a pending reset, replacing any earlier code for the same user.
    async fn store(&self, record: &PasswordResetRecord) -> Result<(), PasswordResetPersistenceError>;

    /// Remove and return the reset matching `digest`, if any.
    async fn take(
        &self,
        digest: &ResetCodeDigest,
    ) -> Result<Option<PasswordResetRecord>, PasswordResetPersistenceError>;
}
