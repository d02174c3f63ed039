//! In-memory `PasswordResetRepository`.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::ResetCodeDigest;
use crate::domain::ports::{
    PasswordResetPersistenceError, PasswordResetRecord, PasswordResetRepository,
};

use super::POISONED;

/// Pending resets, at most one per user.
#[derive(Debug, Default)]
pub struct InMemoryPasswordResetRepository {
    pending: RwLock<Vec<PasswordResetRecord>>,
}

impl InMemoryPasswordResetRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PasswordResetRepository for InMemoryPasswordResetRepository {
    async fn store(&self, record: &PasswordResetRecord) -> Result<(), PasswordResetPersistenceError> {
        let mut guard = self
            .pending
            .write()
            .map_err(|_| PasswordResetPersistenceError::query(POISONED))?;
        guard.retain(|existing| existing.user_id != record.user_id);
        guard.push(record.clone());
        Ok(())
    }

    async fn take(
        &self,
        digest: &ResetCodeDigest,
    ) -> Result<Option<PasswordResetRecord>, PasswordResetPersistenceError> {
        let mut guard = self
            .pending
            .write()
            .map_err(|_| PasswordResetPersistenceError::query(POISONED))?;
        let position = guard.iter().position(|record| &record.digest == digest);
        Ok(position.map(|index| guard.swap_remove(index)))
    }
}
