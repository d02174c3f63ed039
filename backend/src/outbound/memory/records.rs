//! In-memory `RecordRepository`, generic over the record type.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::ports::{RecordPersistenceError, RecordRepository};
use crate::domain::{RecordId, WorkspaceId, WorkspaceRecord};

use super::POISONED;

/// Records held in insertion order.
#[derive(Debug)]
pub struct InMemoryRecordRepository<R> {
    records: RwLock<Vec<R>>,
}

impl<R> Default for InMemoryRecordRepository<R> {
    fn default() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl<R> InMemoryRecordRepository<R> {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> RecordPersistenceError {
    RecordPersistenceError::query(POISONED)
}

#[async_trait]
impl<R: WorkspaceRecord> RecordRepository<R> for InMemoryRecordRepository<R> {
    async fn insert(&self, record: &R) -> Result<(), RecordPersistenceError> {
        self.records
            .write()
            .map_err(|_| poisoned())?
            .push(record.clone());
        Ok(())
    }

    async fn list_by_workspace(&self, workspace: &WorkspaceId) -> Result<Vec<R>, RecordPersistenceError> {
        let guard = self.records.read().map_err(|_| poisoned())?;
        Ok(guard
            .iter()
            .filter(|record| record.workspace_id() == workspace)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &RecordId) -> Result<Option<R>, RecordPersistenceError> {
        let guard = self.records.read().map_err(|_| poisoned())?;
        Ok(guard.iter().find(|record| record.id() == id).cloned())
    }

    async fn update(&self, record: &R) -> Result<bool, RecordPersistenceError> {
        let mut guard = self.records.write().map_err(|_| poisoned())?;
        match guard.iter_mut().find(|stored| stored.id() == record.id()) {
            Some(stored) => {
                *stored = record.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &RecordId) -> Result<bool, RecordPersistenceError> {
        let mut guard = self.records.write().map_err(|_| poisoned())?;
        let before = guard.len();
        guard.retain(|record| record.id() != id);
        Ok(guard.len() != before)
    }
}
