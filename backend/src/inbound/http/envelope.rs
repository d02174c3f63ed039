//! The `{"data": ...}` wrapper used by workspace and record endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Versioned payload envelope for request and response bodies.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct Envelope<T> {
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }

    pub fn into_inner(self) -> T {
        self.data
    }
}

/// Acknowledgement body for deletions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct Deleted {
    pub id: String,
}
