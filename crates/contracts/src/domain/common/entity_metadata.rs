use serde::{Deserialize, Serialize};

/// Lifecycle metadata of an aggregate instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityMetadata {
    /// When the record was created
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// When the record was last updated
    pub updated_at: chrono::DateTime<chrono::Utc>,
    /// Soft delete flag
    pub is_deleted: bool,
    /// Posted flag (documents only)
    pub is_posted: bool,
    /// Version for optimistic locking
    pub version: i32,
}

impl EntityMetadata {
    /// Fresh metadata for a new aggregate
    pub fn new() -> Self {
        let now = chrono::Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            is_deleted: false,
            is_posted: false,
            version: 0,
        }
    }

    /// Bump the updated timestamp
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now();
    }

    /// Bump the optimistic-lock version
    pub fn increment_version(&mut self) {
        self.version += 1;
    }
}

impl Default for EntityMetadata {
    fn default() -> Self {
        Self::new()
    }
}
