use super::{EntityMetadata, EventStore};
use serde::{Deserialize, Serialize};

/// Base aggregate with the fields every aggregate carries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseAggregate<Id> {
    /// Unique record identifier
    pub id: Id,
    /// Business code of the record (e.g. "CLR-001", "GR-2026-0001")
    pub code: String,
    /// Description / display name of the record
    pub description: String,
    /// Free-form comment
    pub comment: Option<String>,
    /// Lifecycle metadata
    pub metadata: EntityMetadata,
    /// Domain events
    pub events: EventStore,
}

impl<Id> BaseAggregate<Id> {
    /// Create a new aggregate
    pub fn new(id: Id, code: String, description: String) -> Self {
        Self {
            id,
            code,
            description,
            comment: None,
            metadata: EntityMetadata::new(),
            events: EventStore::new(),
        }
    }

    /// Create an aggregate with existing metadata (loading from DB)
    pub fn with_metadata(
        id: Id,
        code: String,
        description: String,
        comment: Option<String>,
        metadata: EntityMetadata,
    ) -> Self {
        Self {
            id,
            code,
            description,
            comment,
            metadata,
            events: EventStore::new(),
        }
    }

    /// Bump the updated timestamp
    pub fn touch(&mut self) {
        self.metadata.touch();
    }

    /// Set the comment
    pub fn set_comment(&mut self, comment: Option<String>) {
        self.comment = comment;
    }
}
