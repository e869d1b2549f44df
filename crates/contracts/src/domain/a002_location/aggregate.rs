use crate::domain::common::{
    AggregateId, AggregateRoot, BaseAggregate, EntityMetadata, EventStore, Origin,
};
use crate::enums::LocationKind;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// ID Type
// ============================================================================

/// Unique identifier of a location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationId(pub Uuid);

impl LocationId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for LocationId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(LocationId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Stock-keeping location (warehouse or store)
///
/// The main warehouse is not hardcoded anywhere; it is designated by
/// `[app].main_warehouse_code` in the backend configuration and resolved
/// by code at request time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    #[serde(flatten)]
    pub base: BaseAggregate<LocationId>,

    pub kind: LocationKind,

    pub address: Option<String>,
}

impl Location {
    /// Create a new location for insertion into the DB
    pub fn new_for_insert(
        code: String,
        description: String,
        kind: LocationKind,
        address: Option<String>,
        comment: Option<String>,
    ) -> Self {
        let mut base = BaseAggregate::new(LocationId::new_v4(), code, description);
        base.comment = comment;
        Self {
            base,
            kind,
            address,
        }
    }

    /// Get the ID as a string
    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    /// Apply DTO data to the aggregate
    pub fn update(&mut self, dto: &LocationDto) {
        self.base.code = dto.code.clone().unwrap_or_default();
        self.base.description = dto.description.clone();
        self.base.comment = dto.comment.clone();
        self.kind = dto.kind;
        self.address = dto.address.clone();
    }

    /// Validate the aggregate data
    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("Location name cannot be empty".into());
        }
        if self.base.code.trim().is_empty() {
            return Err("Code cannot be empty".into());
        }
        Ok(())
    }

    /// Hook before persisting
    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for Location {
    type Id = LocationId;

    fn id(&self) -> Self::Id {
        self.base.id
    }

    fn code(&self) -> &str {
        &self.base.code
    }

    fn description(&self) -> &str {
        &self.base.description
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.base.metadata
    }

    fn events(&self) -> &EventStore {
        &self.base.events
    }

    fn events_mut(&mut self) -> &mut EventStore {
        &mut self.base.events
    }

    fn aggregate_index() -> &'static str {
        "a002"
    }

    fn collection_name() -> &'static str {
        "location"
    }

    fn element_name() -> &'static str {
        "Location"
    }

    fn list_name() -> &'static str {
        "Locations"
    }

    fn origin() -> Origin {
        Origin::Self_
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO for creating/updating a location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub description: String,
    pub kind: LocationKind,
    pub address: Option<String>,
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_json() {
        let loc = Location::new_for_insert(
            "WH-MAIN".into(),
            "Gudang Utama".into(),
            LocationKind::Warehouse,
            None,
            None,
        );
        let json = serde_json::to_string(&loc).unwrap();
        assert!(json.contains("\"warehouse\""));
        let parsed: Location = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.kind, LocationKind::Warehouse);
    }
}
