use crate::domain::common::{
    AggregateId, AggregateRoot, BaseAggregate, EntityMetadata, EventStore, Origin,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// ID Type
// ============================================================================

/// Unique identifier of a color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorId(pub Uuid);

impl ColorId {
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

impl AggregateId for ColorId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(ColorId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Color of a product variant (catalog entry; description is the color name)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Color {
    #[serde(flatten)]
    pub base: BaseAggregate<ColorId>,
}

impl Color {
    /// Create a new color for insertion into the DB
    pub fn new_for_insert(code: String, description: String, comment: Option<String>) -> Self {
        let mut base = BaseAggregate::new(ColorId::new_v4(), code, description);
        base.comment = comment;
        Self { base }
    }

    /// Get the ID as a string
    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    /// Apply DTO data to the aggregate
    pub fn update(&mut self, dto: &ColorDto) {
        self.base.code = dto.code.clone().unwrap_or_default();
        self.base.description = dto.description.clone();
        self.base.comment = dto.comment.clone();
    }

    /// Validate the aggregate data
    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("Color name cannot be empty".into());
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

impl AggregateRoot for Color {
    type Id = ColorId;

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
        "a001"
    }

    fn collection_name() -> &'static str {
        "color"
    }

    fn element_name() -> &'static str {
        "Color"
    }

    fn list_name() -> &'static str {
        "Colors"
    }

    fn origin() -> Origin {
        Origin::Self_
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO for creating/updating a color
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ColorDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub description: String,
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_empty_name() {
        let color = Color::new_for_insert("CLR-001".into(), "   ".into(), None);
        assert!(color.validate().is_err());
    }

    #[test]
    fn update_applies_dto_fields() {
        let mut color = Color::new_for_insert("CLR-001".into(), "Black".into(), None);
        let dto = ColorDto {
            id: Some(color.to_string_id()),
            code: Some("CLR-002".into()),
            description: "Midnight Black".into(),
            comment: Some("renamed".into()),
        };
        color.update(&dto);
        assert_eq!(color.base.code, "CLR-002");
        assert_eq!(color.base.description, "Midnight Black");
        assert!(color.validate().is_ok());
    }
}
