use crate::domain::common::{
    AggregateId, AggregateRoot, BaseAggregate, EntityMetadata, EventStore, Origin,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// ID Type
// ============================================================================

/// Unique identifier of a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub Uuid);

impl ProductId {
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

impl AggregateId for ProductId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(ProductId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Sellable product (footwear model; the sellable unit is one pair)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(flatten)]
    pub base: BaseAggregate<ProductId>,

    /// Stock-keeping unit, unique across products
    pub sku: String,

    /// Nominal pair count of one unopened box
    #[serde(rename = "pairsPerBox")]
    pub pairs_per_box: i64,
}

impl Product {
    /// Create a new product for insertion into the DB
    pub fn new_for_insert(
        code: String,
        description: String,
        sku: String,
        pairs_per_box: i64,
        comment: Option<String>,
    ) -> Self {
        let mut base = BaseAggregate::new(ProductId::new_v4(), code, description);
        base.comment = comment;
        Self {
            base,
            sku,
            pairs_per_box,
        }
    }

    /// Get the ID as a string
    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    /// Apply DTO data to the aggregate
    pub fn update(&mut self, dto: &ProductDto) {
        self.base.code = dto.code.clone().unwrap_or_default();
        self.base.description = dto.description.clone();
        self.base.comment = dto.comment.clone();
        self.sku = dto.sku.clone();
        self.pairs_per_box = dto.pairs_per_box;
    }

    /// Validate the aggregate data
    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("Product name cannot be empty".into());
        }
        if self.base.code.trim().is_empty() {
            return Err("Code cannot be empty".into());
        }
        if self.sku.trim().is_empty() {
            return Err("SKU cannot be empty".into());
        }
        if self.pairs_per_box <= 0 {
            return Err("Pairs per box must be positive".into());
        }
        Ok(())
    }

    /// Hook before persisting
    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for Product {
    type Id = ProductId;

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
        "a003"
    }

    fn collection_name() -> &'static str {
        "product"
    }

    fn element_name() -> &'static str {
        "Product"
    }

    fn list_name() -> &'static str {
        "Products"
    }

    fn origin() -> Origin {
        Origin::Self_
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO for creating/updating a product
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProductDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub description: String,
    pub sku: String,
    #[serde(rename = "pairsPerBox")]
    pub pairs_per_box: i64,
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_non_positive_pairs_per_box() {
        let product =
            Product::new_for_insert("PRD-001".into(), "Sandal Jepit".into(), "SJ-01".into(), 0, None);
        assert!(product.validate().is_err());
    }

    #[test]
    fn validate_accepts_complete_product() {
        let product = Product::new_for_insert(
            "PRD-001".into(),
            "Sandal Jepit".into(),
            "SJ-01".into(),
            20,
            None,
        );
        assert!(product.validate().is_ok());
    }
}
