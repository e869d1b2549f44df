use crate::domain::common::{
    AggregateId, AggregateRoot, BaseAggregate, EntityMetadata, EventStore, Origin,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// ID Type
// ============================================================================

/// Unique identifier of a sale document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SaleId(pub Uuid);

impl SaleId {
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

impl AggregateId for SaleId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(SaleId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Table part
// ============================================================================

/// One line of the sale table part
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaleLine {
    /// Product reference (a003_product UUID)
    #[serde(rename = "productId")]
    pub product_id: String,

    /// Color reference (a001_color UUID)
    #[serde(rename = "colorId")]
    pub color_id: String,

    /// Pairs sold
    pub quantity: i64,

    /// Price per pair
    #[serde(rename = "unitPrice")]
    pub unit_price: f64,
}

impl SaleLine {
    pub fn amount(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Sale document: pair-level stock sold at a store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    #[serde(flatten)]
    pub base: BaseAggregate<SaleId>,

    /// Document number (e.g. "SL-2026-0001")
    #[serde(rename = "documentNo")]
    pub document_no: String,

    /// Document date (YYYY-MM-DD)
    #[serde(rename = "documentDate")]
    pub document_date: String,

    /// Selling location (a002_location UUID, kind = store)
    #[serde(rename = "locationId")]
    pub location_id: String,

    /// JSON array of table part lines
    #[serde(rename = "linesJson")]
    pub lines_json: Option<String>,
}

impl Sale {
    pub fn new_for_insert(
        document_no: String,
        document_date: String,
        location_id: String,
        lines: Vec<SaleLine>,
        comment: Option<String>,
    ) -> Self {
        let lines_json = if lines.is_empty() {
            None
        } else {
            serde_json::to_string(&lines).ok()
        };

        let description = format!("{} dated {}", document_no, document_date);
        let mut base = BaseAggregate::new(SaleId::new_v4(), document_no.clone(), description);
        base.comment = comment;

        Self {
            base,
            document_no,
            document_date,
            location_id,
            lines_json,
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    /// Deserialize lines_json into the table part
    pub fn parse_lines(&self) -> Vec<SaleLine> {
        self.lines_json
            .as_deref()
            .and_then(|s| serde_json::from_str(s).ok())
            .unwrap_or_default()
    }

    /// Replace the table part
    pub fn set_lines(&mut self, lines: &[SaleLine]) {
        self.lines_json = if lines.is_empty() {
            None
        } else {
            serde_json::to_string(lines).ok()
        };
    }

    /// Apply editable fields from a DTO
    pub fn update(&mut self, dto: &SaleDto) {
        self.document_no = dto.document_no.clone();
        self.document_date = dto.document_date.clone();
        self.location_id = dto.location_id.clone();
        self.base.code = dto.document_no.clone();
        self.base.description = format!("{} dated {}", dto.document_no, dto.document_date);
        self.base.comment = dto.comment.clone();
        self.set_lines(&dto.lines);
    }

    /// Total amount over all lines
    pub fn total_amount(&self) -> f64 {
        self.parse_lines().iter().map(|l| l.amount()).sum()
    }

    /// Validate the aggregate data
    pub fn validate(&self) -> Result<(), String> {
        if self.document_no.trim().is_empty() {
            return Err("Document number cannot be empty".into());
        }
        if self.location_id.trim().is_empty() {
            return Err("Location is required".into());
        }
        let lines = self.parse_lines();
        if lines.is_empty() {
            return Err("Document must have at least one line".into());
        }
        for line in &lines {
            if line.quantity <= 0 {
                return Err("Quantity must be positive".into());
            }
            if line.unit_price < 0.0 {
                return Err("Unit price cannot be negative".into());
            }
        }
        Ok(())
    }

    /// Hook before persisting
    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for Sale {
    type Id = SaleId;

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
        "a005"
    }

    fn collection_name() -> &'static str {
        "sale"
    }

    fn element_name() -> &'static str {
        "Sale"
    }

    fn list_name() -> &'static str {
        "Sales"
    }

    fn origin() -> Origin {
        Origin::Self_
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO for creating/updating a sale
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SaleDto {
    pub id: Option<String>,
    #[serde(rename = "documentNo")]
    pub document_no: String,
    #[serde(rename = "documentDate")]
    pub document_date: String,
    #[serde(rename = "locationId")]
    pub location_id: String,
    pub lines: Vec<SaleLine>,
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_amount_sums_lines() {
        let sale = Sale::new_for_insert(
            "SL-2026-0001".into(),
            "2026-08-10".into(),
            Uuid::new_v4().to_string(),
            vec![
                SaleLine {
                    product_id: Uuid::new_v4().to_string(),
                    color_id: Uuid::new_v4().to_string(),
                    quantity: 2,
                    unit_price: 75_000.0,
                },
                SaleLine {
                    product_id: Uuid::new_v4().to_string(),
                    color_id: Uuid::new_v4().to_string(),
                    quantity: 1,
                    unit_price: 120_000.0,
                },
            ],
            None,
        );
        assert_eq!(sale.total_amount(), 270_000.0);
        assert!(sale.validate().is_ok());
    }

    #[test]
    fn validate_rejects_negative_price() {
        let sale = Sale::new_for_insert(
            "SL-2026-0002".into(),
            "2026-08-10".into(),
            Uuid::new_v4().to_string(),
            vec![SaleLine {
                product_id: Uuid::new_v4().to_string(),
                color_id: Uuid::new_v4().to_string(),
                quantity: 1,
                unit_price: -1.0,
            }],
            None,
        );
        assert!(sale.validate().is_err());
    }
}
