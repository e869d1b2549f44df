use crate::domain::common::{
    AggregateId, AggregateRoot, BaseAggregate, EntityMetadata, EventStore, Origin,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// ID Type
// ============================================================================

/// Unique identifier of a goods receipt document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GoodsReceiptId(pub Uuid);

impl GoodsReceiptId {
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

impl AggregateId for GoodsReceiptId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(GoodsReceiptId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Table part
// ============================================================================

/// One line of the goods receipt table part
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoodsReceiptLine {
    /// Product reference (a003_product UUID)
    #[serde(rename = "productId")]
    pub product_id: String,

    /// Color reference (a001_color UUID)
    #[serde(rename = "colorId")]
    pub color_id: String,

    /// Number of unopened boxes received
    #[serde(rename = "boxCount")]
    pub box_count: i64,

    /// Nominal pair count per box, copied from the product at receipt time
    #[serde(rename = "pairsPerBox")]
    pub pairs_per_box: i64,
}

impl GoodsReceiptLine {
    /// Pairs anticipated from this line once all its boxes are counted
    pub fn expected_pairs(&self) -> i64 {
        self.box_count * self.pairs_per_box
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Goods receipt document: boxed goods arriving at a location
///
/// Posting the document moves box quantities into the stock balance register
/// and opens (or grows) conversion tracker rows for the received keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoodsReceipt {
    #[serde(flatten)]
    pub base: BaseAggregate<GoodsReceiptId>,

    /// Document number (e.g. "GR-2026-0001")
    #[serde(rename = "documentNo")]
    pub document_no: String,

    /// Document date (YYYY-MM-DD)
    #[serde(rename = "documentDate")]
    pub document_date: String,

    /// Receiving location (a002_location UUID)
    #[serde(rename = "locationId")]
    pub location_id: String,

    /// JSON array of table part lines
    #[serde(rename = "linesJson")]
    pub lines_json: Option<String>,
}

impl GoodsReceipt {
    pub fn new_for_insert(
        document_no: String,
        document_date: String,
        location_id: String,
        lines: Vec<GoodsReceiptLine>,
        comment: Option<String>,
    ) -> Self {
        let lines_json = if lines.is_empty() {
            None
        } else {
            serde_json::to_string(&lines).ok()
        };

        let description = format!("{} dated {}", document_no, document_date);
        let mut base = BaseAggregate::new(
            GoodsReceiptId::new_v4(),
            document_no.clone(),
            description,
        );
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
    pub fn parse_lines(&self) -> Vec<GoodsReceiptLine> {
        self.lines_json
            .as_deref()
            .and_then(|s| serde_json::from_str(s).ok())
            .unwrap_or_default()
    }

    /// Replace the table part
    pub fn set_lines(&mut self, lines: &[GoodsReceiptLine]) {
        self.lines_json = if lines.is_empty() {
            None
        } else {
            serde_json::to_string(lines).ok()
        };
    }

    /// Apply editable fields from a DTO
    pub fn update(&mut self, dto: &GoodsReceiptDto) {
        self.document_no = dto.document_no.clone();
        self.document_date = dto.document_date.clone();
        self.location_id = dto.location_id.clone();
        self.base.code = dto.document_no.clone();
        self.base.description = format!("{} dated {}", dto.document_no, dto.document_date);
        self.base.comment = dto.comment.clone();
        self.set_lines(&dto.lines);
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
            if line.box_count <= 0 {
                return Err("Box count must be positive".into());
            }
            if line.pairs_per_box <= 0 {
                return Err("Pairs per box must be positive".into());
            }
        }
        Ok(())
    }

    /// Hook before persisting
    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for GoodsReceipt {
    type Id = GoodsReceiptId;

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
        "a004"
    }

    fn collection_name() -> &'static str {
        "goods_receipt"
    }

    fn element_name() -> &'static str {
        "Goods receipt"
    }

    fn list_name() -> &'static str {
        "Goods receipts"
    }

    fn origin() -> Origin {
        Origin::Self_
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO for creating/updating a goods receipt
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GoodsReceiptDto {
    pub id: Option<String>,
    #[serde(rename = "documentNo")]
    pub document_no: String,
    #[serde(rename = "documentDate")]
    pub document_date: String,
    #[serde(rename = "locationId")]
    pub location_id: String,
    pub lines: Vec<GoodsReceiptLine>,
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(box_count: i64, pairs_per_box: i64) -> GoodsReceiptLine {
        GoodsReceiptLine {
            product_id: Uuid::new_v4().to_string(),
            color_id: Uuid::new_v4().to_string(),
            box_count,
            pairs_per_box,
        }
    }

    #[test]
    fn lines_survive_json_storage() {
        let lines = vec![line(3, 20), line(1, 12)];
        let doc = GoodsReceipt::new_for_insert(
            "GR-2026-0001".into(),
            "2026-08-01".into(),
            Uuid::new_v4().to_string(),
            lines.clone(),
            None,
        );
        assert_eq!(doc.parse_lines(), lines);
        assert_eq!(doc.parse_lines()[0].expected_pairs(), 60);
    }

    #[test]
    fn validate_rejects_empty_table_part() {
        let doc = GoodsReceipt::new_for_insert(
            "GR-2026-0002".into(),
            "2026-08-01".into(),
            Uuid::new_v4().to_string(),
            vec![],
            None,
        );
        assert!(doc.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_boxes() {
        let doc = GoodsReceipt::new_for_insert(
            "GR-2026-0003".into(),
            "2026-08-01".into(),
            Uuid::new_v4().to_string(),
            vec![line(0, 20)],
            None,
        );
        assert!(doc.validate().is_err());
    }
}
