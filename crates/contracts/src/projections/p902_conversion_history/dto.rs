use serde::{Deserialize, Serialize};

/// One finished-box event from the conversion history log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionHistoryDto {
    pub id: String,

    // Key of the tracker row the event belongs to
    pub conversion_id: String,
    pub location_id: String,
    pub product_id: String,
    pub color_id: String,

    // Display snapshot taken at event time
    pub product_sku: String,
    pub product_name: String,
    pub color_name: String,

    /// When the box was finished (RFC 3339, UTC)
    pub finished_at: String,
    /// Username from the JWT claims, when the request was authenticated
    pub finished_by: Option<String>,
}

/// Request for the conversion history report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionHistoryListRequest {
    #[serde(default)]
    pub location_id: Option<String>,
    /// Inclusive lower bound, "YYYY-MM-DD"
    #[serde(default, rename = "from")]
    pub date_from: Option<String>,
    /// Inclusive upper bound, "YYYY-MM-DD"
    #[serde(default, rename = "to")]
    pub date_to: Option<String>,
}
