use serde::{Deserialize, Serialize};

/// One row of the stock balance register, enriched with display attributes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockBalanceDto {
    // NK (Natural Key)
    pub location_id: String,
    pub product_id: String,
    pub color_id: String,

    // Display attributes (joined from master data)
    pub product_sku: String,
    pub product_name: String,
    pub color_name: String,

    // Quantities
    pub box_qty: i64,
    pub pair_qty: i64,
}

/// Request for the stock view of one location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockListRequest {
    pub location_id: String,
}
