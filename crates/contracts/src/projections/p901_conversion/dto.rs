use serde::{Deserialize, Serialize};

/// One row of the conversion tracker, as served to the ready-to-count list
///
/// `remaining_pairs` is a display computation only
/// (`expected_pairs - actual_pairs_entered`); the invariant
/// `actual <= expected` is observed, never enforced here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionItemDto {
    pub id: String,

    // Key
    pub location_id: String,
    pub product_id: String,
    pub color_id: String,

    // Display attributes (joined from master data)
    pub product_sku: String,
    pub product_name: String,
    pub color_name: String,

    // Tracked state
    pub ready_box_count: i64,
    pub expected_pairs: i64,
    pub actual_pairs_entered: i64,

    // Computed: expected_pairs - actual_pairs_entered (may be negative)
    pub remaining_pairs: i64,
}

impl ConversionItemDto {
    /// Remaining uncounted pairs for a tracker row
    pub fn compute_remaining(expected_pairs: i64, actual_pairs_entered: i64) -> i64 {
        expected_pairs - actual_pairs_entered
    }
}

/// Request body for the manual pair-count entry operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordPairsRequest {
    /// Pairs counted out of the opened boxes; added to actual_pairs_entered
    pub pairs: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_is_expected_minus_actual() {
        assert_eq!(ConversionItemDto::compute_remaining(120, 40), 80);
    }

    #[test]
    fn remaining_may_go_negative() {
        // Violated invariant: still computed verbatim, flagged by the caller
        assert_eq!(ConversionItemDto::compute_remaining(10, 25), -15);
    }
}
