use anyhow::Result;
use contracts::projections::p902_conversion_history::dto::{
    ConversionHistoryDto, ConversionHistoryListRequest,
};

use super::repository;

/// Conversion history report: finished-box events, newest first
pub async fn list(request: &ConversionHistoryListRequest) -> Result<Vec<ConversionHistoryDto>> {
    let events = repository::list(
        request.location_id.as_deref(),
        request.date_from.as_deref(),
        request.date_to.as_deref(),
    )
    .await?;

    Ok(events
        .into_iter()
        .map(|e| ConversionHistoryDto {
            id: e.id,
            conversion_id: e.conversion_id,
            location_id: e.location_id,
            product_id: e.product_id,
            color_id: e.color_id,
            product_sku: e.product_sku,
            product_name: e.product_name,
            color_name: e.color_name,
            finished_at: e.finished_at,
            finished_by: e.finished_by,
        })
        .collect())
}
