use axum::{extract::Query, Json};
use contracts::projections::p902_conversion_history::dto::{
    ConversionHistoryDto, ConversionHistoryListRequest,
};

use crate::projections::p902_conversion_history;

/// GET /api/p902/conversion-history?location_id=&date_from=&date_to=
pub async fn list(
    Query(request): Query<ConversionHistoryListRequest>,
) -> Result<Json<Vec<ConversionHistoryDto>>, axum::http::StatusCode> {
    match p902_conversion_history::service::list(&request).await {
        Ok(v) => Ok(Json(v)),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}
