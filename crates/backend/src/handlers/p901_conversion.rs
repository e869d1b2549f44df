use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::projections::p901_conversion::dto::{ConversionItemDto, RecordPairsRequest};
use serde::Deserialize;

use crate::domain::a002_location;
use crate::projections::p901_conversion::{self, ConversionError};
use crate::system::auth::extractor::CurrentUser;

#[derive(Debug, Deserialize)]
pub struct ConversionParams {
    pub location_id: Option<String>,
}

fn status_for(err: &ConversionError) -> StatusCode {
    match err {
        ConversionError::NotFound => StatusCode::NOT_FOUND,
        ConversionError::AlreadyEmpty => StatusCode::CONFLICT,
        ConversionError::InvalidPairCount(_) => StatusCode::BAD_REQUEST,
        ConversionError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// GET /api/p901/conversion?location_id=
///
/// Without an explicit location the tracker shows the main warehouse.
pub async fn list(
    Query(params): Query<ConversionParams>,
) -> Result<Json<Vec<ConversionItemDto>>, StatusCode> {
    let location_id = match params.location_id {
        Some(id) => id,
        None => match a002_location::service::get_main_warehouse().await {
            Ok(warehouse) => warehouse.to_string_id(),
            Err(_) => return Err(StatusCode::NOT_FOUND),
        },
    };

    match p901_conversion::service::list_ready(&location_id).await {
        Ok(v) => Ok(Json(v)),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// POST /api/p901/conversion/:id/finish-box
pub async fn finish_box(
    user: Option<CurrentUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    let finished_by = user.map(|CurrentUser(claims)| claims.username);

    match p901_conversion::service::finish_box(&id, finished_by).await {
        Ok(()) => Ok(StatusCode::OK),
        Err(e) => {
            tracing::warn!(conversion_id = %id, error = %e, "finish box failed");
            Err(status_for(&e))
        }
    }
}

/// POST /api/p901/conversion/:id/record-pairs
pub async fn record_pairs(
    Path(id): Path<String>,
    Json(request): Json<RecordPairsRequest>,
) -> Result<StatusCode, StatusCode> {
    match p901_conversion::service::record_pairs(&id, request.pairs).await {
        Ok(()) => Ok(StatusCode::OK),
        Err(e) => {
            tracing::warn!(conversion_id = %id, error = %e, "record pairs failed");
            Err(status_for(&e))
        }
    }
}
