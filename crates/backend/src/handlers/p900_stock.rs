use axum::{extract::Query, Json};
use contracts::projections::p900_stock_balance::dto::StockBalanceDto;
use serde::Deserialize;

use crate::domain::a002_location;
use crate::projections::p900_stock_balance;

#[derive(Debug, Deserialize)]
pub struct StockParams {
    pub location_id: Option<String>,
}

/// GET /api/p900/stock?location_id=
///
/// Without an explicit location the view shows the main warehouse.
pub async fn list_stock(
    Query(params): Query<StockParams>,
) -> Result<Json<Vec<StockBalanceDto>>, axum::http::StatusCode> {
    let location_id = match params.location_id {
        Some(id) => id,
        None => match a002_location::service::get_main_warehouse().await {
            Ok(warehouse) => warehouse.to_string_id(),
            Err(_) => return Err(axum::http::StatusCode::NOT_FOUND),
        },
    };

    match p900_stock_balance::service::list_stock(&location_id).await {
        Ok(v) => Ok(Json(v)),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}
