use axum::{extract::Path, Json};
use serde_json::json;

use crate::domain::a002_location;

/// GET /api/location
pub async fn list_all(
) -> Result<Json<Vec<contracts::domain::a002_location::aggregate::Location>>, axum::http::StatusCode>
{
    match a002_location::service::list_all().await {
        Ok(v) => Ok(Json(v)),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// GET /api/location/main-warehouse
pub async fn get_main_warehouse(
) -> Result<Json<contracts::domain::a002_location::aggregate::Location>, axum::http::StatusCode> {
    match a002_location::service::get_main_warehouse().await {
        Ok(v) => Ok(Json(v)),
        Err(_) => Err(axum::http::StatusCode::NOT_FOUND),
    }
}

/// GET /api/location/:id
pub async fn get_by_id(
    Path(id): Path<String>,
) -> Result<Json<contracts::domain::a002_location::aggregate::Location>, axum::http::StatusCode> {
    let uuid = match uuid::Uuid::parse_str(&id) {
        Ok(uuid) => uuid,
        Err(_) => return Err(axum::http::StatusCode::BAD_REQUEST),
    };
    match a002_location::service::get_by_id(uuid).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// POST /api/location
pub async fn upsert(
    Json(dto): Json<contracts::domain::a002_location::aggregate::LocationDto>,
) -> Result<Json<serde_json::Value>, axum::http::StatusCode> {
    let result = if dto.id.is_some() {
        a002_location::service::update(dto)
            .await
            .map(|_| uuid::Uuid::nil().to_string())
    } else {
        a002_location::service::create(dto)
            .await
            .map(|id| id.to_string())
    };
    match result {
        Ok(id) => Ok(Json(json!({"id": id}))),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// DELETE /api/location/:id
pub async fn delete(Path(id): Path<String>) -> Result<(), axum::http::StatusCode> {
    let uuid = match uuid::Uuid::parse_str(&id) {
        Ok(uuid) => uuid,
        Err(_) => return Err(axum::http::StatusCode::BAD_REQUEST),
    };
    match a002_location::service::delete(uuid).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// POST /api/location/testdata
pub async fn insert_test_data() -> Result<(), axum::http::StatusCode> {
    match a002_location::service::insert_test_data().await {
        Ok(()) => Ok(()),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}
