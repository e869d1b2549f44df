use axum::{
    extract::{Json, Path},
    http::StatusCode,
};
use contracts::system::users::{ChangePasswordDto, CreateUserDto, UpdateUserDto, User};

use crate::system::auth::extractor::CurrentUser;
use crate::system::users::service;

/// List all users (admin only, enforced by middleware)
pub async fn list() -> Result<Json<Vec<User>>, StatusCode> {
    match service::list_all().await {
        Ok(users) => Ok(Json(users)),
        Err(e) => {
            tracing::error!("Failed to list users: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get a user by ID
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<User>, StatusCode> {
    match service::get_by_id(&id).await {
        Ok(Some(user)) => Ok(Json(user)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to get user: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Create a user
pub async fn create(
    CurrentUser(claims): CurrentUser,
    Json(dto): Json<CreateUserDto>,
) -> Result<Json<String>, StatusCode> {
    match service::create(dto, Some(claims.sub)).await {
        Ok(id) => Ok(Json(id)),
        Err(e) => {
            tracing::error!("Failed to create user: {}", e);
            Err(StatusCode::BAD_REQUEST)
        }
    }
}

/// Update a user
pub async fn update(
    Path(id): Path<String>,
    Json(mut dto): Json<UpdateUserDto>,
) -> Result<StatusCode, StatusCode> {
    dto.id = id;
    match service::update(dto).await {
        Ok(()) => Ok(StatusCode::OK),
        Err(e) => {
            tracing::error!("Failed to update user: {}", e);
            Err(StatusCode::BAD_REQUEST)
        }
    }
}

/// Delete a user
pub async fn delete(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    // Admins cannot delete themselves
    if claims.sub == id {
        return Err(StatusCode::BAD_REQUEST);
    }

    match service::delete(&id).await {
        Ok(true) => Ok(StatusCode::OK),
        Ok(false) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to delete user: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Change a user's password
pub async fn change_password(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(mut dto): Json<ChangePasswordDto>,
) -> Result<StatusCode, StatusCode> {
    dto.user_id = id;
    match service::change_password(dto, &claims.sub).await {
        Ok(()) => Ok(StatusCode::OK),
        Err(e) => {
            tracing::error!("Failed to change password: {}", e);
            Err(StatusCode::BAD_REQUEST)
        }
    }
}
