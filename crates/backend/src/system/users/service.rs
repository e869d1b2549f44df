use anyhow::Result;
use chrono::Utc;
use contracts::system::users::{ChangePasswordDto, CreateUserDto, UpdateUserDto, User};

use super::repository;
use crate::system::auth::password;

/// Create a new user
pub async fn create(dto: CreateUserDto, created_by: Option<String>) -> Result<String> {
    if dto.username.trim().is_empty() {
        return Err(anyhow::anyhow!("Username cannot be empty"));
    }

    if repository::get_by_username(&dto.username).await?.is_some() {
        return Err(anyhow::anyhow!("Username already exists"));
    }

    if let Some(ref email) = dto.email {
        if !email.trim().is_empty() && !email.contains('@') {
            return Err(anyhow::anyhow!("Invalid email format"));
        }
    }

    password::validate_password_strength(&dto.password)?;
    let password_hash = password::hash_password(&dto.password)?;

    let user_id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    let user = User {
        id: user_id.clone(),
        username: dto.username,
        email: dto.email,
        full_name: dto.full_name,
        is_active: true,
        is_admin: dto.is_admin,
        created_at: now.clone(),
        updated_at: now,
        last_login_at: None,
        created_by,
    };

    repository::create_with_password(&user, &password_hash).await?;

    Ok(user_id)
}

/// Update user attributes (password changes go through change_password)
pub async fn update(dto: UpdateUserDto) -> Result<()> {
    let mut user = repository::get_by_id(&dto.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("User not found"))?;

    if let Some(ref email) = dto.email {
        if !email.trim().is_empty() && !email.contains('@') {
            return Err(anyhow::anyhow!("Invalid email format"));
        }
    }

    user.email = dto.email;
    user.full_name = dto.full_name;
    user.is_active = dto.is_active;
    user.is_admin = dto.is_admin;
    user.updated_at = Utc::now().to_rfc3339();

    repository::update(&user).await?;

    Ok(())
}

/// Delete user
pub async fn delete(id: &str) -> Result<bool> {
    repository::delete(id).await
}

/// Get user by ID
pub async fn get_by_id(id: &str) -> Result<Option<User>> {
    repository::get_by_id(id).await
}

/// List all users
pub async fn list_all() -> Result<Vec<User>> {
    repository::list_all().await
}

/// Change a user's password
///
/// Admins may change anyone's password without the old one; everyone else
/// changes only their own and must present the old password when it is set.
pub async fn change_password(dto: ChangePasswordDto, requester_id: &str) -> Result<()> {
    repository::get_by_id(&dto.user_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("User not found"))?;

    let requester = repository::get_by_id(requester_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Requester not found"))?;

    if dto.user_id != requester_id {
        if !requester.is_admin {
            return Err(anyhow::anyhow!("Permission denied"));
        }
    } else if let Some(ref old_password) = dto.old_password {
        let current_hash = repository::get_password_hash(&dto.user_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Password hash not found"))?;

        if !password::verify_password(old_password, &current_hash)? {
            return Err(anyhow::anyhow!("Invalid old password"));
        }
    }

    password::validate_password_strength(&dto.new_password)?;
    let new_hash = password::hash_password(&dto.new_password)?;

    repository::update_password(&dto.user_id, &new_hash).await?;

    Ok(())
}

/// Verify credentials at login
pub async fn verify_credentials(username: &str, password_input: &str) -> Result<Option<User>> {
    let user = match repository::get_by_username(username).await? {
        Some(u) => u,
        None => return Ok(None),
    };

    if !user.is_active {
        return Err(anyhow::anyhow!("User account is inactive"));
    }

    let password_hash = repository::get_password_hash(&user.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Password hash not found"))?;

    if !password::verify_password(password_input, &password_hash)? {
        return Ok(None);
    }

    let _ = repository::update_last_login(&user.id).await;

    Ok(Some(user))
}
