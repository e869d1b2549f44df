use anyhow::{Context, Result};
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

/// Auth schema, applied idempotently at startup
const AUTH_MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS sys_users (
    id TEXT PRIMARY KEY NOT NULL,
    username TEXT NOT NULL UNIQUE,
    email TEXT,
    password_hash TEXT NOT NULL,
    full_name TEXT,
    is_active INTEGER NOT NULL DEFAULT 1,
    is_admin INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    last_login_at TEXT,
    created_by TEXT
);

CREATE TABLE IF NOT EXISTS sys_settings (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    description TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sys_refresh_tokens (
    id TEXT PRIMARY KEY NOT NULL,
    user_id TEXT NOT NULL,
    token_hash TEXT NOT NULL,
    expires_at TEXT NOT NULL,
    created_at TEXT NOT NULL,
    revoked_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_sys_refresh_tokens_hash ON sys_refresh_tokens (token_hash);
"#;

/// Apply the authentication system migration
pub async fn apply_auth_migration() -> Result<()> {
    use crate::shared::data::db::get_connection;

    let conn = get_connection();

    // SQLite executes one statement at a time through sea-orm
    for (idx, statement) in AUTH_MIGRATION_SQL.split(';').enumerate() {
        let trimmed = statement.trim();
        if !trimmed.is_empty() {
            conn.execute(Statement::from_string(
                DatabaseBackend::Sqlite,
                format!("{};", trimmed),
            ))
            .await
            .with_context(|| format!("Failed to execute auth migration statement #{}", idx))?;
        }
    }

    tracing::info!("Auth system migration applied");

    Ok(())
}

/// Create the default admin user when the user table is empty
pub async fn ensure_admin_user_exists() -> Result<()> {
    use crate::system::users::{repository, service};
    use contracts::system::users::CreateUserDto;

    let count = repository::count_users().await?;

    if count == 0 {
        tracing::info!("No users found. Creating default admin user...");

        let admin_dto = CreateUserDto {
            username: "admin".to_string(),
            password: "admin".to_string(),
            email: None,
            full_name: Some("Administrator".to_string()),
            is_admin: true,
        };

        let admin_id = service::create(admin_dto, None).await?;

        tracing::warn!("Default admin user created (username: admin, password: admin)");
        tracing::warn!("User ID: {} - change the password immediately", admin_id);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db;
    use uuid::Uuid;

    #[tokio::test]
    async fn migration_and_admin_bootstrap_are_idempotent() {
        let path = std::env::temp_dir().join(format!("sys-test-{}.db", Uuid::new_v4()));
        db::initialize_database(Some(path.to_str().unwrap()))
            .await
            .unwrap();

        apply_auth_migration().await.unwrap();
        apply_auth_migration().await.unwrap();

        ensure_admin_user_exists().await.unwrap();
        ensure_admin_user_exists().await.unwrap();

        let count = crate::system::users::repository::count_users().await.unwrap();
        assert_eq!(count, 1);
    }
}
