use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

/// Create a table if it is not present yet (minimal schema bootstrap)
async fn ensure_table(
    conn: &DatabaseConnection,
    table: &str,
    create_sql: &str,
) -> anyhow::Result<()> {
    let check = format!(
        "SELECT name FROM sqlite_master WHERE type='table' AND name='{}';",
        table
    );
    let existing = conn
        .query_all(Statement::from_string(DatabaseBackend::Sqlite, check))
        .await?;

    if existing.is_empty() {
        tracing::info!("Creating {} table", table);
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            create_sql.to_string(),
        ))
        .await?;
    }
    Ok(())
}

pub async fn initialize_database(db_path: Option<&str>) -> anyhow::Result<()> {
    // Repeated initialization is a no-op so test modules can share one
    // process-wide connection
    if DB_CONN.get().is_some() {
        return Ok(());
    }

    let db_file = db_path.unwrap_or("target/db/app.db");
    if let Some(parent) = std::path::Path::new(db_file).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if std::path::Path::new(db_file).is_absolute() {
        std::path::PathBuf::from(db_file)
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);
    let conn = Database::connect(&db_url).await?;

    // a001_color
    ensure_table(
        &conn,
        "a001_color",
        r#"
        CREATE TABLE a001_color (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL,
            comment TEXT,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            is_posted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
    "#,
    )
    .await?;

    // a002_location
    ensure_table(
        &conn,
        "a002_location",
        r#"
        CREATE TABLE a002_location (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL,
            comment TEXT,
            kind TEXT NOT NULL DEFAULT 'warehouse',
            address TEXT,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            is_posted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
    "#,
    )
    .await?;

    // a003_product
    ensure_table(
        &conn,
        "a003_product",
        r#"
        CREATE TABLE a003_product (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL,
            comment TEXT,
            sku TEXT NOT NULL DEFAULT '',
            pairs_per_box INTEGER NOT NULL DEFAULT 0,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            is_posted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
    "#,
    )
    .await?;

    // a004_goods_receipt
    ensure_table(
        &conn,
        "a004_goods_receipt",
        r#"
        CREATE TABLE a004_goods_receipt (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL,
            comment TEXT,
            document_no TEXT NOT NULL,
            document_date TEXT NOT NULL,
            location_id TEXT NOT NULL,
            lines_json TEXT,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            is_posted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
    "#,
    )
    .await?;

    // a005_sale
    ensure_table(
        &conn,
        "a005_sale",
        r#"
        CREATE TABLE a005_sale (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL,
            comment TEXT,
            document_no TEXT NOT NULL,
            document_date TEXT NOT NULL,
            location_id TEXT NOT NULL,
            lines_json TEXT,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            is_posted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
    "#,
    )
    .await?;

    // p900_stock_balance: NK (location_id, product_id, color_id)
    ensure_table(
        &conn,
        "p900_stock_balance",
        r#"
        CREATE TABLE p900_stock_balance (
            location_id TEXT NOT NULL,
            product_id TEXT NOT NULL,
            color_id TEXT NOT NULL,
            box_qty INTEGER NOT NULL DEFAULT 0,
            pair_qty INTEGER NOT NULL DEFAULT 0,
            updated_at TEXT,
            PRIMARY KEY (location_id, product_id, color_id)
        );
    "#,
    )
    .await?;

    // p901_conversion: one row per (location, product, color) being counted
    ensure_table(
        &conn,
        "p901_conversion",
        r#"
        CREATE TABLE p901_conversion (
            id TEXT PRIMARY KEY NOT NULL,
            location_id TEXT NOT NULL,
            product_id TEXT NOT NULL,
            color_id TEXT NOT NULL,
            ready_box_count INTEGER NOT NULL DEFAULT 0,
            expected_pairs INTEGER NOT NULL DEFAULT 0,
            actual_pairs_entered INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            UNIQUE (location_id, product_id, color_id)
        );
    "#,
    )
    .await?;

    // p902_conversion_history: append-only finished-box log
    ensure_table(
        &conn,
        "p902_conversion_history",
        r#"
        CREATE TABLE p902_conversion_history (
            id TEXT PRIMARY KEY NOT NULL,
            conversion_id TEXT NOT NULL,
            location_id TEXT NOT NULL,
            product_id TEXT NOT NULL,
            color_id TEXT NOT NULL,
            product_sku TEXT NOT NULL DEFAULT '',
            product_name TEXT NOT NULL DEFAULT '',
            color_name TEXT NOT NULL DEFAULT '',
            finished_at TEXT NOT NULL,
            finished_by TEXT
        );
    "#,
    )
    .await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}
