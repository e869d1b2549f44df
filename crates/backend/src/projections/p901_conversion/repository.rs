use anyhow::Result;
use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseBackend, EntityTrait, QueryFilter, Set, Statement,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;

/// Conversion tracker entry: boxes of one (location, product, color) key
/// waiting to be opened and counted into pairs
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "p901_conversion")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    // Tracked key, unique per row
    pub location_id: String,
    pub product_id: String,
    pub color_id: String,

    // Tracked state
    pub ready_box_count: i64,
    pub expected_pairs: i64,
    pub actual_pairs_entered: i64,

    #[sea_orm(nullable)]
    pub created_at: Option<String>,
    #[sea_orm(nullable)]
    pub updated_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

/// Rows with boxes still to count at one location
pub async fn list_ready_by_location(location_id: &str) -> Result<Vec<Model>> {
    let items = Entity::find()
        .filter(Column::LocationId.eq(location_id))
        .filter(Column::ReadyBoxCount.gt(0))
        .all(conn())
        .await?;
    Ok(items)
}

pub async fn get_by_id(id: &str) -> Result<Option<Model>> {
    let item = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(item)
}

pub async fn get_by_key(
    location_id: &str,
    product_id: &str,
    color_id: &str,
) -> Result<Option<Model>> {
    let item = Entity::find()
        .filter(Column::LocationId.eq(location_id))
        .filter(Column::ProductId.eq(product_id))
        .filter(Column::ColorId.eq(color_id))
        .one(conn())
        .await?;
    Ok(item)
}

/// Grow (or shrink, on unpost) a tracker row by a receipt delta,
/// creating the row on first receipt
pub async fn apply_receipt_delta(
    location_id: &str,
    product_id: &str,
    color_id: &str,
    box_delta: i64,
    expected_pairs_delta: i64,
) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    let existing = get_by_key(location_id, product_id, color_id).await?;

    match existing {
        Some(row) => {
            let active = ActiveModel {
                id: Set(row.id),
                location_id: Set(row.location_id),
                product_id: Set(row.product_id),
                color_id: Set(row.color_id),
                ready_box_count: Set(row.ready_box_count + box_delta),
                expected_pairs: Set(row.expected_pairs + expected_pairs_delta),
                actual_pairs_entered: Set(row.actual_pairs_entered),
                created_at: Set(row.created_at),
                updated_at: Set(Some(now)),
            };
            active.update(conn()).await?;
        }
        None => {
            let active = ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                location_id: Set(location_id.to_string()),
                product_id: Set(product_id.to_string()),
                color_id: Set(color_id.to_string()),
                ready_box_count: Set(box_delta),
                expected_pairs: Set(expected_pairs_delta),
                actual_pairs_entered: Set(0),
                created_at: Set(Some(now.clone())),
                updated_at: Set(Some(now)),
            };
            active.insert(conn()).await?;
        }
    }

    Ok(())
}

/// Atomic compare-and-decrement of the ready box count, floored at zero
///
/// The `ready_box_count > 0` guard lives in the UPDATE itself so two
/// concurrent finishes of the last box cannot both succeed; the loser sees
/// zero rows affected. Returns the number of affected rows (0 or 1).
pub async fn decrement_ready_box(id: &str) -> Result<u64> {
    let now = Utc::now().to_rfc3339();
    let result = conn()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "UPDATE p901_conversion
             SET ready_box_count = ready_box_count - 1, updated_at = ?
             WHERE id = ? AND ready_box_count > 0",
            [now.into(), id.to_string().into()],
        ))
        .await?;
    Ok(result.rows_affected())
}

/// Add manually counted pairs to a tracker row
pub async fn add_actual_pairs(id: &str, pairs: i64) -> Result<u64> {
    let now = Utc::now().to_rfc3339();
    let result = conn()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "UPDATE p901_conversion
             SET actual_pairs_entered = actual_pairs_entered + ?, updated_at = ?
             WHERE id = ?",
            [pairs.into(), now.into(), id.to_string().into()],
        ))
        .await?;
    Ok(result.rows_affected())
}
