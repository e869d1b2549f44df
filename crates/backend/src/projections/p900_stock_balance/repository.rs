use anyhow::Result;
use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};

use crate::shared::data::db::get_connection;

/// Stock balance register entry
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "p900_stock_balance")]
pub struct Model {
    // NK (Natural Key): (location_id, product_id, color_id)
    #[sea_orm(primary_key, auto_increment = false)]
    pub location_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub product_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub color_id: String,

    // Quantities: unopened boxes and counted pairs
    pub box_qty: i64,
    pub pair_qty: i64,

    #[sea_orm(nullable)]
    pub updated_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

/// All balances of one location
pub async fn list_by_location(location_id: &str) -> Result<Vec<Model>> {
    let items = Entity::find()
        .filter(Column::LocationId.eq(location_id))
        .all(conn())
        .await?;
    Ok(items)
}

/// One balance row by natural key
pub async fn get(location_id: &str, product_id: &str, color_id: &str) -> Result<Option<Model>> {
    let item = Entity::find()
        .filter(Column::LocationId.eq(location_id))
        .filter(Column::ProductId.eq(product_id))
        .filter(Column::ColorId.eq(color_id))
        .one(conn())
        .await?;
    Ok(item)
}

/// Apply a quantity delta to one balance row, creating it on first touch
///
/// Only document posting and the pair-count entry flow go through here; the
/// register has no other writers.
pub async fn apply_delta(
    location_id: &str,
    product_id: &str,
    color_id: &str,
    box_delta: i64,
    pair_delta: i64,
) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    let existing = get(location_id, product_id, color_id).await?;

    match existing {
        Some(row) => {
            let active = ActiveModel {
                location_id: Set(row.location_id),
                product_id: Set(row.product_id),
                color_id: Set(row.color_id),
                box_qty: Set(row.box_qty + box_delta),
                pair_qty: Set(row.pair_qty + pair_delta),
                updated_at: Set(Some(now)),
            };
            active.update(conn()).await?;
        }
        None => {
            let active = ActiveModel {
                location_id: Set(location_id.to_string()),
                product_id: Set(product_id.to_string()),
                color_id: Set(color_id.to_string()),
                box_qty: Set(box_delta),
                pair_qty: Set(pair_delta),
                updated_at: Set(Some(now)),
            };
            active.insert(conn()).await?;
        }
    }

    Ok(())
}
