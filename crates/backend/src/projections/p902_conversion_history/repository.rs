use anyhow::Result;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;

/// One finished-box event (append-only)
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "p902_conversion_history")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub conversion_id: String,
    pub location_id: String,
    pub product_id: String,
    pub color_id: String,

    // Display snapshot taken at event time
    pub product_sku: String,
    pub product_name: String,
    pub color_name: String,

    /// RFC 3339, UTC
    pub finished_at: String,
    #[sea_orm(nullable)]
    pub finished_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

/// Append one event to the log
pub async fn insert(event: Model) -> Result<()> {
    let active = ActiveModel {
        id: Set(event.id),
        conversion_id: Set(event.conversion_id),
        location_id: Set(event.location_id),
        product_id: Set(event.product_id),
        color_id: Set(event.color_id),
        product_sku: Set(event.product_sku),
        product_name: Set(event.product_name),
        color_name: Set(event.color_name),
        finished_at: Set(event.finished_at),
        finished_by: Set(event.finished_by),
    };
    active.insert(conn()).await?;
    Ok(())
}

/// List events, newest first, with optional location and date-range filters
///
/// Date bounds are inclusive calendar dates ("YYYY-MM-DD"); the comparison
/// against the RFC 3339 timestamps is lexicographic, which is safe for UTC.
pub async fn list(
    location_id: Option<&str>,
    date_from: Option<&str>,
    date_to: Option<&str>,
) -> Result<Vec<Model>> {
    let mut query = Entity::find();

    if let Some(location_id) = location_id {
        query = query.filter(Column::LocationId.eq(location_id));
    }
    if let Some(from) = date_from {
        query = query.filter(Column::FinishedAt.gte(from.to_string()));
    }
    if let Some(to) = date_to {
        query = query.filter(Column::FinishedAt.lte(format!("{}T23:59:59.999999999+00:00", to)));
    }

    let items = query
        .order_by_desc(Column::FinishedAt)
        .all(conn())
        .await?;
    Ok(items)
}

pub fn new_event_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db;

    async fn init_test_db() {
        let path = std::env::temp_dir().join(format!("p902-test-{}.db", Uuid::new_v4()));
        db::initialize_database(Some(path.to_str().unwrap()))
            .await
            .unwrap();
    }

    async fn seed_event(location_id: &str, finished_at: &str) -> String {
        let id = new_event_id();
        insert(Model {
            id: id.clone(),
            conversion_id: Uuid::new_v4().to_string(),
            location_id: location_id.into(),
            product_id: Uuid::new_v4().to_string(),
            color_id: Uuid::new_v4().to_string(),
            product_sku: "SJ-CLS".into(),
            product_name: "Sandal Jepit Classic".into(),
            color_name: "Hitam".into(),
            finished_at: finished_at.into(),
            finished_by: None,
        })
        .await
        .unwrap();
        id
    }

    #[tokio::test]
    async fn date_range_bounds_are_inclusive_and_order_is_newest_first() {
        init_test_db().await;
        let location_id = Uuid::new_v4().to_string();

        // Late-evening timestamp on the upper bound exercises the
        // end-of-day comparison against RFC 3339 values
        let first = seed_event(&location_id, "2026-08-01T08:00:00+00:00").await;
        let second = seed_event(&location_id, "2026-08-02T12:30:00+00:00").await;
        let third = seed_event(&location_id, "2026-08-03T23:45:00+00:00").await;

        let all = list(Some(&location_id), None, None).await.unwrap();
        assert_eq!(
            all.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(),
            vec![third.as_str(), second.as_str(), first.as_str()]
        );

        // Both calendar-date bounds include their full day
        let bounded = list(Some(&location_id), Some("2026-08-01"), Some("2026-08-02"))
            .await
            .unwrap();
        assert_eq!(
            bounded.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(),
            vec![second.as_str(), first.as_str()]
        );

        let upper_only = list(Some(&location_id), Some("2026-08-03"), Some("2026-08-03"))
            .await
            .unwrap();
        assert_eq!(upper_only.len(), 1);
        assert_eq!(upper_only[0].id, third);

        let outside = list(Some(&location_id), Some("2026-08-04"), None)
            .await
            .unwrap();
        assert!(outside.is_empty());
    }
}
