use anyhow::Result;
use chrono::Utc;
use contracts::projections::p901_conversion::dto::ConversionItemDto;
use std::collections::HashMap;
use uuid::Uuid;

use super::{repository, ConversionError};
use crate::domain::{a001_color, a003_product};
use crate::projections::{p900_stock_balance, p902_conversion_history};

/// Ready-to-count list of one location
///
/// Returns only rows with `ready_box_count > 0`, enriched with product and
/// color display attributes. `remaining_pairs` is computed here and nowhere
/// else; a negative remainder means the actual-vs-expected invariant was
/// violated upstream, so it is logged, not hidden.
pub async fn list_ready(location_id: &str) -> Result<Vec<ConversionItemDto>> {
    let rows = repository::list_ready_by_location(location_id).await?;

    let products: HashMap<String, (String, String)> = a003_product::repository::list_all()
        .await?
        .into_iter()
        .map(|p| {
            (
                p.to_string_id(),
                (p.sku.clone(), p.base.description.clone()),
            )
        })
        .collect();
    let colors: HashMap<String, String> = a001_color::repository::list_all()
        .await?
        .into_iter()
        .map(|c| (c.to_string_id(), c.base.description.clone()))
        .collect();

    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        let remaining =
            ConversionItemDto::compute_remaining(row.expected_pairs, row.actual_pairs_entered);
        if remaining < 0 {
            tracing::warn!(
                conversion_id = %row.id,
                expected = row.expected_pairs,
                actual = row.actual_pairs_entered,
                "actual pairs entered exceed expected pairs"
            );
        }

        let (product_sku, product_name) = products
            .get(&row.product_id)
            .cloned()
            .unwrap_or_else(|| (String::new(), String::new()));
        let color_name = colors.get(&row.color_id).cloned().unwrap_or_default();

        items.push(ConversionItemDto {
            id: row.id,
            location_id: row.location_id,
            product_id: row.product_id,
            color_id: row.color_id,
            product_sku,
            product_name,
            color_name,
            ready_box_count: row.ready_box_count,
            expected_pairs: row.expected_pairs,
            actual_pairs_entered: row.actual_pairs_entered,
            remaining_pairs: remaining,
        });
    }

    items.sort_by(|a, b| {
        a.product_name
            .to_lowercase()
            .cmp(&b.product_name.to_lowercase())
            .then_with(|| a.color_name.to_lowercase().cmp(&b.color_name.to_lowercase()))
    });

    Ok(items)
}

/// Finish counting one box of a tracked row
///
/// Decrements `ready_box_count` by exactly one and appends a history event.
/// No other field changes; counted pairs arrive through `record_pairs`.
pub async fn finish_box(id: &str, finished_by: Option<String>) -> Result<(), ConversionError> {
    let affected = repository::decrement_ready_box(id).await?;

    if affected == 0 {
        // The guarded UPDATE did not match: either the row is gone or its
        // box count is already at the floor. Tell the caller which.
        return match repository::get_by_id(id).await? {
            None => Err(ConversionError::NotFound),
            Some(_) => Err(ConversionError::AlreadyEmpty),
        };
    }

    let row = repository::get_by_id(id)
        .await?
        .ok_or(ConversionError::NotFound)?;

    // Snapshot display attributes into the history event
    let mut product_sku = String::new();
    let mut product_name = String::new();
    if let Ok(product_id) = Uuid::parse_str(&row.product_id) {
        if let Some(p) = a003_product::repository::get_by_id(product_id).await? {
            product_sku = p.sku.clone();
            product_name = p.base.description.clone();
        }
    }
    let mut color_name = String::new();
    if let Ok(color_id) = Uuid::parse_str(&row.color_id) {
        if let Some(c) = a001_color::repository::get_by_id(color_id).await? {
            color_name = c.base.description.clone();
        }
    }

    p902_conversion_history::repository::insert(p902_conversion_history::repository::Model {
        id: p902_conversion_history::repository::new_event_id(),
        conversion_id: row.id.clone(),
        location_id: row.location_id.clone(),
        product_id: row.product_id.clone(),
        color_id: row.color_id.clone(),
        product_sku,
        product_name,
        color_name,
        finished_at: Utc::now().to_rfc3339(),
        finished_by,
    })
    .await?;

    tracing::info!(
        conversion_id = %row.id,
        ready_box_count = row.ready_box_count,
        "finished one box"
    );

    Ok(())
}

/// Record manually counted pairs against a tracked row
///
/// The pair-entry flow is deliberately separate from `finish_box`: opening a
/// box and tallying its real contents are two different user actions. The
/// counted pairs also become sellable stock in the balance register.
pub async fn record_pairs(id: &str, pairs: i64) -> Result<(), ConversionError> {
    if pairs <= 0 {
        return Err(ConversionError::InvalidPairCount(pairs));
    }

    let row = repository::get_by_id(id)
        .await?
        .ok_or(ConversionError::NotFound)?;

    repository::add_actual_pairs(id, pairs).await?;

    p900_stock_balance::repository::apply_delta(
        &row.location_id,
        &row.product_id,
        &row.color_id,
        0,
        pairs,
    )
    .await
    .map_err(ConversionError::Storage)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db;

    async fn init_test_db() {
        let path = std::env::temp_dir().join(format!("p901-test-{}.db", Uuid::new_v4()));
        db::initialize_database(Some(path.to_str().unwrap()))
            .await
            .unwrap();
    }

    fn fresh_key() -> (String, String, String) {
        (
            Uuid::new_v4().to_string(),
            Uuid::new_v4().to_string(),
            Uuid::new_v4().to_string(),
        )
    }

    async fn seed_row(boxes: i64, expected_pairs: i64) -> repository::Model {
        let (location_id, product_id, color_id) = fresh_key();
        repository::apply_receipt_delta(&location_id, &product_id, &color_id, boxes, expected_pairs)
            .await
            .unwrap();
        repository::get_by_key(&location_id, &product_id, &color_id)
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn finish_box_decrements_by_exactly_one() {
        init_test_db().await;
        let row = seed_row(3, 120).await;

        finish_box(&row.id, Some("tester".into())).await.unwrap();

        let after = repository::get_by_id(&row.id).await.unwrap().unwrap();
        assert_eq!(after.ready_box_count, 2);
        // Expected and actual are untouched by finishing
        assert_eq!(after.expected_pairs, 120);
        assert_eq!(after.actual_pairs_entered, 0);
    }

    #[tokio::test]
    async fn finish_box_records_history_event() {
        init_test_db().await;
        let row = seed_row(1, 20).await;

        finish_box(&row.id, Some("tester".into())).await.unwrap();

        let events = p902_conversion_history::repository::list(Some(&row.location_id), None, None)
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].conversion_id, row.id);
        assert_eq!(events[0].finished_by.as_deref(), Some("tester"));
    }

    #[tokio::test]
    async fn finish_box_refuses_at_zero_floor() {
        init_test_db().await;
        let row = seed_row(1, 20).await;

        finish_box(&row.id, None).await.unwrap();
        let err = finish_box(&row.id, None).await.unwrap_err();
        assert!(matches!(err, ConversionError::AlreadyEmpty));

        // Never negative
        let after = repository::get_by_id(&row.id).await.unwrap().unwrap();
        assert_eq!(after.ready_box_count, 0);
    }

    #[tokio::test]
    async fn finish_box_unknown_id_is_not_a_silent_noop() {
        init_test_db().await;
        let err = finish_box(&Uuid::new_v4().to_string(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ConversionError::NotFound));
    }

    #[tokio::test]
    async fn list_ready_skips_exhausted_rows() {
        init_test_db().await;
        let live = seed_row(2, 40).await;
        let drained = seed_row(1, 20).await;
        finish_box(&drained.id, None).await.unwrap();

        let live_items = list_ready(&live.location_id).await.unwrap();
        assert_eq!(live_items.len(), 1);
        assert_eq!(live_items[0].id, live.id);

        let drained_items = list_ready(&drained.location_id).await.unwrap();
        assert!(drained_items.is_empty());
    }

    #[tokio::test]
    async fn remaining_pairs_follows_recorded_counts() {
        init_test_db().await;
        let row = seed_row(3, 120).await;

        record_pairs(&row.id, 40).await.unwrap();

        let items = list_ready(&row.location_id).await.unwrap();
        assert_eq!(items[0].actual_pairs_entered, 40);
        assert_eq!(items[0].remaining_pairs, 80);

        // Counted pairs become sellable stock
        let stock =
            p900_stock_balance::repository::get(&row.location_id, &row.product_id, &row.color_id)
                .await
                .unwrap()
                .unwrap();
        assert_eq!(stock.pair_qty, 40);
    }

    #[tokio::test]
    async fn remaining_pairs_may_go_negative_when_invariant_breaks() {
        init_test_db().await;
        let row = seed_row(2, 10).await;

        // Upstream violation: more pairs entered than expected
        record_pairs(&row.id, 25).await.unwrap();

        let items = list_ready(&row.location_id).await.unwrap();
        assert_eq!(items[0].remaining_pairs, -15);
    }

    #[tokio::test]
    async fn record_pairs_rejects_non_positive_counts() {
        init_test_db().await;
        let row = seed_row(1, 20).await;

        let err = record_pairs(&row.id, 0).await.unwrap_err();
        assert!(matches!(err, ConversionError::InvalidPairCount(0)));
    }
}
