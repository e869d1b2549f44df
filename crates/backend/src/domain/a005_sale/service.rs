use super::repository;
use contracts::domain::a005_sale::aggregate::{Sale, SaleDto};
use uuid::Uuid;

use crate::projections::p900_stock_balance;

/// Create a new sale (draft, not posted)
pub async fn create(dto: SaleDto) -> anyhow::Result<Uuid> {
    let mut aggregate = Sale::new_for_insert(
        dto.document_no,
        dto.document_date,
        dto.location_id,
        dto.lines,
        dto.comment,
    );

    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    aggregate.before_write();

    repository::insert(&aggregate).await
}

/// Update a draft sale
pub async fn update(dto: SaleDto) -> anyhow::Result<()> {
    let id = dto
        .id
        .as_ref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| anyhow::anyhow!("Invalid ID"))?;

    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Not found"))?;

    if aggregate.base.metadata.is_posted {
        return Err(anyhow::anyhow!("Cannot edit a posted document"));
    }

    aggregate.update(&dto);

    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    aggregate.before_write();

    repository::update(&aggregate).await
}

/// Soft delete a draft sale
pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    if let Some(aggregate) = repository::get_by_id(id).await? {
        if aggregate.base.metadata.is_posted {
            return Err(anyhow::anyhow!("Cannot delete a posted document"));
        }
    }
    repository::soft_delete(id).await
}

/// Get a sale by ID
pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Sale>> {
    repository::get_by_id(id).await
}

/// List all sales
pub async fn list_all() -> anyhow::Result<Vec<Sale>> {
    repository::list_all().await
}

/// Posted sales of one location within an optional date range
pub async fn list_history(
    location_id: &str,
    date_from: Option<&str>,
    date_to: Option<&str>,
) -> anyhow::Result<Vec<Sale>> {
    repository::list_history(location_id, date_from, date_to).await
}

/// Post the sale: take the sold pairs out of the stock balance
///
/// Only counted pairs are sellable, so each line is checked against the
/// pair quantity on hand before anything moves.
pub async fn post(id: Uuid) -> anyhow::Result<()> {
    let aggregate = repository::get_by_id(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Not found"))?;

    if aggregate.base.metadata.is_posted {
        return Err(anyhow::anyhow!("Document is already posted"));
    }

    let lines = aggregate.parse_lines();
    for line in &lines {
        let on_hand = p900_stock_balance::repository::get(
            &aggregate.location_id,
            &line.product_id,
            &line.color_id,
        )
        .await?
        .map(|s| s.pair_qty)
        .unwrap_or(0);

        if on_hand < line.quantity {
            return Err(anyhow::anyhow!(
                "Insufficient pair stock: {} on hand, {} requested",
                on_hand,
                line.quantity
            ));
        }
    }

    for line in &lines {
        p900_stock_balance::repository::apply_delta(
            &aggregate.location_id,
            &line.product_id,
            &line.color_id,
            0,
            -line.quantity,
        )
        .await?;
    }

    repository::set_posted(id, true).await?;
    tracing::info!(document_no = %aggregate.document_no, "sale posted");
    Ok(())
}

/// Unpost the sale: return the sold pairs to the stock balance
pub async fn unpost(id: Uuid) -> anyhow::Result<()> {
    let aggregate = repository::get_by_id(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Not found"))?;

    if !aggregate.base.metadata.is_posted {
        return Err(anyhow::anyhow!("Document is not posted"));
    }

    for line in aggregate.parse_lines() {
        p900_stock_balance::repository::apply_delta(
            &aggregate.location_id,
            &line.product_id,
            &line.color_id,
            0,
            line.quantity,
        )
        .await?;
    }

    repository::set_posted(id, false).await?;
    tracing::info!(document_no = %aggregate.document_no, "sale unposted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db;
    use contracts::domain::a005_sale::aggregate::SaleLine;

    async fn init_test_db() {
        let path = std::env::temp_dir().join(format!("a005-test-{}.db", Uuid::new_v4()));
        db::initialize_database(Some(path.to_str().unwrap()))
            .await
            .unwrap();
    }

    fn sale_dto(location_id: &str, line: SaleLine) -> SaleDto {
        SaleDto {
            id: None,
            document_no: format!("SL-{}", Uuid::new_v4()),
            document_date: "2026-08-10".into(),
            location_id: location_id.into(),
            lines: vec![line],
            comment: None,
        }
    }

    async fn stock_pairs(location_id: &str, product_id: &str, color_id: &str, pairs: i64) {
        p900_stock_balance::repository::apply_delta(location_id, product_id, color_id, 0, pairs)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn posting_takes_pairs_out_of_stock() {
        init_test_db().await;
        let location_id = Uuid::new_v4().to_string();
        let line = SaleLine {
            product_id: Uuid::new_v4().to_string(),
            color_id: Uuid::new_v4().to_string(),
            quantity: 3,
            unit_price: 50_000.0,
        };
        stock_pairs(&location_id, &line.product_id, &line.color_id, 10).await;

        let id = create(sale_dto(&location_id, line.clone())).await.unwrap();
        post(id).await.unwrap();

        let stock =
            p900_stock_balance::repository::get(&location_id, &line.product_id, &line.color_id)
                .await
                .unwrap()
                .unwrap();
        assert_eq!(stock.pair_qty, 7);
    }

    #[tokio::test]
    async fn posting_rejects_insufficient_pair_stock() {
        init_test_db().await;
        let location_id = Uuid::new_v4().to_string();
        let line = SaleLine {
            product_id: Uuid::new_v4().to_string(),
            color_id: Uuid::new_v4().to_string(),
            quantity: 5,
            unit_price: 50_000.0,
        };
        stock_pairs(&location_id, &line.product_id, &line.color_id, 2).await;

        let id = create(sale_dto(&location_id, line.clone())).await.unwrap();
        assert!(post(id).await.is_err());

        // Stock untouched by the failed post
        let stock =
            p900_stock_balance::repository::get(&location_id, &line.product_id, &line.color_id)
                .await
                .unwrap()
                .unwrap();
        assert_eq!(stock.pair_qty, 2);
    }

    #[tokio::test]
    async fn history_lists_only_posted_sales_of_the_location() {
        init_test_db().await;
        let location_id = Uuid::new_v4().to_string();
        let line = SaleLine {
            product_id: Uuid::new_v4().to_string(),
            color_id: Uuid::new_v4().to_string(),
            quantity: 1,
            unit_price: 75_000.0,
        };
        stock_pairs(&location_id, &line.product_id, &line.color_id, 5).await;

        let posted = create(sale_dto(&location_id, line.clone())).await.unwrap();
        post(posted).await.unwrap();
        create(sale_dto(&location_id, line.clone())).await.unwrap(); // stays draft

        let history = list_history(&location_id, None, None).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].base.id.value(), posted);

        // Date range outside the document date excludes it
        let none = list_history(&location_id, Some("2026-09-01"), None)
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn unpost_returns_pairs_to_stock() {
        init_test_db().await;
        let location_id = Uuid::new_v4().to_string();
        let line = SaleLine {
            product_id: Uuid::new_v4().to_string(),
            color_id: Uuid::new_v4().to_string(),
            quantity: 4,
            unit_price: 60_000.0,
        };
        stock_pairs(&location_id, &line.product_id, &line.color_id, 4).await;

        let id = create(sale_dto(&location_id, line.clone())).await.unwrap();
        post(id).await.unwrap();
        unpost(id).await.unwrap();

        let stock =
            p900_stock_balance::repository::get(&location_id, &line.product_id, &line.color_id)
                .await
                .unwrap()
                .unwrap();
        assert_eq!(stock.pair_qty, 4);
    }
}
