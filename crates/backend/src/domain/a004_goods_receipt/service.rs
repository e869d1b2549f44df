use super::repository;
use contracts::domain::a004_goods_receipt::aggregate::{GoodsReceipt, GoodsReceiptDto};
use uuid::Uuid;

use crate::projections::{p900_stock_balance, p901_conversion};

/// Create a new goods receipt (draft, not posted)
pub async fn create(dto: GoodsReceiptDto) -> anyhow::Result<Uuid> {
    let mut aggregate = GoodsReceipt::new_for_insert(
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

/// Update a draft goods receipt
pub async fn update(dto: GoodsReceiptDto) -> anyhow::Result<()> {
    let id = dto
        .id
        .as_ref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| anyhow::anyhow!("Invalid ID"))?;

    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Not found"))?;

    // Posted documents have already moved the registers
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

/// Soft delete a draft goods receipt
pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    if let Some(aggregate) = repository::get_by_id(id).await? {
        if aggregate.base.metadata.is_posted {
            return Err(anyhow::anyhow!("Cannot delete a posted document"));
        }
    }
    repository::soft_delete(id).await
}

/// Get a goods receipt by ID
pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<GoodsReceipt>> {
    repository::get_by_id(id).await
}

/// List all goods receipts
pub async fn list_all() -> anyhow::Result<Vec<GoodsReceipt>> {
    repository::list_all().await
}

/// Post the document: move its lines into the registers
///
/// Per line the stock balance gains `box_count` boxes and the conversion
/// tracker gains `box_count` ready boxes plus the anticipated pairs.
pub async fn post(id: Uuid) -> anyhow::Result<()> {
    let aggregate = repository::get_by_id(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Not found"))?;

    if aggregate.base.metadata.is_posted {
        return Err(anyhow::anyhow!("Document is already posted"));
    }

    for line in aggregate.parse_lines() {
        p900_stock_balance::repository::apply_delta(
            &aggregate.location_id,
            &line.product_id,
            &line.color_id,
            line.box_count,
            0,
        )
        .await?;
        p901_conversion::repository::apply_receipt_delta(
            &aggregate.location_id,
            &line.product_id,
            &line.color_id,
            line.box_count,
            line.expected_pairs(),
        )
        .await?;
    }

    repository::set_posted(id, true).await?;
    tracing::info!(document_no = %aggregate.document_no, "goods receipt posted");
    Ok(())
}

/// Unpost the document: reverse its register movements
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
            -line.box_count,
            0,
        )
        .await?;
        p901_conversion::repository::apply_receipt_delta(
            &aggregate.location_id,
            &line.product_id,
            &line.color_id,
            -line.box_count,
            -line.expected_pairs(),
        )
        .await?;
    }

    repository::set_posted(id, false).await?;
    tracing::info!(document_no = %aggregate.document_no, "goods receipt unposted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db;
    use contracts::domain::a004_goods_receipt::aggregate::GoodsReceiptLine;

    async fn init_test_db() {
        let path = std::env::temp_dir().join(format!("a004-test-{}.db", Uuid::new_v4()));
        db::initialize_database(Some(path.to_str().unwrap()))
            .await
            .unwrap();
    }

    fn receipt_dto(location_id: &str, line: GoodsReceiptLine) -> GoodsReceiptDto {
        GoodsReceiptDto {
            id: None,
            document_no: format!("GR-{}", Uuid::new_v4()),
            document_date: "2026-08-01".into(),
            location_id: location_id.into(),
            lines: vec![line],
            comment: None,
        }
    }

    fn line(box_count: i64, pairs_per_box: i64) -> GoodsReceiptLine {
        GoodsReceiptLine {
            product_id: Uuid::new_v4().to_string(),
            color_id: Uuid::new_v4().to_string(),
            box_count,
            pairs_per_box,
        }
    }

    #[tokio::test]
    async fn posting_feeds_stock_and_conversion_registers() {
        init_test_db().await;
        let location_id = Uuid::new_v4().to_string();
        let l = line(3, 20);
        let id = create(receipt_dto(&location_id, l.clone())).await.unwrap();

        post(id).await.unwrap();

        let stock = p900_stock_balance::repository::get(&location_id, &l.product_id, &l.color_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stock.box_qty, 3);
        assert_eq!(stock.pair_qty, 0);

        let tracker = p901_conversion::repository::get_by_key(
            &location_id,
            &l.product_id,
            &l.color_id,
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(tracker.ready_box_count, 3);
        assert_eq!(tracker.expected_pairs, 60);
        assert_eq!(tracker.actual_pairs_entered, 0);
    }

    #[tokio::test]
    async fn double_post_is_rejected() {
        init_test_db().await;
        let location_id = Uuid::new_v4().to_string();
        let l = line(1, 12);
        let id = create(receipt_dto(&location_id, l.clone())).await.unwrap();

        post(id).await.unwrap();
        assert!(post(id).await.is_err());

        // Registers moved exactly once
        let stock = p900_stock_balance::repository::get(&location_id, &l.product_id, &l.color_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stock.box_qty, 1);
    }

    #[tokio::test]
    async fn unpost_reverses_register_movements() {
        init_test_db().await;
        let location_id = Uuid::new_v4().to_string();
        let l = line(2, 10);
        let id = create(receipt_dto(&location_id, l.clone())).await.unwrap();

        post(id).await.unwrap();
        unpost(id).await.unwrap();

        let stock = p900_stock_balance::repository::get(&location_id, &l.product_id, &l.color_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stock.box_qty, 0);

        let tracker = p901_conversion::repository::get_by_key(
            &location_id,
            &l.product_id,
            &l.color_id,
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(tracker.ready_box_count, 0);
        assert_eq!(tracker.expected_pairs, 0);
    }

    #[tokio::test]
    async fn posted_documents_cannot_be_edited_or_deleted() {
        init_test_db().await;
        let location_id = Uuid::new_v4().to_string();
        let id = create(receipt_dto(&location_id, line(1, 20))).await.unwrap();
        post(id).await.unwrap();

        let mut dto = receipt_dto(&location_id, line(5, 20));
        dto.id = Some(id.to_string());
        assert!(update(dto).await.is_err());
        assert!(delete(id).await.is_err());
    }
}
