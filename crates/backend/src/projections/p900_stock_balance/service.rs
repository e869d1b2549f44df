use anyhow::Result;
use contracts::projections::p900_stock_balance::dto::StockBalanceDto;
use std::collections::HashMap;

use super::repository;
use crate::domain::{a001_color, a003_product};

/// Stock view of one location, enriched with product/color display attributes
pub async fn list_stock(location_id: &str) -> Result<Vec<StockBalanceDto>> {
    let rows = repository::list_by_location(location_id).await?;

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

    let mut items: Vec<StockBalanceDto> = rows
        .into_iter()
        .map(|row| {
            let (product_sku, product_name) = products
                .get(&row.product_id)
                .cloned()
                .unwrap_or_else(|| (String::new(), String::new()));
            let color_name = colors.get(&row.color_id).cloned().unwrap_or_default();
            StockBalanceDto {
                location_id: row.location_id,
                product_id: row.product_id,
                color_id: row.color_id,
                product_sku,
                product_name,
                color_name,
                box_qty: row.box_qty,
                pair_qty: row.pair_qty,
            }
        })
        .collect();

    items.sort_by(|a, b| {
        a.product_name
            .to_lowercase()
            .cmp(&b.product_name.to_lowercase())
            .then_with(|| a.color_name.to_lowercase().cmp(&b.color_name.to_lowercase()))
    });

    Ok(items)
}
