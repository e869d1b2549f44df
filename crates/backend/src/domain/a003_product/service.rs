use super::repository;
use contracts::domain::a003_product::aggregate::{Product, ProductDto};
use uuid::Uuid;

/// Create a new product
pub async fn create(dto: ProductDto) -> anyhow::Result<Uuid> {
    // SKU must stay unique across products
    if repository::get_by_sku(&dto.sku).await?.is_some() {
        return Err(anyhow::anyhow!("SKU '{}' already exists", dto.sku));
    }

    let code = dto
        .code
        .clone()
        .unwrap_or_else(|| format!("PRD-{}", Uuid::new_v4()));
    let mut aggregate = Product::new_for_insert(
        code,
        dto.description,
        dto.sku,
        dto.pairs_per_box,
        dto.comment,
    );

    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    aggregate.before_write();

    repository::insert(&aggregate).await
}

/// Update an existing product
pub async fn update(dto: ProductDto) -> anyhow::Result<()> {
    let id = dto
        .id
        .as_ref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| anyhow::anyhow!("Invalid ID"))?;

    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Not found"))?;

    // Reject SKU collisions with other products
    if let Some(existing) = repository::get_by_sku(&dto.sku).await? {
        if existing.base.id.value() != id {
            return Err(anyhow::anyhow!("SKU '{}' already exists", dto.sku));
        }
    }

    aggregate.update(&dto);

    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    aggregate.before_write();

    repository::update(&aggregate).await
}

/// Soft delete a product
pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    repository::soft_delete(id).await
}

/// Get a product by ID
pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Product>> {
    repository::get_by_id(id).await
}

/// List all products
pub async fn list_all() -> anyhow::Result<Vec<Product>> {
    repository::list_all().await
}

/// Search products by SKU fragment
pub async fn search_by_sku(fragment: &str) -> anyhow::Result<Vec<Product>> {
    repository::search_by_sku(fragment).await
}

/// Seed test data
pub async fn insert_test_data() -> anyhow::Result<()> {
    let data = vec![
        ProductDto {
            id: None,
            code: Some("PRD-001".into()),
            description: "Sandal Jepit Classic".into(),
            sku: "SJ-CLS".into(),
            pairs_per_box: 20,
            comment: None,
        },
        ProductDto {
            id: None,
            code: Some("PRD-002".into()),
            description: "Sepatu Sport Runner".into(),
            sku: "SP-RUN".into(),
            pairs_per_box: 12,
            comment: None,
        },
    ];

    for dto in data {
        create(dto).await?;
    }

    Ok(())
}
