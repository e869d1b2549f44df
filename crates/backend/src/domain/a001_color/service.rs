use super::repository;
use contracts::domain::a001_color::aggregate::{Color, ColorDto};
use uuid::Uuid;

/// Create a new color
pub async fn create(dto: ColorDto) -> anyhow::Result<Uuid> {
    let code = dto
        .code
        .clone()
        .unwrap_or_else(|| format!("CLR-{}", Uuid::new_v4()));
    let mut aggregate = Color::new_for_insert(code, dto.description, dto.comment);

    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    aggregate.before_write();

    repository::insert(&aggregate).await
}

/// Update an existing color
pub async fn update(dto: ColorDto) -> anyhow::Result<()> {
    let id = dto
        .id
        .as_ref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| anyhow::anyhow!("Invalid ID"))?;

    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Not found"))?;

    aggregate.update(&dto);

    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    aggregate.before_write();

    repository::update(&aggregate).await
}

/// Soft delete a color
pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    repository::soft_delete(id).await
}

/// Get a color by ID
pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Color>> {
    repository::get_by_id(id).await
}

/// List all colors
pub async fn list_all() -> anyhow::Result<Vec<Color>> {
    repository::list_all().await
}

/// Seed test data
pub async fn insert_test_data() -> anyhow::Result<()> {
    let data = vec![
        ColorDto {
            id: None,
            code: Some("CLR-001".into()),
            description: "Hitam".into(),
            comment: Some("Black".into()),
        },
        ColorDto {
            id: None,
            code: Some("CLR-002".into()),
            description: "Putih".into(),
            comment: Some("White".into()),
        },
        ColorDto {
            id: None,
            code: Some("CLR-003".into()),
            description: "Merah".into(),
            comment: Some("Red".into()),
        },
    ];

    for dto in data {
        create(dto).await?;
    }

    Ok(())
}
