use super::repository;
use contracts::domain::a002_location::aggregate::{Location, LocationDto};
use contracts::enums::LocationKind;
use uuid::Uuid;

use crate::shared::config;

/// Create a new location
pub async fn create(dto: LocationDto) -> anyhow::Result<Uuid> {
    let code = dto
        .code
        .clone()
        .unwrap_or_else(|| format!("LOC-{}", Uuid::new_v4()));
    let mut aggregate =
        Location::new_for_insert(code, dto.description, dto.kind, dto.address, dto.comment);

    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    aggregate.before_write();

    repository::insert(&aggregate).await
}

/// Update an existing location
pub async fn update(dto: LocationDto) -> anyhow::Result<()> {
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

/// Soft delete a location
pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    repository::soft_delete(id).await
}

/// Get a location by ID
pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Location>> {
    repository::get_by_id(id).await
}

/// List all locations
pub async fn list_all() -> anyhow::Result<Vec<Location>> {
    repository::list_all().await
}

/// Resolve the configured main warehouse to a location
///
/// The warehouse code comes from `[app].main_warehouse_code`; screens never
/// hardcode a location id.
pub async fn get_main_warehouse() -> anyhow::Result<Location> {
    let code = &config::get_config().app.main_warehouse_code;
    repository::get_by_code(code)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Main warehouse '{}' is not registered", code))
}

/// Seed test data
pub async fn insert_test_data() -> anyhow::Result<()> {
    let main_code = config::get_config().app.main_warehouse_code.clone();
    let data = vec![
        LocationDto {
            id: None,
            code: Some(main_code),
            description: "Gudang Utama".into(),
            kind: LocationKind::Warehouse,
            address: Some("Jl. Industri No. 1".into()),
            comment: Some("Main warehouse".into()),
        },
        LocationDto {
            id: None,
            code: Some("ST-001".into()),
            description: "Toko Pusat".into(),
            kind: LocationKind::Store,
            address: Some("Jl. Pasar Baru No. 10".into()),
            comment: None,
        },
    ];

    for dto in data {
        create(dto).await?;
    }

    Ok(())
}
