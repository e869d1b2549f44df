use chrono::Utc;
use contracts::domain::a005_sale::aggregate::{Sale, SaleId};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a005_sale")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub document_no: String,
    pub document_date: String,
    pub location_id: String,
    pub lines_json: Option<String>,
    pub is_deleted: bool,
    pub is_posted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Sale {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            is_posted: m.is_posted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        Sale {
            base: BaseAggregate::with_metadata(
                SaleId(uuid),
                m.code,
                m.description,
                m.comment.clone(),
                metadata,
            ),
            document_no: m.document_no,
            document_date: m.document_date,
            location_id: m.location_id,
            lines_json: m.lines_json,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

/// Documents newest first by document date
pub async fn list_all() -> anyhow::Result<Vec<Sale>> {
    let items: Vec<Sale> = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_desc(Column::DocumentDate)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

/// Posted sales of one location, optionally restricted to a date range
pub async fn list_history(
    location_id: &str,
    date_from: Option<&str>,
    date_to: Option<&str>,
) -> anyhow::Result<Vec<Sale>> {
    let mut query = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::IsPosted.eq(true))
        .filter(Column::LocationId.eq(location_id));

    if let Some(from) = date_from {
        query = query.filter(Column::DocumentDate.gte(from.to_string()));
    }
    if let Some(to) = date_to {
        query = query.filter(Column::DocumentDate.lte(to.to_string()));
    }

    let items: Vec<Sale> = query
        .order_by_desc(Column::DocumentDate)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Sale>> {
    let result = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(result.map(Into::into))
}

pub async fn insert(aggregate: &Sale) -> anyhow::Result<Uuid> {
    let uuid = aggregate.base.id.value();
    let active = ActiveModel {
        id: Set(uuid.to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        document_no: Set(aggregate.document_no.clone()),
        document_date: Set(aggregate.document_date.clone()),
        location_id: Set(aggregate.location_id.clone()),
        lines_json: Set(aggregate.lines_json.clone()),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        is_posted: Set(aggregate.base.metadata.is_posted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    };
    active.insert(conn()).await?;
    Ok(uuid)
}

pub async fn update(aggregate: &Sale) -> anyhow::Result<()> {
    let id = aggregate.base.id.value().to_string();
    let active = ActiveModel {
        id: Set(id),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        document_no: Set(aggregate.document_no.clone()),
        document_date: Set(aggregate.document_date.clone()),
        location_id: Set(aggregate.location_id.clone()),
        lines_json: Set(aggregate.lines_json.clone()),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        is_posted: Set(aggregate.base.metadata.is_posted),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
        created_at: sea_orm::ActiveValue::NotSet,
    };
    active.update(conn()).await?;
    Ok(())
}

/// Flip the posted flag without rewriting the rest of the row
pub async fn set_posted(id: Uuid, posted: bool) -> anyhow::Result<bool> {
    use sea_orm::sea_query::Expr;
    let result = Entity::update_many()
        .col_expr(Column::IsPosted, Expr::value(posted))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id.to_string()))
        .exec(conn())
        .await?;
    Ok(result.rows_affected > 0)
}

pub async fn soft_delete(id: Uuid) -> anyhow::Result<bool> {
    use sea_orm::sea_query::Expr;
    let result = Entity::update_many()
        .col_expr(Column::IsDeleted, Expr::value(true))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id.to_string()))
        .exec(conn())
        .await?;
    Ok(result.rows_affected > 0)
}
