use chrono::Utc;
use contracts::domain::a001_product::{
    Product, ProductDraft, ProductFilter, ProductId, ProductPatch, ProductStatus, UpsertOutcome,
    Variant,
};
use contracts::domain::common::{AggregateId, EntityMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Select, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_product")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub sku: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub price_mur: f64,
    pub stock_qty: i64,
    /// JSON массив меток размеров
    pub sizes: String,
    /// JSON массив вариантов {size, stock}
    pub variants: String,
    pub color: Option<String>,
    pub fabric: Option<String>,
    pub status: String,
    pub image_url: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Product {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            version: m.version,
        };
        let id = ProductId::from_string(&m.id).unwrap_or_else(|e| {
            tracing::warn!("{} for sku={}, assigning a new id", e, m.sku);
            ProductId::new_v4()
        });
        let sizes: Vec<String> = serde_json::from_str(&m.sizes).unwrap_or_default();
        let variants: Vec<Variant> = serde_json::from_str(&m.variants).unwrap_or_default();
        let status = ProductStatus::parse(&m.status).unwrap_or_else(|| {
            tracing::warn!("Unknown status '{}' for sku={}, treating as draft", m.status, m.sku);
            ProductStatus::Draft
        });

        Product {
            id,
            sku: m.sku,
            name: m.name,
            category: m.category,
            price: m.price,
            price_mur: m.price_mur,
            stock_qty: m.stock_qty,
            sizes,
            variants,
            color: m.color,
            fabric: m.fabric,
            status,
            image_url: m.image_url,
            metadata,
        }
    }
}

fn to_active(aggregate: &Product) -> anyhow::Result<ActiveModel> {
    Ok(ActiveModel {
        id: Set(aggregate.id.as_string()),
        sku: Set(aggregate.sku.clone()),
        name: Set(aggregate.name.clone()),
        category: Set(aggregate.category.clone()),
        price: Set(aggregate.price),
        price_mur: Set(aggregate.price_mur),
        stock_qty: Set(aggregate.stock_qty),
        sizes: Set(serde_json::to_string(&aggregate.sizes)?),
        variants: Set(serde_json::to_string(&aggregate.variants)?),
        color: Set(aggregate.color.clone()),
        fabric: Set(aggregate.fabric.clone()),
        status: Set(aggregate.status.as_str().to_string()),
        image_url: Set(aggregate.image_url.clone()),
        created_at: Set(Some(aggregate.metadata.created_at)),
        updated_at: Set(Some(aggregate.metadata.updated_at)),
        version: Set(aggregate.metadata.version),
    })
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn filtered(filter: &ProductFilter) -> Select<Entity> {
    let mut query = Entity::find();
    if let Some(status) = filter.status {
        query = query.filter(Column::Status.eq(status.as_str()));
    }
    if let Some(skus) = &filter.skus {
        query = query.filter(Column::Sku.is_in(skus.clone()));
    }
    query
}

/// Выборка по фильтру, сортировка по SKU
pub async fn list(filter: &ProductFilter) -> anyhow::Result<Vec<Product>> {
    let items = filtered(filter)
        .order_by_asc(Column::Sku)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn count(filter: &ProductFilter) -> anyhow::Result<u64> {
    Ok(filtered(filter).count(conn()).await?)
}

pub async fn get_by_sku(sku: &str) -> anyhow::Result<Option<Product>> {
    let result = Entity::find()
        .filter(Column::Sku.eq(sku))
        .one(conn())
        .await?;
    Ok(result.map(Into::into))
}

pub async fn insert(aggregate: &Product) -> anyhow::Result<Uuid> {
    let active = to_active(aggregate)?;
    active.insert(conn()).await?;
    Ok(aggregate.id.value())
}

pub async fn update(aggregate: &Product) -> anyhow::Result<()> {
    let mut active = to_active(aggregate)?;
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(conn()).await?;
    Ok(())
}

/// Insert-or-update по уникальному SKU.
/// Для существующей записи сохраняются id, created_at и image_url.
pub async fn upsert_by_sku(draft: ProductDraft) -> anyhow::Result<UpsertOutcome> {
    match get_by_sku(&draft.sku).await? {
        Some(mut existing) => {
            existing.apply_draft(draft);
            existing
                .validate()
                .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
            existing.before_write();
            update(&existing).await?;
            Ok(UpsertOutcome::Updated)
        }
        None => {
            let mut aggregate = Product::new_for_insert(draft);
            aggregate
                .validate()
                .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
            aggregate.before_write();
            insert(&aggregate).await?;
            Ok(UpsertOutcome::Inserted)
        }
    }
}

/// Частичное обновление по SKU. false, если товара нет.
pub async fn update_by_sku(sku: &str, patch: &ProductPatch) -> anyhow::Result<bool> {
    let Some(mut existing) = get_by_sku(sku).await? else {
        return Ok(false);
    };
    existing.apply_patch(patch);
    existing.before_write();
    update(&existing).await?;
    Ok(true)
}

/// Перевести все товары из одного статуса в другой, вернуть число затронутых строк
pub async fn transition_status(from: ProductStatus, to: ProductStatus) -> anyhow::Result<u64> {
    use sea_orm::sea_query::Expr;
    let result = Entity::update_many()
        .col_expr(Column::Status, Expr::value(to.as_str()))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .col_expr(Column::Version, Expr::col(Column::Version).add(1))
        .filter(Column::Status.eq(from.as_str()))
        .exec(conn())
        .await?;
    Ok(result.rows_affected)
}
