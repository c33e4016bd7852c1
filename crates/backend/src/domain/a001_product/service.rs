use super::repository;
use contracts::domain::a001_product::{
    Product, ProductFilter, ProductPatch, ProductStatus, PublishDraftsResult,
};

/// Опубликовать все черновики: draft → active
pub async fn publish_drafts() -> anyhow::Result<PublishDraftsResult> {
    let published_count =
        repository::transition_status(ProductStatus::Draft, ProductStatus::Active).await?;
    let total_active_products =
        repository::count(&ProductFilter::by_status(ProductStatus::Active)).await?;

    tracing::info!(
        "Published {} drafts, {} active products in total",
        published_count,
        total_active_products
    );

    Ok(PublishDraftsResult {
        published_count,
        total_active_products,
    })
}

/// Явная смена статуса одного товара оператором
pub async fn set_status(sku: &str, status: ProductStatus) -> anyhow::Result<bool> {
    let patch = ProductPatch {
        status: Some(status),
        ..Default::default()
    };
    repository::update_by_sku(sku, &patch).await
}

pub async fn get_by_sku(sku: &str) -> anyhow::Result<Option<Product>> {
    repository::get_by_sku(sku).await
}

pub async fn list(filter: &ProductFilter) -> anyhow::Result<Vec<Product>> {
    repository::list(filter).await
}

pub async fn count(filter: &ProductFilter) -> anyhow::Result<u64> {
    repository::count(filter).await
}
