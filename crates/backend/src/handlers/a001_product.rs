use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a001_product::{
    Product, ProductFilter, ProductStatus, PublishDraftsResult, SetStatusRequest,
};
use serde::Deserialize;
use serde_json::json;

use crate::domain::a001_product;
use crate::shared::logger;

#[derive(Deserialize)]
pub struct ProductListQuery {
    pub status: Option<String>,
    /// SKU через запятую
    pub skus: Option<String>,
}

impl ProductListQuery {
    fn to_filter(&self) -> Result<ProductFilter, StatusCode> {
        let status = match self.status.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(s) => Some(ProductStatus::parse(s).ok_or(StatusCode::BAD_REQUEST)?),
            None => None,
        };
        let skus = self.skus.as_deref().map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        });
        Ok(ProductFilter { status, skus })
    }
}

/// GET /api/product
pub async fn list(Query(query): Query<ProductListQuery>) -> Result<Json<Vec<Product>>, StatusCode> {
    let filter = query.to_filter()?;
    match a001_product::service::list(&filter).await {
        Ok(v) => Ok(Json(v)),
        Err(e) => {
            tracing::error!("Failed to list products: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/product/count
pub async fn count(
    Query(query): Query<ProductListQuery>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let filter = query.to_filter()?;
    match a001_product::service::count(&filter).await {
        Ok(count) => Ok(Json(json!({ "count": count }))),
        Err(e) => {
            tracing::error!("Failed to count products: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/product/:sku
pub async fn get_by_sku(Path(sku): Path<String>) -> Result<Json<Product>, StatusCode> {
    match a001_product::service::get_by_sku(&sku).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to load product {}: {}", sku, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/product/:sku/status
pub async fn set_status(
    Path(sku): Path<String>,
    Json(req): Json<SetStatusRequest>,
) -> Result<(), StatusCode> {
    match a001_product::service::set_status(&sku, req.status).await {
        Ok(true) => {
            logger::log("status", &format!("{} -> {}", sku, req.status));
            Ok(())
        }
        Ok(false) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to set status for {}: {}", sku, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/product/publish-drafts
pub async fn publish_drafts() -> Result<Json<PublishDraftsResult>, StatusCode> {
    match a001_product::service::publish_drafts().await {
        Ok(result) => {
            logger::log(
                "publish",
                &format!(
                    "{} drafts published, {} active",
                    result.published_count, result.total_active_products
                ),
            );
            Ok(Json(result))
        }
        Err(e) => {
            tracing::error!("Failed to publish drafts: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_to_filter() {
        let query = ProductListQuery {
            status: Some("Draft".into()),
            skus: Some("A-1, B-2,,".into()),
        };
        let filter = query.to_filter().unwrap();
        assert_eq!(filter.status, Some(ProductStatus::Draft));
        assert_eq!(filter.skus, Some(vec!["A-1".to_string(), "B-2".to_string()]));
    }

    #[test]
    fn test_unknown_status_is_bad_request() {
        let query = ProductListQuery {
            status: Some("published".into()),
            skus: None,
        };
        assert_eq!(query.to_filter().unwrap_err(), StatusCode::BAD_REQUEST);
    }
}
