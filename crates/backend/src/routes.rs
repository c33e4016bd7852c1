use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // Product catalog
        .route("/api/product", get(handlers::a001_product::list))
        .route("/api/product/count", get(handlers::a001_product::count))
        .route(
            "/api/product/publish-drafts",
            post(handlers::a001_product::publish_drafts),
        )
        .route("/api/product/:sku", get(handlers::a001_product::get_by_sku))
        .route(
            "/api/product/:sku/status",
            post(handlers::a001_product::set_status),
        )
        // UseCase u501: Import products from CSV
        .route(
            "/api/u501/template",
            get(handlers::u501_import_products::download_template),
        )
        .route(
            "/api/u501/preview",
            post(handlers::u501_import_products::preview),
        )
        .route(
            "/api/u501/upload",
            post(handlers::u501_import_products::upload),
        )
        .route(
            "/api/u501/import",
            post(handlers::u501_import_products::import),
        )
        .route(
            "/api/u501/jobs",
            get(handlers::u501_import_products::list_jobs),
        )
        // Logs handlers
        .route(
            "/api/logs",
            get(handlers::logs::list_all).delete(handlers::logs::clear_all),
        )
}
