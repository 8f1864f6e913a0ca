//! 产品目录：模型、存储、服务和处理器

pub mod handler;
pub mod model;
pub mod service;
pub mod store;

use axum::{routing::get, Router};

use handler::AppState;

/// `/api/products` 下的全部路由
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/",
            get(handler::list_products).post(handler::create_product),
        )
        .route("/search", get(handler::search_products))
        .route("/stats", get(handler::product_stats))
        .route(
            "/:id",
            get(handler::get_product)
                .put(handler::update_product)
                .delete(handler::delete_product),
        )
        .with_state(state)
}
