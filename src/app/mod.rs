//! 应用层：路由装配

pub mod product;

use axum::{extract::State, middleware, response::Json, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::core::{
    error::CoreError,
    middleware::{request_logging_middleware, require_api_key, ApiKey},
};
use product::handler::AppState;

/// 构建完整的应用路由；`api_key` 为 `Some` 时产品接口需要 `x-api-key`
pub fn build_router(state: AppState, api_key: Option<String>) -> Router {
    let mut products = product::routes(state.clone());
    if let Some(key) = api_key {
        products = products.route_layer(middleware::from_fn_with_state(
            ApiKey::new(key),
            require_api_key,
        ));
    }

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .with_state(state)
        .nest("/api/products", products)
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

async fn root() -> &'static str {
    "Hello World!"
}

/// 健康检查
async fn health_check(State(state): State<AppState>) -> Result<Json<serde_json::Value>, CoreError> {
    let products = state.product_service.store().len()?;

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "products": products,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}
