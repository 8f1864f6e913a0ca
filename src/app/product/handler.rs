//! 产品处理器

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
};

use super::{
    model::{
        CatalogStats, CreateProductRequest, DeleteResponse, ListQuery, Product, ProductPage,
        ProductPatch, QueryPairs, SearchQuery,
    },
    service::ProductService,
    store::CatalogStore,
};
use crate::core::error::CoreError;

#[derive(Clone)]
pub struct AppState {
    pub product_service: ProductService,
}

impl AppState {
    pub fn new(store: CatalogStore) -> Self {
        Self {
            product_service: ProductService::new(store),
        }
    }
}

pub async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Json<ProductPage>, CoreError> {
    let Query(pairs) = query?;
    let query = ListQuery::from_pairs(&pairs);
    Ok(Json(state.product_service.list(&query)?))
}

pub async fn search_products(
    State(state): State<AppState>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Json<Vec<Product>>, CoreError> {
    let Query(pairs) = query?;
    let query = SearchQuery::from_pairs(&pairs);
    let products = state.product_service.search(query.name.as_deref())?;
    Ok(Json(products))
}

pub async fn product_stats(State(state): State<AppState>) -> Result<Json<CatalogStats>, CoreError> {
    Ok(Json(state.product_service.stats()?))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, CoreError> {
    Ok(Json(state.product_service.get(&id)?))
}

pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), CoreError> {
    let Json(request) = payload?;
    let product = state.product_service.create(request)?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ProductPatch>, JsonRejection>,
) -> Result<Json<Product>, CoreError> {
    let Json(patch) = payload?;
    Ok(Json(state.product_service.update(&id, patch)?))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, CoreError> {
    let product = state.product_service.delete(&id)?;
    Ok(Json(DeleteResponse {
        message: "Product deleted",
        deleted: vec![product],
    }))
}
