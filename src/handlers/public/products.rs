// handlers/public/products.rs - GET /products and GET /products/:id

use axum::extract::{Path, RawQuery, State};
use serde::Serialize;

use crate::database::models::Product;
use crate::error::ApiError;
use crate::handlers::utils::{parse_id, Pagination};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Body of a list response. `data` is always present, possibly empty.
#[derive(Debug, Serialize)]
pub struct ProductPage {
    pub page: i64,
    pub limit: i64,
    pub data: Vec<Product>,
}

/// GET /products?page&limit - newest products first
pub async fn list(State(state): State<AppState>, RawQuery(query): RawQuery) -> ApiResult<ProductPage> {
    let pagination = Pagination::from_query(query.as_deref());

    let data = state
        .products
        .list_page(pagination.limit, pagination.offset())
        .await
        .map_err(ApiError::from)?;

    Ok(ApiResponse::success(ProductPage {
        page: pagination.page,
        limit: pagination.limit,
        data,
    }))
}

/// GET /products/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Product> {
    let id = parse_id(&id)?;
    let product = state.products.get_by_id(id).await?;
    Ok(ApiResponse::success(product))
}
