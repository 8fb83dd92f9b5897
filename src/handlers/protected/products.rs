// handlers/protected/products.rs - POST/PUT/DELETE /products

use axum::{
    body::Bytes,
    extract::{Path, State},
};
use serde_json::{json, Value};

use crate::database::models::Product;
use crate::database::repository::RepositoryError;
use crate::error::ApiError;
use crate::handlers::utils::{decode_candidate, parse_id};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// POST /products - create a product, 201 with the stored row
pub async fn create(State(state): State<AppState>, body: Bytes) -> ApiResult<Product> {
    let candidate = decode_candidate(&body)?;
    state.validator.validate(&candidate)?;

    let product = state.products.create(candidate).await.map_err(|e| match e {
        RepositoryError::Storage(err) => {
            tracing::error!("Failed to insert product: {}", err);
            ApiError::internal_server_error("Failed to save product")
        }
        other => other.into(),
    })?;

    tracing::info!("Created product {} ({})", product.id, product.name);
    Ok(ApiResponse::created(product))
}

/// PUT /products/:id - overwrite name, price and stock
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Value> {
    let id = parse_id(&id)?;
    let candidate = decode_candidate(&body)?;
    state.validator.validate(&candidate)?;

    state.products.update(id, candidate).await?;

    tracing::info!("Updated product {}", id);
    Ok(ApiResponse::success(json!({ "message": "Product updated successfully" })))
}

/// DELETE /products/:id - 204 on success
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let id = parse_id(&id)?;
    state.products.delete(id).await?;

    tracing::info!("Deleted product {}", id);
    Ok(ApiResponse::no_content())
}
