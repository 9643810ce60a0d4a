//! Product catalog endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};

use crate::catalog::{NewProduct, Product};
use crate::http::error::ApiError;
use crate::http::pagination::PageParams;
use crate::http::response::{build_paginated, build_success, ok, ApiResult};
use crate::http::server::AppState;
use crate::http::validation::{FieldError, ValidJson, ValidQuery};

fn parse_id(raw: &str) -> Result<u64, ApiError> {
    raw.parse().map_err(|_| {
        ApiError::InvalidInput(
            std::iter::once(FieldError::path("product_id", "value is not a valid integer")).collect(),
        )
    })
}

/// `GET /api/v1/products?page=&page_size=`
pub async fn list(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<PageParams>,
) -> ApiResult<Vec<Product>> {
    let (items, total) = state
        .catalog
        .list(params.offset(), params.page_size().get())?;

    Ok(build_paginated(
        items,
        total,
        params.page(),
        params.page_size(),
        "Products retrieved",
    ))
}

/// `GET /api/v1/products/{product_id}`
pub async fn get(State(state): State<AppState>, Path(product_id): Path<String>) -> ApiResult<Product> {
    let product = state.catalog.get(parse_id(&product_id)?)?;
    Ok(ok(product, "Product retrieved"))
}

/// `POST /api/v1/products`
pub async fn create(
    State(state): State<AppState>,
    ValidJson(new): ValidJson<NewProduct>,
) -> ApiResult<Product> {
    let product = state.catalog.create(new)?;
    tracing::info!(product_id = product.id, "Product created");
    Ok(build_success(Some(product), "Product created", StatusCode::CREATED))
}

/// `PUT /api/v1/products/{product_id}`
pub async fn replace(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    ValidJson(new): ValidJson<NewProduct>,
) -> ApiResult<Product> {
    let product = state.catalog.replace(parse_id(&product_id)?, new)?;
    Ok(ok(product, "Product updated"))
}

/// `DELETE /api/v1/products/{product_id}`
pub async fn delete(State(state): State<AppState>, Path(product_id): Path<String>) -> ApiResult<Product> {
    let id = parse_id(&product_id)?;
    state.catalog.delete(id)?;
    tracing::info!(product_id = id, "Product deleted");
    Ok(build_success(None, "Product deleted", StatusCode::OK))
}
