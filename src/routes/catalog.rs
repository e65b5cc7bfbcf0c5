use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use crate::{
    dto::catalog::{CatalogPage, ProductDetails},
    error::AppResult,
    response::ApiResponse,
    routes::params::CatalogQuery,
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/details/{id}", get(details))
}

#[utoipa::path(
    get,
    path = "/",
    params(
        ("category_id" = Option<i32>, Query, description = "Only products of this category"),
        ("keyword" = Option<String>, Query, description = "Substring of the product name"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20")
    ),
    responses(
        (status = 200, description = "Catalog page", body = ApiResponse<CatalogPage>)
    ),
    tag = "Catalog"
)]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> AppResult<Json<ApiResponse<CatalogPage>>> {
    let resp = catalog_service::catalog_page(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/details/{id}",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product details", body = ApiResponse<ProductDetails>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Catalog"
)]
pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<ProductDetails>>> {
    let resp = catalog_service::get_product_details(&state, id).await?;
    Ok(Json(resp))
}
