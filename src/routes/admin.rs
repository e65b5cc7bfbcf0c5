use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::{
    dto::admin::{
        AdminProduct, AdminViewInfo, CategoryList, CategoryRequest, CreateProductRequest,
        Dashboard, ProductRowList, RevenueReport, TagList, TagRequest, UpdateProductRequest,
    },
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin},
    models::{Category, Tag},
    response::{ApiResponse, Meta},
    routes::params::{AdminProductQuery, StatsQuery},
    services::{admin_service, stats_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard))
        .route("/stats", get(revenue_stats))
        .route("/views", get(views))
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
        .route("/tags", get(list_tags).post(create_tag))
        .route("/tags/{id}", get(get_tag).put(update_tag).delete(delete_tag))
        .route("/products", get(list_products).post(create_product))
        .route("/products/export", get(export_products))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

#[utoipa::path(
    get,
    path = "/admin",
    responses(
        (status = 200, description = "Product count per category", body = ApiResponse<Dashboard>),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Forbidden"),
    ),
    tag = "Admin"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Dashboard>>> {
    ensure_admin(&user)?;
    let stats = stats_service::count_product_by_cate(&state).await?;
    Ok(Json(ApiResponse::success("Dashboard", Dashboard { stats }, None)))
}

#[utoipa::path(
    get,
    path = "/admin/stats",
    params(
        ("kw" = Option<String>, Query, description = "Substring of the product name"),
        ("from_date" = Option<String>, Query, description = "First day, YYYY-MM-DD"),
        ("to_date" = Option<String>, Query, description = "Last day, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Revenue per product", body = ApiResponse<RevenueReport>),
        (status = 400, description = "Date range is inverted"),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Forbidden"),
    ),
    tag = "Admin"
)]
pub async fn revenue_stats(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<StatsQuery>,
) -> AppResult<Json<ApiResponse<RevenueReport>>> {
    ensure_admin(&user)?;
    let stats = stats_service::stats_revenue(
        &state,
        query.kw.as_deref(),
        query.from_date,
        query.to_date,
    )
    .await?;
    let total = stats
        .iter()
        .fold(0i64, |acc, row| acc.saturating_add(row.revenue));
    Ok(Json(ApiResponse::success(
        "Revenue",
        RevenueReport { stats, total },
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/admin/views",
    responses(
        (status = 200, description = "Layout of the management screens", body = ApiResponse<Vec<AdminViewInfo>>),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Forbidden"),
    ),
    tag = "Admin"
)]
pub async fn views(user: AuthUser) -> AppResult<Json<ApiResponse<Vec<AdminViewInfo>>>> {
    ensure_admin(&user)?;
    Ok(Json(ApiResponse::success(
        "Views",
        admin_service::admin_views(),
        None,
    )))
}

#[utoipa::path(
    get,
    path = "/admin/categories",
    responses(
        (status = 200, description = "All categories", body = ApiResponse<CategoryList>),
        (status = 403, description = "Forbidden"),
    ),
    tag = "Admin"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    let resp = admin_service::list_categories(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/admin/categories",
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category created", body = ApiResponse<Category>),
        (status = 400, description = "Name missing"),
        (status = 403, description = "Forbidden"),
    ),
    tag = "Admin"
)]
pub async fn create_category(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CategoryRequest>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let resp = admin_service::create_category(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/admin/categories/{id}",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category", body = ApiResponse<Category>),
        (status = 404, description = "Not found"),
    ),
    tag = "Admin"
)]
pub async fn get_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let resp = admin_service::get_category(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/admin/categories/{id}",
    params(("id" = i32, Path, description = "Category ID")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category renamed", body = ApiResponse<Category>),
        (status = 404, description = "Not found"),
    ),
    tag = "Admin"
)]
pub async fn update_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<CategoryRequest>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let resp = admin_service::update_category(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/admin/categories/{id}",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 400, description = "Category still has products"),
        (status = 404, description = "Not found"),
    ),
    tag = "Admin"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = admin_service::delete_category(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/admin/tags",
    responses(
        (status = 200, description = "All tags", body = ApiResponse<TagList>),
        (status = 403, description = "Forbidden"),
    ),
    tag = "Admin"
)]
pub async fn list_tags(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<TagList>>> {
    let resp = admin_service::list_tags(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/admin/tags",
    request_body = TagRequest,
    responses(
        (status = 200, description = "Tag created", body = ApiResponse<Tag>),
        (status = 409, description = "Tag name already used"),
    ),
    tag = "Admin"
)]
pub async fn create_tag(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<TagRequest>,
) -> AppResult<Json<ApiResponse<Tag>>> {
    let resp = admin_service::create_tag(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/admin/tags/{id}",
    params(("id" = i32, Path, description = "Tag ID")),
    responses(
        (status = 200, description = "Tag", body = ApiResponse<Tag>),
        (status = 404, description = "Not found"),
    ),
    tag = "Admin"
)]
pub async fn get_tag(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Tag>>> {
    let resp = admin_service::get_tag(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/admin/tags/{id}",
    params(("id" = i32, Path, description = "Tag ID")),
    request_body = TagRequest,
    responses(
        (status = 200, description = "Tag renamed", body = ApiResponse<Tag>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Tag name already used"),
    ),
    tag = "Admin"
)]
pub async fn update_tag(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<TagRequest>,
) -> AppResult<Json<ApiResponse<Tag>>> {
    let resp = admin_service::update_tag(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/admin/tags/{id}",
    params(("id" = i32, Path, description = "Tag ID")),
    responses(
        (status = 200, description = "Tag deleted"),
        (status = 404, description = "Not found"),
    ),
    tag = "Admin"
)]
pub async fn delete_tag(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = admin_service::delete_tag(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/admin/products",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Search in name and author"),
        ("name" = Option<String>, Query, description = "Filter by name"),
        ("min_price" = Option<i64>, Query, description = "Lowest price"),
        ("max_price" = Option<i64>, Query, description = "Highest price")
    ),
    responses(
        (status = 200, description = "Products without images", body = ApiResponse<ProductRowList>),
        (status = 403, description = "Forbidden"),
    ),
    tag = "Admin"
)]
pub async fn list_products(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<AdminProductQuery>,
) -> AppResult<Json<ApiResponse<ProductRowList>>> {
    let resp = admin_service::list_products(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/admin/products/export",
    params(
        ("q" = Option<String>, Query, description = "Search in name and author"),
        ("name" = Option<String>, Query, description = "Filter by name"),
        ("min_price" = Option<i64>, Query, description = "Lowest price"),
        ("max_price" = Option<i64>, Query, description = "Highest price")
    ),
    responses(
        (status = 200, description = "Filtered products as CSV", content_type = "text/csv"),
        (status = 403, description = "Forbidden"),
    ),
    tag = "Admin"
)]
pub async fn export_products(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<AdminProductQuery>,
) -> AppResult<Response> {
    let body = admin_service::export_products(&state, &user, query).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"products.csv\"",
            ),
        ],
        body,
    )
        .into_response())
}

#[utoipa::path(
    post,
    path = "/admin/products",
    request_body = CreateProductRequest,
    responses(
        (status = 200, description = "Product created", body = ApiResponse<AdminProduct>),
        (status = 400, description = "Invalid product"),
        (status = 404, description = "Unknown category or tag"),
    ),
    tag = "Admin"
)]
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<Json<ApiResponse<AdminProduct>>> {
    let resp = admin_service::create_product(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/admin/products/{id}",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product with tags", body = ApiResponse<AdminProduct>),
        (status = 404, description = "Not found"),
    ),
    tag = "Admin"
)]
pub async fn get_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<AdminProduct>>> {
    let resp = admin_service::get_product(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/admin/products/{id}",
    params(("id" = i32, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<AdminProduct>),
        (status = 400, description = "Invalid product"),
        (status = 404, description = "Not found"),
    ),
    tag = "Admin"
)]
pub async fn update_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<AdminProduct>>> {
    let resp = admin_service::update_product(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/admin/products/{id}",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 400, description = "Product appears on a receipt"),
        (status = 404, description = "Not found"),
    ),
    tag = "Admin"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = admin_service::delete_product(&state, &user, id).await?;
    Ok(Json(resp))
}
