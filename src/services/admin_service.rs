use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;

use crate::{
    dto::admin::{
        AdminProduct, AdminViewInfo, CategoryList, CategoryRequest, ColumnLabel,
        CreateProductRequest, ProductRowList, TagList, TagRequest, UpdateProductRequest,
    },
    entity::{
        category::{ActiveModel as CategoryActive, Column as CategoryCol, Entity as Categories},
        comment::{Column as CommentCol, Entity as Comments},
        prod_tag::{ActiveModel as ProdTagActive, Column as ProdTagCol, Entity as ProdTags},
        product::{ActiveModel as ProductActive, Column as ProdCol, Entity as Products, Model as ProductModel},
        receipt_details::{Column as DetailCol, Entity as ReceiptDetails},
        tag::{ActiveModel as TagActive, Column as TagCol, Entity as Tags},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Category, ProductRow, Tag},
    response::{ApiResponse, Meta},
    routes::params::AdminProductQuery,
    services::catalog_service::{category_from_entity, product_from_entity, tag_from_entity},
    state::AppState,
};

/// Layout hints for the generated admin screens.
pub fn admin_views() -> Vec<AdminViewInfo> {
    vec![
        AdminViewInfo {
            name: "Danh mục",
            endpoint: "/admin/categories",
            searchable: vec![],
            filters: vec![],
            excluded_columns: vec![],
            labels: vec![],
            rich_text: vec![],
            can_view_details: false,
            can_export: false,
        },
        AdminViewInfo {
            name: "Tag",
            endpoint: "/admin/tags",
            searchable: vec![],
            filters: vec![],
            excluded_columns: vec![],
            labels: vec![],
            rich_text: vec![],
            can_view_details: false,
            can_export: false,
        },
        AdminViewInfo {
            name: "Sách",
            endpoint: "/admin/products",
            searchable: vec!["name", "author"],
            filters: vec!["name", "price"],
            excluded_columns: vec!["image"],
            labels: vec![
                ColumnLabel {
                    column: "name",
                    label: "Tên Sách",
                },
                ColumnLabel {
                    column: "author",
                    label: "Tác Giả",
                },
                ColumnLabel {
                    column: "price",
                    label: "Giá",
                },
            ],
            rich_text: vec!["author"],
            can_view_details: true,
            can_export: true,
        },
        AdminViewInfo {
            name: "Thống kê",
            endpoint: "/admin/stats",
            searchable: vec!["kw"],
            filters: vec!["from_date", "to_date"],
            excluded_columns: vec![],
            labels: vec![],
            rich_text: vec![],
            can_view_details: false,
            can_export: false,
        },
    ]
}

fn required_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }
    Ok(name.to_string())
}

// ---- categories ----

pub async fn list_categories(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<CategoryList>> {
    ensure_admin(user)?;
    let items = Categories::find()
        .order_by_asc(CategoryCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(category_from_entity)
        .collect();
    Ok(ApiResponse::success("Categories", CategoryList { items }, None))
}

pub async fn get_category(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    let category = Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Category", category_from_entity(category), None))
}

pub async fn create_category(
    state: &AppState,
    user: &AuthUser,
    payload: CategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    let category = CategoryActive {
        id: NotSet,
        name: Set(required_name(&payload.name)?),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(category_id = category.id, admin_id = user.user_id, "category created");
    Ok(ApiResponse::success(
        "Category created",
        category_from_entity(category),
        Some(Meta::empty()),
    ))
}

pub async fn update_category(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: CategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    let name = required_name(&payload.name)?;
    let existing = Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: CategoryActive = existing.into();
    active.name = Set(name);
    let category = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        category_from_entity(category),
        Some(Meta::empty()),
    ))
}

pub async fn delete_category(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let in_use = Products::find()
        .filter(ProdCol::CategoryId.eq(id))
        .count(&state.orm)
        .await?;
    if in_use > 0 {
        return Err(AppError::BadRequest(format!(
            "category still has {in_use} products"
        )));
    }

    let result = Categories::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(category_id = id, admin_id = user.user_id, "category deleted");
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

// ---- tags ----

pub async fn list_tags(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<TagList>> {
    ensure_admin(user)?;
    let items = Tags::find()
        .order_by_asc(TagCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(tag_from_entity)
        .collect();
    Ok(ApiResponse::success("Tags", TagList { items }, None))
}

pub async fn get_tag(state: &AppState, user: &AuthUser, id: i32) -> AppResult<ApiResponse<Tag>> {
    ensure_admin(user)?;
    let tag = Tags::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Tag", tag_from_entity(tag), None))
}

async fn ensure_tag_name_free(state: &AppState, name: &str, except: Option<i32>) -> AppResult<()> {
    let mut finder = Tags::find().filter(TagCol::Name.eq(name));
    if let Some(id) = except {
        finder = finder.filter(TagCol::Id.ne(id));
    }
    if finder.one(&state.orm).await?.is_some() {
        return Err(AppError::Conflict(format!("tag {name} already exists")));
    }
    Ok(())
}

pub async fn create_tag(
    state: &AppState,
    user: &AuthUser,
    payload: TagRequest,
) -> AppResult<ApiResponse<Tag>> {
    ensure_admin(user)?;
    let name = required_name(&payload.name)?;
    ensure_tag_name_free(state, &name, None).await?;

    let tag = TagActive {
        id: NotSet,
        name: Set(name),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(tag_id = tag.id, admin_id = user.user_id, "tag created");
    Ok(ApiResponse::success(
        "Tag created",
        tag_from_entity(tag),
        Some(Meta::empty()),
    ))
}

pub async fn update_tag(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: TagRequest,
) -> AppResult<ApiResponse<Tag>> {
    ensure_admin(user)?;
    let name = required_name(&payload.name)?;
    let existing = Tags::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_tag_name_free(state, &name, Some(id)).await?;

    let mut active: TagActive = existing.into();
    active.name = Set(name);
    let tag = active.update(&state.orm).await?;

    Ok(ApiResponse::success("Updated", tag_from_entity(tag), Some(Meta::empty())))
}

pub async fn delete_tag(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let txn = state.orm.begin().await?;
    ProdTags::delete_many()
        .filter(ProdTagCol::TagId.eq(id))
        .exec(&txn)
        .await?;
    let result = Tags::delete_by_id(id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    txn.commit().await?;

    tracing::info!(tag_id = id, admin_id = user.user_id, "tag deleted");
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

// ---- products ----

pub async fn list_products(
    state: &AppState,
    user: &AuthUser,
    query: AdminProductQuery,
) -> AppResult<ApiResponse<ProductRowList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination.normalize();
    let condition = product_filter(&query);

    let finder = Products::find().filter(condition).order_by_asc(ProdCol::Id);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_row_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Products",
        ProductRowList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

/// Most rows a single export returns.
pub const MAX_EXPORT_ROWS: u64 = 10_000;

const EXPORT_COLUMNS: [&str; 6] = ["id", "name", "author", "price", "active", "category_id"];

/// The filtered product list as CSV (image column left out), capped at
/// [`MAX_EXPORT_ROWS`].
pub async fn export_products(
    state: &AppState,
    user: &AuthUser,
    query: AdminProductQuery,
) -> AppResult<Vec<u8>> {
    ensure_admin(user)?;
    let rows: Vec<ProductRow> = Products::find()
        .filter(product_filter(&query))
        .order_by_asc(ProdCol::Id)
        .limit(MAX_EXPORT_ROWS)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_row_from_entity)
        .collect();

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer
        .write_record(EXPORT_COLUMNS)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to write CSV header: {e}")))?;
    for row in &rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to write CSV row: {e}")))?;
    }
    let output = writer
        .into_inner()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to flush CSV: {e}")))?;

    tracing::info!(rows = rows.len(), admin_id = user.user_id, "products exported");
    Ok(output)
}

fn product_filter(query: &AdminProductQuery) -> Condition {
    let mut condition = Condition::all();

    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(
            Condition::any()
                .add(ProdCol::Name.contains(search.as_str()))
                .add(ProdCol::Author.contains(search.as_str())),
        );
    }
    if let Some(name) = query.name.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(ProdCol::Name.contains(name.as_str()));
    }
    if let Some(min_price) = query.min_price {
        condition = condition.add(ProdCol::Price.gte(min_price));
    }
    if let Some(max_price) = query.max_price {
        condition = condition.add(ProdCol::Price.lte(max_price));
    }
    condition
}

pub async fn get_product(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<AdminProduct>> {
    ensure_admin(user)?;
    let product = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let data = admin_product(&state.orm, product).await?;
    Ok(ApiResponse::success("Product", data, None))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<AdminProduct>> {
    ensure_admin(user)?;
    let name = required_name(&payload.name)?;
    validate_price(payload.price)?;

    let txn = state.orm.begin().await?;
    ensure_category(&txn, payload.category_id).await?;

    let product = ProductActive {
        id: NotSet,
        name: Set(name),
        author: Set(payload.author),
        price: Set(payload.price),
        image: Set(payload.image),
        active: Set(payload.active.unwrap_or(true)),
        category_id: Set(payload.category_id),
    }
    .insert(&txn)
    .await?;
    replace_tags(&txn, product.id, &payload.tag_ids).await?;

    let data = admin_product(&txn, product).await?;
    txn.commit().await?;

    tracing::info!(product_id = data.product.id, admin_id = user.user_id, "product created");
    Ok(ApiResponse::success("Product created", data, Some(Meta::empty())))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<AdminProduct>> {
    ensure_admin(user)?;
    let txn = state.orm.begin().await?;
    let existing = Products::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ProductActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(required_name(&name)?);
    }
    if let Some(author) = payload.author {
        active.author = Set(Some(author));
    }
    if let Some(price) = payload.price {
        validate_price(price)?;
        active.price = Set(price);
    }
    if let Some(image) = payload.image {
        active.image = Set(Some(image));
    }
    if let Some(is_active) = payload.active {
        active.active = Set(is_active);
    }
    if let Some(category_id) = payload.category_id {
        ensure_category(&txn, category_id).await?;
        active.category_id = Set(category_id);
    }

    let product = active.update(&txn).await?;
    if let Some(tag_ids) = payload.tag_ids.as_deref() {
        replace_tags(&txn, product.id, tag_ids).await?;
    }

    let data = admin_product(&txn, product).await?;
    txn.commit().await?;

    tracing::info!(product_id = id, admin_id = user.user_id, "product updated");
    Ok(ApiResponse::success("Updated", data, Some(Meta::empty())))
}

pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let sold = ReceiptDetails::find()
        .filter(DetailCol::ProductId.eq(id))
        .count(&state.orm)
        .await?;
    if sold > 0 {
        return Err(AppError::BadRequest(
            "product appears on receipts and cannot be deleted".into(),
        ));
    }

    let txn = state.orm.begin().await?;
    ProdTags::delete_many()
        .filter(ProdTagCol::ProductId.eq(id))
        .exec(&txn)
        .await?;
    Comments::delete_many()
        .filter(CommentCol::ProductId.eq(id))
        .exec(&txn)
        .await?;
    let result = Products::delete_by_id(id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    txn.commit().await?;

    tracing::info!(product_id = id, admin_id = user.user_id, "product deleted");
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn validate_price(price: i64) -> AppResult<()> {
    if price < 0 {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }
    Ok(())
}

async fn ensure_category<C: ConnectionTrait>(conn: &C, id: i32) -> AppResult<()> {
    if Categories::find_by_id(id).one(conn).await?.is_none() {
        return Err(AppError::BadRequest(format!("category {id} does not exist")));
    }
    Ok(())
}

async fn replace_tags<C: ConnectionTrait>(conn: &C, product_id: i32, tag_ids: &[i32]) -> AppResult<()> {
    let mut tag_ids = tag_ids.to_vec();
    tag_ids.sort_unstable();
    tag_ids.dedup();

    let known = Tags::find()
        .filter(TagCol::Id.is_in(tag_ids.clone()))
        .count(conn)
        .await?;
    if known as usize != tag_ids.len() {
        return Err(AppError::BadRequest("unknown tag id".into()));
    }

    ProdTags::delete_many()
        .filter(ProdTagCol::ProductId.eq(product_id))
        .exec(conn)
        .await?;
    for tag_id in tag_ids {
        ProdTagActive {
            product_id: Set(product_id),
            tag_id: Set(tag_id),
        }
        .insert(conn)
        .await?;
    }
    Ok(())
}

async fn admin_product<C: ConnectionTrait>(conn: &C, product: ProductModel) -> AppResult<AdminProduct> {
    let tags = product
        .find_related(Tags)
        .order_by_asc(TagCol::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(tag_from_entity)
        .collect();
    Ok(AdminProduct {
        product: product_from_entity(product),
        tags,
    })
}

fn product_row_from_entity(model: ProductModel) -> ProductRow {
    ProductRow {
        id: model.id,
        name: model.name,
        author: model.author,
        price: model.price,
        active: model.active,
        category_id: model.category_id,
    }
}
