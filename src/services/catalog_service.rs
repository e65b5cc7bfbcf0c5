use sea_orm::{
    ColumnTrait, Condition, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::{
    dto::catalog::{CatalogPage, ProductDetails},
    entity::{
        category::{Column as CategoryCol, Entity as Categories, Model as CategoryModel},
        product::{Column as ProdCol, Entity as Products, Model as ProductModel},
        tag::{Column as TagCol, Entity as Tags, Model as TagModel},
    },
    error::{AppError, AppResult},
    models::{Category, Product, Tag},
    response::{ApiResponse, Meta},
    routes::params::CatalogQuery,
    state::AppState,
};

/// Active products filtered by category and by a substring of the name.
pub async fn load_products(
    state: &AppState,
    query: &CatalogQuery,
) -> AppResult<(Vec<Product>, Meta)> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all().add(ProdCol::Active.eq(true));

    if let Some(category_id) = query.category_id {
        condition = condition.add(ProdCol::CategoryId.eq(category_id));
    }
    if let Some(keyword) = query.keyword.as_ref().filter(|k| !k.is_empty()) {
        condition = condition.add(ProdCol::Name.contains(keyword.as_str()));
    }

    let finder = Products::find()
        .filter(condition)
        .order_by_asc(ProdCol::Id);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();

    Ok((items, Meta::new(page, limit, total)))
}

pub async fn load_categories(state: &AppState) -> AppResult<Vec<Category>> {
    let items = Categories::find()
        .order_by_asc(CategoryCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(category_from_entity)
        .collect();
    Ok(items)
}

pub async fn catalog_page(
    state: &AppState,
    query: CatalogQuery,
) -> AppResult<ApiResponse<CatalogPage>> {
    let categories = load_categories(state).await?;
    let (products, meta) = load_products(state, &query).await?;
    Ok(ApiResponse::success(
        "Products",
        CatalogPage {
            categories,
            products,
        },
        Some(meta),
    ))
}

pub async fn get_product_by_id(state: &AppState, id: i32) -> AppResult<ProductModel> {
    Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn get_product_details(
    state: &AppState,
    id: i32,
) -> AppResult<ApiResponse<ProductDetails>> {
    let product = get_product_by_id(state, id).await?;

    let category = product
        .find_related(Categories)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("product {id} has no category")))?;

    let tags = product
        .find_related(Tags)
        .order_by_asc(TagCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(tag_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Product",
        ProductDetails {
            product: product_from_entity(product),
            category: category_from_entity(category),
            tags,
        },
        None,
    ))
}

pub(crate) fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        name: model.name,
        author: model.author,
        price: model.price,
        image: model.image,
        active: model.active,
        category_id: model.category_id,
    }
}

pub(crate) fn category_from_entity(model: CategoryModel) -> Category {
    Category {
        id: model.id,
        name: model.name,
    }
}

pub(crate) fn tag_from_entity(model: TagModel) -> Tag {
    Tag {
        id: model.id,
        name: model.name,
    }
}
