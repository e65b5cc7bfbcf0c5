use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Category, CategoryCount, Product, ProductRevenue, ProductRow, Tag};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CategoryRequest {
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TagRequest {
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub author: Option<String>,
    pub price: i64,
    pub image: Option<String>,
    pub active: Option<bool>,
    pub category_id: i32,
    #[serde(default)]
    pub tag_ids: Vec<i32>,
}

/// Absent fields keep their value; `tag_ids`, when present, replaces the
/// whole tag set.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub author: Option<String>,
    pub price: Option<i64>,
    pub image: Option<String>,
    pub active: Option<bool>,
    pub category_id: Option<i32>,
    pub tag_ids: Option<Vec<i32>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryList {
    pub items: Vec<Category>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TagList {
    pub items: Vec<Tag>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductRowList {
    pub items: Vec<ProductRow>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminProduct {
    pub product: Product,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Dashboard {
    pub stats: Vec<CategoryCount>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RevenueReport {
    pub stats: Vec<ProductRevenue>,
    pub total: i64,
}

/// Describes one generated management view so the admin front end can lay
/// out its list and edit screens.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminViewInfo {
    pub name: &'static str,
    pub endpoint: &'static str,
    pub searchable: Vec<&'static str>,
    pub filters: Vec<&'static str>,
    pub excluded_columns: Vec<&'static str>,
    pub labels: Vec<ColumnLabel>,
    pub rich_text: Vec<&'static str>,
    pub can_view_details: bool,
    pub can_export: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ColumnLabel {
    pub column: &'static str,
    pub label: &'static str,
}
