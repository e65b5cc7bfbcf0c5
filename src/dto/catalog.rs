use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Category, Product, Tag};

#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogPage {
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDetails {
    pub product: Product,
    pub category: Category,
    pub tags: Vec<Tag>,
}
