use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::users::UserRole;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Tag {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub author: Option<String>,
    pub price: i64,
    pub image: Option<String>,
    pub active: bool,
    pub category_id: i32,
}

/// Product row as shown in admin listings: no image column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductRow {
    pub id: i32,
    pub name: String,
    pub author: Option<String>,
    pub price: i64,
    pub active: bool,
    pub category_id: i32,
}

/// Account data that is safe to hand out; the password hash never leaves
/// the service layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub username: String,
    pub avatar: String,
    pub active: bool,
    pub role: UserRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Receipt {
    pub id: i32,
    pub created_date: NaiveDateTime,
    pub user_id: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReceiptDetail {
    pub id: i32,
    pub quantity: i32,
    pub price: i64,
    pub receipt_id: i32,
    pub product_id: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CommentAuthor {
    pub name: String,
    pub avatar: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CommentView {
    pub id: i32,
    pub content: String,
    pub created_date: NaiveDateTime,
    pub user: CommentAuthor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartItem {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub quantity: i64,
}

/// Cart kept in the session, keyed by product id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct Cart(pub BTreeMap<String, CartItem>);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CartStats {
    pub total_quantity: i64,
    pub total_amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryCount {
    pub category_id: i32,
    pub category_name: String,
    pub product_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductRevenue {
    pub product_id: i32,
    pub product_name: String,
    pub revenue: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReceiptWithDetails {
    pub receipt: Receipt,
    pub details: Vec<ReceiptDetail>,
}
