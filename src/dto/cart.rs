use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Cart, CartStats};

/// A JSON number or a numeric string; the storefront script posts raw
/// input values.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(i64),
    Text(String),
}

impl NumberOrText {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            NumberOrText::Number(n) => Some(*n),
            NumberOrText::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn as_key(&self) -> String {
        match self {
            NumberOrText::Number(n) => n.to_string(),
            NumberOrText::Text(s) => s.trim().to_string(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub id: NumberOrText,
    pub name: String,
    pub price: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartRequest {
    pub quantity: NumberOrText,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartPage {
    pub cart: Cart,
    pub stats: CartStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_and_numeric_text_are_accepted() {
        let body: UpdateCartRequest = serde_json::from_str(r#"{"quantity": "3"}"#).unwrap();
        assert_eq!(body.quantity.as_i64(), Some(3));

        let body: UpdateCartRequest = serde_json::from_str(r#"{"quantity": -1}"#).unwrap();
        assert_eq!(body.quantity.as_i64(), Some(-1));

        let body: UpdateCartRequest = serde_json::from_str(r#"{"quantity": "abc"}"#).unwrap();
        assert_eq!(body.quantity.as_i64(), None);
    }

    #[test]
    fn ids_become_string_keys() {
        let body: AddToCartRequest =
            serde_json::from_str(r#"{"id": 12, "name": "Rừng Na Uy", "price": 145000}"#).unwrap();
        assert_eq!(body.id.as_key(), "12");
    }
}
