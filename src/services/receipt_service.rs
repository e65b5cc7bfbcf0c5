use chrono::Local;
use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionError, TransactionTrait};
use sea_orm::ActiveValue::NotSet;

use crate::{
    entity::{
        product::Entity as Products,
        receipt::{ActiveModel as ReceiptActive, Model as ReceiptModel},
        receipt_details::{ActiveModel as DetailActive, Model as DetailModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Cart, Receipt, ReceiptDetail, ReceiptWithDetails},
    state::AppState,
};

struct Line {
    product_id: i32,
    quantity: i32,
}

/// Turns the cart into a receipt in one transaction. Each line records the
/// product's current price. An empty cart writes nothing and yields `None`.
pub async fn save_receipt(
    state: &AppState,
    user: &AuthUser,
    cart: &Cart,
) -> AppResult<Option<ReceiptWithDetails>> {
    if cart.0.is_empty() {
        return Ok(None);
    }
    let lines = validate_lines(cart)?;

    let user_id = user.user_id;
    let (receipt, details) = state
        .orm
        .transaction::<_, _, AppError>(|txn| {
            Box::pin(async move {
                let receipt = ReceiptActive {
                    id: NotSet,
                    created_date: Set(Local::now().naive_local()),
                    user_id: Set(user_id),
                }
                .insert(txn)
                .await?;

                let mut details = Vec::with_capacity(lines.len());
                for line in &lines {
                    let product = Products::find_by_id(line.product_id)
                        .one(txn)
                        .await?
                        .ok_or(AppError::NotFound)?;

                    let detail = DetailActive {
                        id: NotSet,
                        quantity: Set(line.quantity),
                        price: Set(product.price),
                        receipt_id: Set(receipt.id),
                        product_id: Set(product.id),
                    }
                    .insert(txn)
                    .await?;
                    details.push(detail_from_entity(detail));
                }
                Ok((receipt, details))
            })
        })
        .await
        .map_err(|err| match err {
            TransactionError::Connection(db) => AppError::OrmError(db),
            TransactionError::Transaction(err) => err,
        })?;

    tracing::info!(
        receipt_id = receipt.id,
        user_id,
        lines = details.len(),
        "receipt saved"
    );
    Ok(Some(ReceiptWithDetails {
        receipt: receipt_from_entity(receipt),
        details,
    }))
}

fn validate_lines(cart: &Cart) -> AppResult<Vec<Line>> {
    cart.0
        .iter()
        .map(|(key, item)| {
            let product_id = key
                .parse::<i32>()
                .map_err(|_| AppError::BadRequest(format!("invalid product id {key}")))?;
            let quantity = i32::try_from(item.quantity)
                .ok()
                .filter(|q| *q >= 1)
                .ok_or_else(|| {
                    AppError::BadRequest(format!("invalid quantity for product {key}"))
                })?;
            Ok(Line {
                product_id,
                quantity,
            })
        })
        .collect()
}

fn receipt_from_entity(model: ReceiptModel) -> Receipt {
    Receipt {
        id: model.id,
        created_date: model.created_date,
        user_id: model.user_id,
    }
}

fn detail_from_entity(model: DetailModel) -> ReceiptDetail {
    ReceiptDetail {
        id: model.id,
        quantity: model.quantity,
        price: model.price,
        receipt_id: model.receipt_id,
        product_id: model.product_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::cart_service;

    #[test]
    fn non_positive_quantities_are_rejected() {
        let cart = cart_service::add(Cart::default(), "1", "A", 100);
        let cart = cart_service::update(cart, "1", 0);

        assert!(matches!(validate_lines(&cart), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn non_numeric_ids_are_rejected() {
        let cart = cart_service::add(Cart::default(), "abc", "A", 100);

        assert!(matches!(validate_lines(&cart), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn valid_lines_keep_quantities() {
        let cart = cart_service::add(Cart::default(), "4", "A", 100);
        let cart = cart_service::update(cart, "4", 3);

        let lines = validate_lines(&cart).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!((lines[0].product_id, lines[0].quantity), (4, 3));
    }
}
