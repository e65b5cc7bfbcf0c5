//! Cart operations. Every function takes the cart by value and returns the
//! new cart; loading and storing it in the session is the handler's job.

use crate::{
    error::AppResult,
    middleware::session::Session,
    models::{Cart, CartItem, CartStats},
};

pub fn add(mut cart: Cart, id: &str, name: &str, price: i64) -> Cart {
    cart.0
        .entry(id.to_string())
        .and_modify(|item| item.quantity = item.quantity.saturating_add(1))
        .or_insert_with(|| CartItem {
            id: id.to_string(),
            name: name.to_string(),
            price,
            quantity: 1,
        });
    cart
}

/// Sets the quantity of an existing entry as given, zero and negative
/// values included. Unknown ids leave the cart unchanged.
pub fn update(mut cart: Cart, id: &str, quantity: i64) -> Cart {
    if let Some(item) = cart.0.get_mut(id) {
        item.quantity = quantity;
    }
    cart
}

pub fn delete(mut cart: Cart, id: &str) -> Cart {
    cart.0.remove(id);
    cart
}

/// Totals saturate at the `i64` bounds; quantities come straight from the client.
pub fn stats(cart: &Cart) -> CartStats {
    cart.0.values().fold(CartStats::default(), |acc, item| CartStats {
        total_quantity: acc.total_quantity.saturating_add(item.quantity),
        total_amount: acc
            .total_amount
            .saturating_add(item.price.saturating_mul(item.quantity)),
    })
}

pub fn load(session: &Session, key: &str) -> Cart {
    session.get(key).unwrap_or_default()
}

pub fn store(session: &mut Session, key: &str, cart: &Cart) -> AppResult<()> {
    session.insert(key, cart)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adding_same_product_twice_increments_quantity() {
        let cart = add(Cart::default(), "1", "Đắc Nhân Tâm", 90000);
        let cart = add(cart, "1", "Đắc Nhân Tâm", 90000);

        assert_eq!(cart.0.len(), 1);
        assert_eq!(cart.0["1"].quantity, 2);
    }

    #[test]
    fn add_keeps_first_name_and_price() {
        let cart = add(Cart::default(), "2", "Atomic Habits", 110000);
        let cart = add(cart, "2", "renamed", 1);

        assert_eq!(cart.0["2"].name, "Atomic Habits");
        assert_eq!(cart.0["2"].price, 110000);
    }

    #[test]
    fn stats_sum_quantity_and_amount() {
        let cart = add(Cart::default(), "1", "A", 90000);
        let cart = add(cart, "1", "A", 90000);
        let cart = add(cart, "3", "B", 120000);

        let totals = stats(&cart);

        assert_eq!(totals.total_quantity, 3);
        assert_eq!(totals.total_amount, 2 * 90000 + 120000);
        assert_eq!(stats(&Cart::default()), CartStats::default());
    }

    #[test]
    fn update_sets_quantity_without_lower_bound() {
        let cart = add(Cart::default(), "1", "A", 100);

        let cart = update(cart, "1", 5);
        assert_eq!(cart.0["1"].quantity, 5);

        let cart = update(cart, "1", -2);
        assert_eq!(cart.0["1"].quantity, -2);
        assert_eq!(stats(&cart).total_amount, -200);
    }

    #[test]
    fn oversized_quantities_saturate_instead_of_overflowing() {
        let cart = update(add(Cart::default(), "1", "A", 90000), "1", i64::MAX / 1000);
        assert_eq!(stats(&cart).total_amount, i64::MAX);

        let cart = update(cart, "1", i64::MAX);
        let cart = add(cart, "1", "A", 90000);
        assert_eq!(cart.0["1"].quantity, i64::MAX);

        let cart = add(cart, "2", "B", 1);
        assert_eq!(stats(&cart).total_quantity, i64::MAX);
    }

    #[test]
    fn update_of_unknown_id_is_ignored() {
        let cart = add(Cart::default(), "1", "A", 100);
        let updated = update(cart.clone(), "9", 4);

        assert_eq!(updated, cart);
    }

    #[test]
    fn deleting_missing_entry_is_noop() {
        let cart = add(Cart::default(), "1", "A", 100);

        let unchanged = delete(cart.clone(), "42");
        assert_eq!(unchanged, cart);

        let emptied = delete(cart, "1");
        assert!(emptied.0.is_empty());
    }

    #[test]
    fn cart_round_trips_through_session() {
        let mut session = Session::default();
        let cart = add(Cart::default(), "5", "C", 75000);

        store(&mut session, "cart", &cart).unwrap();

        assert_eq!(load(&session, "cart"), cart);
        assert_eq!(load(&session, "other"), Cart::default());
    }
}
