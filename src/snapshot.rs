//! Cart Snapshotter
//!
//! Converts a live, mutable cart into the immutable item list an order
//! carries, and computes the order total. The source cart is left
//! untouched: the same cart can be checked out again, since the store
//! never clears it or marks it consumed.

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::error::OrderError;
use crate::models::{CartLine, OrderItem};
use crate::store::CartRepository;

/// Immutable copy of cart contents at order-creation time.
#[derive(Debug, Clone)]
pub struct CartSnapshot {
    pub items: Vec<OrderItem>,
    pub total: Decimal,
}

/// Build the snapshot from resolved cart lines.
///
/// One `OrderItem` per source line, in cart order; lines for the same
/// service are not merged. Total is the sum of each line's own
/// `price x quantity`, with no re-pricing.
pub fn build_snapshot(lines: &[CartLine]) -> CartSnapshot {
    let mut total = Decimal::ZERO;
    let mut items = Vec::with_capacity(lines.len());

    for line in lines {
        total += line.price * Decimal::from(line.quantity);
        items.push(OrderItem {
            service_id: line.service_id,
            service_name: line.service_name.clone(),
            item: line.item.clone(),
            quantity: line.quantity,
            price: line.price,
        });
    }

    CartSnapshot { items, total }
}

/// Load the user's cart and snapshot it.
///
/// Fails with `CartEmpty` when the cart does not exist or has zero lines.
pub async fn snapshot_cart(pool: &PgPool, user_id: i64) -> Result<CartSnapshot, OrderError> {
    let cart = CartRepository::find_by_user(pool, user_id)
        .await?
        .ok_or(OrderError::CartEmpty)?;

    if cart.lines.is_empty() {
        return Err(OrderError::CartEmpty);
    }

    Ok(build_snapshot(&cart.lines))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    fn line(service_id: i64, item: &str, quantity: i32, price: Decimal) -> CartLine {
        CartLine {
            service_id,
            service_name: format!("service-{}", service_id),
            item: item.to_string(),
            quantity,
            price,
        }
    }

    #[test]
    fn test_total_is_sum_of_price_times_quantity() {
        let lines = vec![
            line(1, "shirt", 3, dec!(10.50)),
            line(2, "trousers", 2, dec!(25.00)),
        ];
        let snap = build_snapshot(&lines);
        assert_eq!(snap.total, dec!(81.50));
        assert_eq!(snap.items.len(), 2);
    }

    #[test]
    fn test_lines_for_same_service_are_not_merged() {
        let lines = vec![
            line(1, "shirt", 1, dec!(10.00)),
            line(1, "shirt", 2, dec!(10.00)),
        ];
        let snap = build_snapshot(&lines);
        assert_eq!(snap.items.len(), 2);
        assert_eq!(snap.total, dec!(30.00));
    }

    #[test]
    fn test_snapshot_preserves_cart_order_and_line_prices() {
        let lines = vec![
            line(2, "duvet", 1, dec!(40.00)),
            line(1, "shirt", 5, dec!(9.99)),
        ];
        let snap = build_snapshot(&lines);
        assert_eq!(snap.items[0].item, "duvet");
        assert_eq!(snap.items[1].item, "shirt");
        // Each snapshot item carries the line's own price field
        assert_eq!(snap.items[1].price, dec!(9.99));
        assert_eq!(snap.total, dec!(89.95));
    }

    #[test]
    fn test_empty_lines_yield_zero_total() {
        let snap = build_snapshot(&[]);
        assert!(snap.items.is_empty());
        assert_eq!(snap.total, Decimal::ZERO);
    }
}
