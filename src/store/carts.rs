//! Cart repository
//!
//! Carts are read-only from the pipeline's point of view: snapshotting an
//! order never writes back to the cart tables.

use sqlx::{PgPool, Row};

use crate::models::{Cart, CartLine};

pub struct CartRepository;

impl CartRepository {
    /// Find a user's cart with its line items and service references
    /// resolved, in insertion order. Returns `None` when the user has no
    /// cart row at all; a cart with zero lines comes back with an empty
    /// `lines` vec.
    pub async fn find_by_user(pool: &PgPool, user_id: i64) -> Result<Option<Cart>, sqlx::Error> {
        let cart_row = sqlx::query(r#"SELECT cart_id, user_id FROM carts WHERE user_id = $1"#)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        let Some(cart_row) = cart_row else {
            return Ok(None);
        };
        let cart_id: i64 = cart_row.get("cart_id");

        let lines: Vec<CartLine> = sqlx::query_as(
            r#"SELECT ci.service_id, s.name AS service_name, ci.item, ci.quantity, ci.price
               FROM cart_items ci
               JOIN services s ON s.service_id = ci.service_id
               WHERE ci.cart_id = $1
               ORDER BY ci.cart_item_id"#,
        )
        .bind(cart_id)
        .fetch_all(pool)
        .await?;

        Ok(Some(Cart {
            cart_id,
            user_id,
            lines,
        }))
    }
}
