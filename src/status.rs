//! Status Transition Handler
//!
//! Mutates an existing order and notifies the owning customer. Both paths
//! require the order to exist; a status change sends exactly one email per
//! invocation (no dedup, no batching, no retry).

use std::sync::Arc;

use sqlx::PgPool;

use crate::error::OrderError;
use crate::models::{Order, OrderStatus};
use crate::notify::{Mailer, status_notification};
use crate::store::{OrderRepository, OrderUpdate, UserRepository};

pub struct StatusService {
    pool: PgPool,
    mailer: Arc<dyn Mailer>,
}

impl StatusService {
    pub fn new(pool: PgPool, mailer: Arc<dyn Mailer>) -> Self {
        Self { pool, mailer }
    }

    /// Apply validated field changes to an existing order.
    ///
    /// The owning user is notified only when the change set moves the
    /// status to a different value; re-asserting the current status does
    /// not email.
    pub async fn update_order(
        &self,
        order_id: i64,
        update: OrderUpdate,
    ) -> Result<Order, OrderError> {
        let current = OrderRepository::get_by_id(&self.pool, order_id)
            .await?
            .ok_or(OrderError::OrderNotFound)?;
        let status_changed = update.status.is_some_and(|s| s != current.status);

        let order = OrderRepository::update(&self.pool, order_id, &update)
            .await?
            .ok_or(OrderError::OrderNotFound)?;

        if status_changed {
            self.notify(&order).await?;
        }
        Ok(order)
    }

    /// Set the order status, persist, then email the owning user.
    ///
    /// Email failures propagate as the operation's failure; the status
    /// change itself is already persisted at that point.
    pub async fn update_status(
        &self,
        order_id: i64,
        status: OrderStatus,
    ) -> Result<Order, OrderError> {
        let order = OrderRepository::update_status(&self.pool, order_id, status)
            .await?
            .ok_or(OrderError::OrderNotFound)?;

        self.notify(&order).await?;

        tracing::info!("Order {}: status set to {}", order.order_id, order.status);
        Ok(order)
    }

    async fn notify(&self, order: &Order) -> Result<(), OrderError> {
        let user = UserRepository::get_by_id(&self.pool, order.user_id)
            .await?
            .ok_or(OrderError::UserNotFound)?;

        let (subject, body) = status_notification(order.order_id, order.status);
        self.mailer.send(&user.email, &subject, &body).await
    }
}
