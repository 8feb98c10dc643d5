//! Order repository
//!
//! Orders are the only entity the pipeline creates. The order row and its
//! item snapshot are written in one transaction, after every admission
//! check has already passed.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::models::{Order, OrderItem, OrderStatus};

/// Fields for a new order row.
///
/// `created_at` and `expires_at` are computed by the admission pipeline
/// (expiry = creation + fixed window) so the sweeper's cutoff and the
/// order's own expiry share one clock.
#[derive(Debug, Clone)]
pub struct NewOrderRecord {
    pub user_id: i64,
    pub items: Vec<OrderItem>,
    pub pickup_date: NaiveDate,
    pub pickup_time: String,
    pub formatted_address: String,
    pub street: String,
    pub postal_code: String,
    pub city: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub total: rust_decimal::Decimal,
    pub requester_name: String,
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Validated field changes for the admin update path. `None` leaves the
/// column untouched. The item snapshot is deliberately not updatable.
#[derive(Debug, Clone, Default)]
pub struct OrderUpdate {
    pub pickup_date: Option<NaiveDate>,
    pub pickup_time: Option<String>,
    pub requester_name: Option<String>,
    pub phone_number: Option<String>,
    pub status: Option<OrderStatus>,
}

pub struct OrderRepository;

impl OrderRepository {
    /// Insert an order with its item snapshot in one transaction.
    pub async fn insert(pool: &PgPool, rec: NewOrderRecord) -> Result<Order, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let row = sqlx::query(
            r#"INSERT INTO orders
                 (user_id, pickup_date, pickup_time, formatted_address, street,
                  postal_code, city, country, latitude, longitude, total,
                  requester_name, phone_number, status, created_at, expires_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
               RETURNING order_id"#,
        )
        .bind(rec.user_id)
        .bind(rec.pickup_date)
        .bind(&rec.pickup_time)
        .bind(&rec.formatted_address)
        .bind(&rec.street)
        .bind(&rec.postal_code)
        .bind(&rec.city)
        .bind(&rec.country)
        .bind(rec.latitude)
        .bind(rec.longitude)
        .bind(rec.total)
        .bind(&rec.requester_name)
        .bind(&rec.phone_number)
        .bind(OrderStatus::Pending.as_str())
        .bind(rec.created_at)
        .bind(rec.expires_at)
        .fetch_one(&mut *tx)
        .await?;
        let order_id: i64 = row.get("order_id");

        for item in &rec.items {
            sqlx::query(
                r#"INSERT INTO order_items (order_id, service_id, service_name, item, quantity, price)
                   VALUES ($1, $2, $3, $4, $5, $6)"#,
            )
            .bind(order_id)
            .bind(item.service_id)
            .bind(&item.service_name)
            .bind(&item.item)
            .bind(item.quantity)
            .bind(item.price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(Order {
            order_id,
            user_id: rec.user_id,
            items: rec.items,
            pickup_date: rec.pickup_date,
            pickup_time: rec.pickup_time,
            formatted_address: rec.formatted_address,
            street: rec.street,
            postal_code: rec.postal_code,
            city: rec.city,
            country: rec.country,
            latitude: rec.latitude,
            longitude: rec.longitude,
            total: rec.total,
            requester_name: rec.requester_name,
            phone_number: rec.phone_number,
            status: OrderStatus::Pending,
            created_at: rec.created_at,
            expires_at: rec.expires_at,
        })
    }

    /// Get order by ID, with its item snapshot
    pub async fn get_by_id(pool: &PgPool, order_id: i64) -> Result<Option<Order>, sqlx::Error> {
        let row = sqlx::query(&format!("{} WHERE order_id = $1", SELECT_ORDER))
            .bind(order_id)
            .fetch_optional(pool)
            .await?;

        match row {
            Some(r) => {
                let mut order = map_order(&r)?;
                order.items = Self::load_items(pool, order.order_id).await?;
                Ok(Some(order))
            }
            None => Ok(None),
        }
    }

    /// List all orders, newest first
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Order>, sqlx::Error> {
        let rows = sqlx::query(&format!("{} ORDER BY created_at DESC", SELECT_ORDER))
            .fetch_all(pool)
            .await?;
        Self::with_items(pool, rows).await
    }

    /// List a user's orders, newest first
    pub async fn list_by_user(pool: &PgPool, user_id: i64) -> Result<Vec<Order>, sqlx::Error> {
        let rows = sqlx::query(&format!(
            "{} WHERE user_id = $1 ORDER BY created_at DESC",
            SELECT_ORDER
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Self::with_items(pool, rows).await
    }

    /// Apply validated field changes; returns `None` when the order is absent.
    pub async fn update(
        pool: &PgPool,
        order_id: i64,
        update: &OrderUpdate,
    ) -> Result<Option<Order>, sqlx::Error> {
        let result = sqlx::query(
            r#"UPDATE orders SET
                 pickup_date    = COALESCE($2, pickup_date),
                 pickup_time    = COALESCE($3, pickup_time),
                 requester_name = COALESCE($4, requester_name),
                 phone_number   = COALESCE($5, phone_number),
                 status         = COALESCE($6, status)
               WHERE order_id = $1"#,
        )
        .bind(order_id)
        .bind(update.pickup_date)
        .bind(update.pickup_time.as_deref())
        .bind(update.requester_name.as_deref())
        .bind(update.phone_number.as_deref())
        .bind(update.status.map(|s| s.as_str()))
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::get_by_id(pool, order_id).await
    }

    /// Set the status column; returns `None` when the order is absent.
    pub async fn update_status(
        pool: &PgPool,
        order_id: i64,
        status: OrderStatus,
    ) -> Result<Option<Order>, sqlx::Error> {
        let result = sqlx::query(r#"UPDATE orders SET status = $2 WHERE order_id = $1"#)
            .bind(order_id)
            .bind(status.as_str())
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::get_by_id(pool, order_id).await
    }

    /// Delete one order (item snapshot goes with it via ON DELETE CASCADE)
    pub async fn delete(pool: &PgPool, order_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(r#"DELETE FROM orders WHERE order_id = $1"#)
            .bind(order_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every order still Pending and created strictly before `cutoff`.
    /// Returns the number of orders reclaimed.
    pub async fn delete_expired_pending(
        pool: &PgPool,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(r#"DELETE FROM orders WHERE status = $1 AND created_at < $2"#)
            .bind(OrderStatus::Pending.as_str())
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn load_items(pool: &PgPool, order_id: i64) -> Result<Vec<OrderItem>, sqlx::Error> {
        sqlx::query_as(
            r#"SELECT service_id, service_name, item, quantity, price
               FROM order_items WHERE order_id = $1
               ORDER BY order_item_id"#,
        )
        .bind(order_id)
        .fetch_all(pool)
        .await
    }

    async fn with_items(pool: &PgPool, rows: Vec<PgRow>) -> Result<Vec<Order>, sqlx::Error> {
        let mut orders = Vec::with_capacity(rows.len());
        for r in &rows {
            let mut order = map_order(r)?;
            order.items = Self::load_items(pool, order.order_id).await?;
            orders.push(order);
        }
        Ok(orders)
    }
}

const SELECT_ORDER: &str = r#"SELECT order_id, user_id, pickup_date, pickup_time,
    formatted_address, street, postal_code, city, country, latitude, longitude,
    total, requester_name, phone_number, status, created_at, expires_at
    FROM orders"#;

fn map_order(r: &PgRow) -> Result<Order, sqlx::Error> {
    let status: String = r.get("status");
    // A row with an unknown status is corrupt; never silently coerce it
    // to a sweep-eligible Pending.
    let status = OrderStatus::parse(&status).ok_or_else(|| sqlx::Error::ColumnDecode {
        index: "status".to_string(),
        source: format!("unrecognized order status {:?}", status).into(),
    })?;
    Ok(Order {
        order_id: r.get("order_id"),
        user_id: r.get("user_id"),
        items: Vec::new(),
        pickup_date: r.get("pickup_date"),
        pickup_time: r.get("pickup_time"),
        formatted_address: r.get("formatted_address"),
        street: r.get("street"),
        postal_code: r.get("postal_code"),
        city: r.get("city"),
        country: r.get("country"),
        latitude: r.get("latitude"),
        longitude: r.get("longitude"),
        total: r.get("total"),
        requester_name: r.get("requester_name"),
        phone_number: r.get("phone_number"),
        status,
        created_at: r.get("created_at"),
        expires_at: r.get("expires_at"),
    })
}
