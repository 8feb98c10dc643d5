//! Data models for users, carts and pickup orders

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============================================================================
// Order Status
// ============================================================================

/// Order lifecycle status.
///
/// One canonical status field: the sweeper's deletion predicate and the
/// status-update path read and write the same column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    PickedUp,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::PickedUp => "PickedUp",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(Self::Pending),
            "Confirmed" => Some(Self::Confirmed),
            "PickedUp" => Some(Self::PickedUp),
            "Delivered" => Some(Self::Delivered),
            "Cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Entities
// ============================================================================

/// Customer account (read-only collaborator of the pipeline)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// One line of a live cart, with its service reference resolved
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartLine {
    pub service_id: i64,
    pub service_name: String,
    pub item: String,
    pub quantity: i32,
    pub price: Decimal,
}

/// A user's cart: mutable until snapshotted into an order
#[derive(Debug, Clone)]
pub struct Cart {
    pub cart_id: i64,
    pub user_id: i64,
    pub lines: Vec<CartLine>,
}

/// Immutable snapshot of one cart line, carried by an order.
///
/// One row per source cart line; lines referencing the same service are
/// never merged.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct OrderItem {
    pub service_id: i64,
    pub service_name: String,
    pub item: String,
    pub quantity: i32,
    #[schema(value_type = String)]
    pub price: Decimal,
}

/// A persisted pickup order.
///
/// The item snapshot and `expires_at` never change after creation;
/// `expires_at` is always `created_at` plus the fixed expiry window.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Order {
    pub order_id: i64,
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
    #[schema(value_type = String)]
    pub total: Decimal,
    pub requester_name: String,
    pub phone_number: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

// ============================================================================
// Resolved Address (value object, not persisted)
// ============================================================================

/// Output of the address resolver, consumed once by the admission pipeline.
///
/// Coordinates stay optional here: the provider may return a candidate
/// without geometry, and the pipeline owns that failure decision.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAddress {
    pub formatted: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub street: String,
    pub postal_code: String,
    pub city: String,
    pub country: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for s in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::PickedUp,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(OrderStatus::parse("Unknown"), None);
    }

    #[test]
    fn test_status_wire_strings() {
        assert_eq!(OrderStatus::Pending.as_str(), "Pending");
        assert_eq!(OrderStatus::PickedUp.to_string(), "PickedUp");
        let json = serde_json::to_string(&OrderStatus::Confirmed).unwrap();
        assert_eq!(json, "\"Confirmed\"");
    }
}
