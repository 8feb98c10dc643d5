//! Error taxonomy for the order admission and lifecycle pipeline.
//!
//! Every business-rule failure is a variant here; the gateway owns the
//! mapping to HTTP status codes (see `gateway::types`). The sweeper logs
//! its own failures and never surfaces them.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrderError {
    /// Malformed request caught before the pipeline runs.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Provider returned no usable result after the simplified-address
    /// retry, or the call failed at the transport level.
    #[error("Could not resolve the delivery address")]
    GeocodingFailed,

    /// Provider returned a candidate without coordinates.
    #[error("Geocoding provider returned an incomplete result")]
    InvalidGeocodeResponse,

    /// Resolved coordinates fall outside the serviceable radius.
    #[error("Delivery address is outside the serviceable area")]
    OutOfServiceArea,

    /// The user has no cart, or the cart has zero line items.
    #[error("Cart is empty")]
    CartEmpty,

    #[error("User not found")]
    UserNotFound,

    #[error("Order not found")]
    OrderNotFound,

    /// Notification email could not be sent.
    #[error("Failed to send notification: {0}")]
    NotificationFailed(String),

    #[error("Database error: {0}")]
    Store(#[from] sqlx::Error),
}

impl OrderError {
    /// Stable error name for structured responses and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::GeocodingFailed => "GEOCODING_FAILED",
            Self::InvalidGeocodeResponse => "INVALID_GEOCODE_RESPONSE",
            Self::OutOfServiceArea => "OUT_OF_SERVICE_AREA",
            Self::CartEmpty => "CART_EMPTY",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::OrderNotFound => "ORDER_NOT_FOUND",
            Self::NotificationFailed(_) => "NOTIFICATION_FAILED",
            Self::Store(_) => "STORE_FAILURE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_names() {
        assert_eq!(OrderError::GeocodingFailed.name(), "GEOCODING_FAILED");
        assert_eq!(OrderError::CartEmpty.name(), "CART_EMPTY");
        assert_eq!(
            OrderError::Validation("bad".into()).name(),
            "VALIDATION_FAILED"
        );
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            OrderError::OutOfServiceArea.to_string(),
            "Delivery address is outside the serviceable area"
        );
        assert!(
            OrderError::NotificationFailed("smtp down".into())
                .to_string()
                .contains("smtp down")
        );
    }
}
