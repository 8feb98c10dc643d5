//! Gateway types: request DTOs, the unified response envelope and the
//! typed error-kind-to-status mapping.
//!
//! The core returns structured `OrderError` kinds; this module owns the
//! HTTP status decision.

use std::sync::LazyLock;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::OrderError;
use crate::models::OrderStatus;
use crate::store::OrderUpdate;

// ============================================================================
// Unified API Response Format
// ============================================================================

/// Unified API response wrapper
///
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - data: actual data (success) or null (error)
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response code: 0 for success, non-zero for errors
    #[schema(example = 0)]
    pub code: i32,
    /// Response message
    #[schema(example = "ok")]
    pub msg: String,
    /// Response data (only present when code == 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }

    pub fn error(code: i32, msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

/// Standard API error codes
pub mod error_codes {
    // Success
    pub const SUCCESS: i32 = 0;

    // Admission business errors (1xxx)
    pub const VALIDATION_FAILED: i32 = 1001;
    pub const GEOCODING_FAILED: i32 = 1002;
    pub const INVALID_GEOCODE_RESPONSE: i32 = 1003;
    pub const OUT_OF_SERVICE_AREA: i32 = 1004;
    pub const CART_EMPTY: i32 = 1005;

    // Resource errors (4xxx)
    pub const USER_NOT_FOUND: i32 = 4001;
    pub const ORDER_NOT_FOUND: i32 = 4002;

    // Server errors (5xxx)
    pub const NOTIFICATION_FAILED: i32 = 5001;
    pub const STORE_FAILURE: i32 = 5002;
}

// ============================================================================
// Boundary error
// ============================================================================

/// Boundary error: an `OrderError` paired with its HTTP mapping.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl ToString) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: error_codes::VALIDATION_FAILED,
            message: message.to_string(),
        }
    }

    pub fn into_err<T>(self) -> ApiResult<T> {
        Err(self)
    }
}

impl From<OrderError> for ApiError {
    fn from(e: OrderError) -> Self {
        let (status, code) = match &e {
            OrderError::Validation(_) => (StatusCode::BAD_REQUEST, error_codes::VALIDATION_FAILED),
            OrderError::GeocodingFailed => {
                (StatusCode::BAD_REQUEST, error_codes::GEOCODING_FAILED)
            }
            OrderError::InvalidGeocodeResponse => (
                StatusCode::BAD_REQUEST,
                error_codes::INVALID_GEOCODE_RESPONSE,
            ),
            OrderError::OutOfServiceArea => {
                (StatusCode::BAD_REQUEST, error_codes::OUT_OF_SERVICE_AREA)
            }
            OrderError::CartEmpty => (StatusCode::BAD_REQUEST, error_codes::CART_EMPTY),
            OrderError::UserNotFound => (StatusCode::NOT_FOUND, error_codes::USER_NOT_FOUND),
            OrderError::OrderNotFound => (StatusCode::NOT_FOUND, error_codes::ORDER_NOT_FOUND),
            OrderError::NotificationFailed(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_codes::NOTIFICATION_FAILED,
            ),
            OrderError::Store(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_codes::STORE_FAILURE,
            ),
        };
        tracing::debug!("Request failed [{}]: {}", e.name(), e);
        Self {
            status,
            code,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()>::error(self.code, self.message);
        (self.status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

/// 200 response helper
pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

/// 201 response helper
pub fn created<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::CREATED, Json(ApiResponse::success(data))))
}

// ============================================================================
// Request DTOs
// ============================================================================

static PICKUP_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("valid regex"));

/// Create order request (POST /orders)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    pub user_id: i64,
    /// Pickup date (YYYY-MM-DD)
    pub pickup_date: NaiveDate,
    /// Pickup time, 24h "HH:MM"
    #[validate(regex(path = *PICKUP_TIME_RE, message = "pickup_time must be HH:MM"))]
    pub pickup_time: String,
    /// Free-text delivery address
    #[validate(length(min = 1, message = "address must not be empty"))]
    pub address: String,
    #[validate(length(min = 1, message = "requester_name must not be empty"))]
    pub requester_name: String,
    #[validate(length(min = 5, message = "phone_number too short"))]
    pub phone_number: String,
}

/// Admin bulk update request (PUT /orders/{id}); all fields optional
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderRequest {
    pub pickup_date: Option<NaiveDate>,
    #[validate(regex(path = *PICKUP_TIME_RE, message = "pickup_time must be HH:MM"))]
    pub pickup_time: Option<String>,
    #[validate(length(min = 1, message = "requester_name must not be empty"))]
    pub requester_name: Option<String>,
    #[validate(length(min = 5, message = "phone_number too short"))]
    pub phone_number: Option<String>,
    pub status: Option<OrderStatus>,
}

impl From<UpdateOrderRequest> for OrderUpdate {
    fn from(req: UpdateOrderRequest) -> Self {
        OrderUpdate {
            pickup_date: req.pickup_date,
            pickup_time: req.pickup_time,
            requester_name: req.requester_name,
            phone_number: req.phone_number,
            status: req.status,
        }
    }
}

/// Status-only update request (PATCH /orders/{id}/status)
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// Deletion acknowledgement
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponseData {
    pub order_id: i64,
    pub deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateOrderRequest {
        CreateOrderRequest {
            user_id: 1,
            pickup_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            pickup_time: "10:30".to_string(),
            address: "MG Road".to_string(),
            requester_name: "Asha".to_string(),
            phone_number: "+91-99999-00000".to_string(),
        }
    }

    #[test]
    fn test_create_request_validation() {
        assert!(create_request().validate().is_ok());

        let mut bad_time = create_request();
        bad_time.pickup_time = "25:99".to_string();
        assert!(bad_time.validate().is_err());

        let mut empty_address = create_request();
        empty_address.address = String::new();
        assert!(empty_address.validate().is_err());
    }

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (OrderError::GeocodingFailed, StatusCode::BAD_REQUEST),
            (OrderError::InvalidGeocodeResponse, StatusCode::BAD_REQUEST),
            (OrderError::OutOfServiceArea, StatusCode::BAD_REQUEST),
            (OrderError::CartEmpty, StatusCode::BAD_REQUEST),
            (OrderError::UserNotFound, StatusCode::NOT_FOUND),
            (OrderError::OrderNotFound, StatusCode::NOT_FOUND),
            (
                OrderError::NotificationFailed("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                OrderError::Store(sqlx::Error::PoolClosed),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            let api: ApiError = err.into();
            assert_eq!(api.status, expected, "code {}", api.code);
        }
    }

    #[test]
    fn test_error_codes_distinct() {
        let api: ApiError = OrderError::CartEmpty.into();
        assert_eq!(api.code, error_codes::CART_EMPTY);
        let api: ApiError = OrderError::OrderNotFound.into();
        assert_eq!(api.code, error_codes::ORDER_NOT_FOUND);
    }
}
