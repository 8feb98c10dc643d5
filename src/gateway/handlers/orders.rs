//! Order endpoints (create, read, update, delete, status)

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::admission::NewOrder;
use crate::error::OrderError;
use crate::models::Order;
use crate::store::OrderRepository;

use super::super::state::AppState;
use super::super::types::{
    ApiError, ApiResult, CreateOrderRequest, DeleteResponseData, UpdateOrderRequest,
    UpdateStatusRequest, created, ok,
};

/// Create order endpoint
///
/// POST /orders
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = Order, content_type = "application/json"),
        (status = 400, description = "Validation or admission failure"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Store failure")
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateOrderRequest>,
) -> ApiResult<Order> {
    // 1. Shape validation before the pipeline runs
    req.validate().map_err(ApiError::bad_request)?;

    // 2. Run the admission pipeline
    let order = state
        .admission
        .create_order(NewOrder {
            user_id: req.user_id,
            pickup_date: req.pickup_date,
            pickup_time: req.pickup_time,
            address: req.address,
            requester_name: req.requester_name,
            phone_number: req.phone_number,
        })
        .await?;

    created(order)
}

/// List all orders
///
/// GET /orders
#[utoipa::path(
    get,
    path = "/orders",
    responses(
        (status = 200, description = "All orders", body = [Order], content_type = "application/json")
    ),
    tag = "Orders"
)]
pub async fn list_orders(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Order>> {
    let orders = OrderRepository::list_all(state.pool())
        .await
        .map_err(OrderError::from)?;
    ok(orders)
}

/// Get one order by ID
///
/// GET /orders/{id}
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = i64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order", body = Order, content_type = "application/json"),
        (status = 404, description = "Order not found")
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<i64>,
) -> ApiResult<Order> {
    let order = OrderRepository::get_by_id(state.pool(), order_id)
        .await
        .map_err(OrderError::from)?
        .ok_or(OrderError::OrderNotFound)?;
    ok(order)
}

/// Admin bulk update
///
/// PUT /orders/{id}
#[utoipa::path(
    put,
    path = "/orders/{id}",
    params(("id" = i64, Path, description = "Order ID")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Updated order", body = Order, content_type = "application/json"),
        (status = 400, description = "Validation failure"),
        (status = 404, description = "Order not found")
    ),
    tag = "Orders"
)]
pub async fn update_order(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<i64>,
    Json(req): Json<UpdateOrderRequest>,
) -> ApiResult<Order> {
    req.validate().map_err(ApiError::bad_request)?;

    let order = state.status.update_order(order_id, req.into()).await?;
    ok(order)
}

/// Delete one order
///
/// DELETE /orders/{id}
#[utoipa::path(
    delete,
    path = "/orders/{id}",
    params(("id" = i64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Deleted", body = DeleteResponseData, content_type = "application/json"),
        (status = 404, description = "Order not found")
    ),
    tag = "Orders"
)]
pub async fn delete_order(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<i64>,
) -> ApiResult<DeleteResponseData> {
    let deleted = OrderRepository::delete(state.pool(), order_id)
        .await
        .map_err(OrderError::from)?;
    if !deleted {
        return ApiError::from(OrderError::OrderNotFound).into_err();
    }
    ok(DeleteResponseData {
        order_id,
        deleted: true,
    })
}

/// List one user's orders
///
/// GET /orders/user/{user_id}
#[utoipa::path(
    get,
    path = "/orders/user/{user_id}",
    params(("user_id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User's orders", body = [Order], content_type = "application/json")
    ),
    tag = "Orders"
)]
pub async fn list_user_orders(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> ApiResult<Vec<Order>> {
    let orders = OrderRepository::list_by_user(state.pool(), user_id)
        .await
        .map_err(OrderError::from)?;
    ok(orders)
}

/// Status-only update with customer notification
///
/// PATCH /orders/{id}/status
#[utoipa::path(
    patch,
    path = "/orders/{id}/status",
    params(("id" = i64, Path, description = "Order ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated order", body = Order, content_type = "application/json"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Notification failure")
    ),
    tag = "Orders"
)]
pub async fn update_order_status(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<i64>,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<Order> {
    let order = state.status.update_status(order_id, req.status).await?;
    ok(order)
}
