//! OpenAPI / Swagger UI documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::OpenApi;

use crate::gateway::handlers::HealthResponse;
use crate::gateway::types::{
    CreateOrderRequest, DeleteResponseData, UpdateOrderRequest, UpdateStatusRequest,
};
use crate::models::{Order, OrderItem, OrderStatus};

/// Main API documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Curbside Pickup Order API",
        version = "1.0.0",
        description = "Order admission and lifecycle: geofenced checkout, status notifications, expiry sweep.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::gateway::handlers::orders::create_order,
        crate::gateway::handlers::orders::list_orders,
        crate::gateway::handlers::orders::get_order,
        crate::gateway::handlers::orders::update_order,
        crate::gateway::handlers::orders::delete_order,
        crate::gateway::handlers::orders::list_user_orders,
        crate::gateway::handlers::orders::update_order_status,
    ),
    components(schemas(
        Order,
        OrderItem,
        OrderStatus,
        CreateOrderRequest,
        UpdateOrderRequest,
        UpdateStatusRequest,
        DeleteResponseData,
        HealthResponse,
    )),
    tags(
        (name = "Orders", description = "Order admission and lifecycle"),
        (name = "System", description = "Health and diagnostics")
    )
)]
pub struct ApiDoc;
