//! curbside - pickup order admission and lifecycle service
//!
//! A cart becomes a binding order only when its delivery address resolves
//! to a real location inside the serviceable radius. Orders change status
//! with customer notifications, and a background sweep reclaims orders
//! left Pending past the expiry window.

pub mod admission;
pub mod config;
pub mod error;
pub mod gateway;
pub mod geocode;
pub mod geofence;
pub mod logging;
pub mod models;
pub mod notify;
pub mod snapshot;
pub mod status;
pub mod store;
pub mod sweeper;

pub use admission::{AdmissionService, NewOrder};
pub use error::OrderError;
pub use geofence::ServiceArea;
pub use models::{Order, OrderItem, OrderStatus};
