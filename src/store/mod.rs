//! Persistent entity store: connection pool and repositories

pub mod carts;
pub mod db;
pub mod orders;
pub mod users;

pub use carts::CartRepository;
pub use db::Database;
pub use orders::{NewOrderRecord, OrderRepository, OrderUpdate};
pub use users::UserRepository;
