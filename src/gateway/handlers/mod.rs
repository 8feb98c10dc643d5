//! HTTP handlers

pub mod health;
pub mod orders;

pub use health::*;
pub use orders::*;
