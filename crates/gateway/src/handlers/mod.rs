//! HTTP handlers.

pub mod health_handler;
pub mod registration_handler;

pub use health_handler::health_routes;
pub use registration_handler::registration_routes;
