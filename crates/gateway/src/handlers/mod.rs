//! HTTP handlers.

pub mod health_handler;
pub mod store_handler;
pub mod user_handler;

pub use health_handler::health_routes;
pub use store_handler::store_routes;
pub use user_handler::user_routes;
