//! HTTP request handlers.

pub mod auth_handler;
pub mod recovery_handler;
pub mod user_handler;

pub use auth_handler::auth_routes;
pub use recovery_handler::recovery_routes;
pub use user_handler::user_routes;
