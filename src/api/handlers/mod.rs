//! Request handlers.

mod auth_handler;
mod user_handler;

pub use auth_handler::{auth_routes, LoginRequest, TokenResponse};
pub use user_handler::user_routes;
