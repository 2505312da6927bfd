//! Service layer: resource orchestration and authentication.

pub mod auth;
pub mod crud;
mod user_service;

pub use user_service::UserService;
