//! Domain values and user-facing data shapes.

mod password;
mod user;

pub use password::Password;
pub use user::{CreateUser, UpdateUser, UserResponse};
