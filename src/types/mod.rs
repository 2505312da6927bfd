//! Shared API types.

mod pagination;

pub use pagination::{PaginatedResponse, PaginationParams};
