//! Entity definitions.

pub mod user;
