//! restbase - generic persistence orchestration and stateless token
//! authentication over a relational store.
//!
//! The layers, bottom up:
//! - `infra`: sea-orm backed repositories, declarative query compilation,
//!   transaction brackets, migrations.
//! - `services::crud`: generic create/retrieve/update/delete orchestration
//!   with validation seams and entity-specific patch merging.
//! - `services::auth`: credential and bearer-token authentication, token
//!   issue and authorization checks.
//! - `api`: axum routes, middleware and extractors.

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

pub use errors::{AppError, AppResult};
