//! Store access: generic repositories, query compilation and entities.

pub mod base;
pub mod entities;
pub mod query;

pub use base::{CrudRepository, ReadRepository, SeaRepository, StoreEntity};
pub use query::{
    Conditional, Direction, Operation, Operator, OrderBy, QueryCompileError, RepositoryQuery,
};
