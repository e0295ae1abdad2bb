//! Users info module: CRUD over an in-memory user collection plus the
//! `/foo` JSON echo endpoint.

pub mod api;
pub mod contract;
pub mod domain;
pub mod infra;

mod module;

pub use module::UsersInfo;
