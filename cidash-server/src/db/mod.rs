//! Database layer - connection pool, schema and repositories
//!
//! - Connection pool (max 5 connections by default)
//! - Append-only writes: build emails are inserted, never updated
//! - Lookups by key use `LIMIT 1`; by-build lookups JOIN the user table

pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::{create_lazy_pool, create_pool, create_pool_with_options};
pub use repos::*;
