//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Adapters translate between Diesel row structs (`models.rs`) and domain
//! entities; row types and the schema never leave this module. Connections
//! come from a `bb8` pool through `diesel-async`.
//!
//! # Example
//!
//! ```ignore
//! use cocktails::outbound::persistence::{DbPool, DieselStateRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/cocktails")).await?;
//! let repo = DieselStateRepository::new(pool);
//! ```

mod diesel_session_token_repository;
mod diesel_state_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_session_token_repository::DieselSessionTokenRepository;
pub use diesel_state_repository::DieselStateRepository;
pub use migrations::{MIGRATIONS, MigrationError, apply_migrations, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
