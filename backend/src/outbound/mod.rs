//! Driven adapters: PostgreSQL persistence and the filesystem snapshot store.

pub mod persistence;
pub mod snapshots;
