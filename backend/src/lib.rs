//! Cocktails backend: snapshot, restore and bulk import lifecycle.
//!
//! - [`domain`]: entities, ports and lifecycle services;
//! - [`outbound`]: PostgreSQL and filesystem adapters;
//! - [`inbound`]: health probes;
//! - [`lifecycle`]: settings, the explicit context and startup hooks.

pub mod domain;
pub mod inbound;
pub mod lifecycle;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
