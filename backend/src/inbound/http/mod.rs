//! HTTP inbound adapter. Only the orchestration probes are exposed.

pub mod health;
