//! Process lifecycle: settings, the explicit context, and startup hooks.

mod config;
mod context;
mod startup;

pub use config::{DEFAULT_IMPORT_FILE, DEFAULT_SNAPSHOTS_ROOT, LifecycleSettings};
pub use context::{LifecycleContext, LifecyclePorts, PgLifecycleContext};
pub use startup::{StartupHooks, StartupReport, run_startup_hooks};
