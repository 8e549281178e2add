//! Startup hooks run before the listener accepts traffic.

use tracing::info;

use crate::domain::ports::{SnapshotStore, StateExporter, StateImporter, StateInventory};
use crate::domain::RestoreReport;

use super::config::LifecycleSettings;
use super::context::LifecycleContext;

/// Which startup hooks to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartupHooks {
    /// Whole-store restore from the state series.
    pub restore: bool,
    /// Cocktails-only bootstrap from the export series.
    pub cocktail_bootstrap: bool,
}

impl Default for StartupHooks {
    fn default() -> Self {
        Self {
            restore: true,
            cocktail_bootstrap: true,
        }
    }
}

impl From<&LifecycleSettings> for StartupHooks {
    fn from(settings: &LifecycleSettings) -> Self {
        Self {
            restore: settings.restore_on_startup,
            cocktail_bootstrap: settings.cocktail_bootstrap_on_startup,
        }
    }
}

/// Outcome of the startup hooks; `None` marks a disabled hook.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StartupReport {
    /// Whole-store restore.
    pub restore: Option<RestoreReport>,
    /// Cocktails-only bootstrap.
    pub bootstrap: Option<RestoreReport>,
}

/// Run the enabled hooks: whole-store restore first, then the cocktail
/// bootstrap, so a full restore that brought cocktails back closes the
/// second gate.
///
/// Failures are logged by the orchestrator and never abort startup.
pub async fn run_startup_hooks<R, S, T>(
    context: &LifecycleContext<R, S, T>,
    hooks: StartupHooks,
) -> StartupReport
where
    R: StateInventory + StateExporter + StateImporter,
    S: SnapshotStore,
{
    let restore = if hooks.restore {
        Some(context.restore.restore_if_empty().await)
    } else {
        info!(hook = "restore", "startup hook disabled");
        None
    };
    let bootstrap = if hooks.cocktail_bootstrap {
        Some(context.restore.bootstrap_cocktails_if_empty().await)
    } else {
        info!(hook = "cocktail_bootstrap", "startup hook disabled");
        None
    };
    StartupReport { restore, bootstrap }
}
