//! Cocktails service entry point.
//!
//! Startup: migrations, whole-store restore, cocktail bootstrap, then the
//! probe listener. Shutdown: probes drain, the listener stops, the final
//! snapshot is written and joined, and session tokens are purged before
//! `main` returns.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod server;

use std::ffi::OsString;
use std::io;

use actix_web::web;
use tracing::{error, info, warn};
use ortho_config::OrthoConfig;
use tracing_subscriber::{EnvFilter, fmt};

use cocktails::inbound::http::health::HealthState;
use cocktails::lifecycle::{LifecycleSettings, PgLifecycleContext, StartupHooks, run_startup_hooks};
use cocktails::outbound::persistence::{DbPool, apply_migrations};

use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = LifecycleSettings::load_from_iter([OsString::from("cocktails")])
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;
    let database_url = settings.database_url().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "database URL missing: set COCKTAILS_DATABASE_URL or DATABASE_URL",
        )
    })?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error))?;

    let applied = apply_migrations(database_url.clone())
        .await
        .map_err(io::Error::other)?;
    info!(count = applied, "pending migrations applied");

    let pool = DbPool::new(settings.pool_config(database_url))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;
    let context =
        PgLifecycleContext::from_pool(pool, settings.snapshots_root(), settings.import_path());

    let startup = run_startup_hooks(&context, StartupHooks::from(&settings)).await;
    info!(
        restore = ?startup.restore.as_ref().map(|report| report.outcome()),
        bootstrap = ?startup.bootstrap.as_ref().map(|report| report.outcome()),
        "startup hooks finished"
    );

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), ServerConfig::new(bind_addr))?;
    let server_handle = server.handle();
    let mut server_task = actix_web::rt::spawn(server);

    tokio::select! {
        result = &mut server_task => {
            match result {
                Ok(Ok(())) => warn!("probe listener stopped on its own"),
                Ok(Err(error)) => error!(error = %error, "probe listener failed"),
                Err(error) => error!(error = %error, "probe listener task aborted"),
            }
        }
        signal = shutdown_signal() => {
            if let Err(error) = signal {
                error!(error = %error, "signal handler failed; shutting down");
            }
            health_state.mark_unhealthy();
            server_handle.stop(true).await;
            if let Err(error) = server_task.await {
                error!(error = %error, "probe listener task aborted");
            }
        }
    }
    health_state.mark_unhealthy();

    let report = context.shutdown.shutdown().await;
    info!(
        snapshot_complete = report
            .snapshot
            .as_ref()
            .is_some_and(|snapshot| snapshot.is_complete()),
        tokens_purged = ?report.tokens_purged,
        "shutdown finished"
    );
    Ok(())
}

async fn shutdown_signal() -> io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result?;
                info!("received Ctrl+C, shutting down");
            }
            _ = terminate.recv() => info!("received terminate signal, shutting down"),
        }
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        info!("received Ctrl+C, shutting down");
    }
    Ok(())
}
