//! Write a snapshot on demand.
//!
//! By default exports the cocktail family to the export series
//! (`Cocktails/cocktails-json-{timestamp}.json`) read by the cocktail
//! bootstrap. With `--all`, writes the three state series with one shared
//! timestamp, as the shutdown path does.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;

use clap::Parser;
use tokio::runtime::Builder;
use tracing::warn;
use ortho_config::OrthoConfig;
use tracing_subscriber::{EnvFilter, fmt};

use cocktails::lifecycle::{LifecycleSettings, PgLifecycleContext};
use cocktails::outbound::persistence::DbPool;

/// `snapshot-now` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "snapshot-now",
    about = "Export the cocktail family, or every family with --all",
    version
)]
struct CliArgs {
    /// Write users, bars and cocktails to their state series.
    #[arg(long)]
    all: bool,
    /// Database connection URL. Falls back to settings and `DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Snapshot root directory. Falls back to settings.
    #[arg(long = "snapshots-root", value_name = "path")]
    snapshots_root: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let settings = LifecycleSettings::load_from_iter([OsString::from("snapshot-now")])
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;

    let database_url = resolve_database_url(args.database_url, settings.database_url())?;
    let snapshots_root = args
        .snapshots_root
        .unwrap_or_else(|| settings.snapshots_root());
    let pool = DbPool::new(settings.pool_config(database_url).for_operator_command())
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;
    let context = PgLifecycleContext::from_pool(pool, snapshots_root, settings.import_path());

    if args.all {
        let report = context.capture.capture_all().await;
        for (family, path) in &report.written {
            println!("{family}={}", path.display());
        }
        if let Some(first) = report.failures.first() {
            return Err(io::Error::other(format!(
                "{} of 3 families failed; first error: {first}",
                report.failures.len()
            )));
        }
    } else {
        let path = context
            .capture
            .export_cocktails()
            .await
            .map_err(|error| io::Error::other(format!("cocktail export failed: {error}")))?;
        println!("cocktails={}", path.display());
    }
    Ok(())
}

fn resolve_database_url(explicit: Option<String>, configured: Option<String>) -> io::Result<String> {
    match explicit {
        Some(value) if value.trim().is_empty() => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "--database-url must not be empty when provided",
        )),
        Some(value) => Ok(value),
        None => configured.ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "database URL missing: set --database-url, COCKTAILS_DATABASE_URL or DATABASE_URL",
            )
        }),
    }
}
