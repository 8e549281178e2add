//! Bulk import cocktails from a snapshot-format JSON file.
//!
//! The file is decoded in full before anything is written, then committed in
//! one transaction. Without `--file` the configured import path is used.
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

/// `import-cocktails` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "import-cocktails",
    about = "Import cocktails and their ingredients in one transaction",
    version
)]
struct CliArgs {
    /// Import file. Defaults to the configured import path.
    #[arg(long, value_name = "path")]
    file: Option<PathBuf>,
    /// Database connection URL. Falls back to settings and `DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
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
    let settings = LifecycleSettings::load_from_iter([OsString::from("import-cocktails")])
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;

    let database_url = match args.database_url {
        Some(url) if !url.trim().is_empty() => url,
        Some(_) => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "--database-url must not be empty when provided",
            ));
        }
        None => settings.database_url().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "database URL missing: set --database-url, COCKTAILS_DATABASE_URL or DATABASE_URL",
            )
        })?,
    };
    let pool = DbPool::new(settings.pool_config(database_url).for_operator_command())
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;
    let context =
        PgLifecycleContext::from_pool(pool, settings.snapshots_root(), settings.import_path());

    let report = context
        .import
        .import(args.file.as_deref())
        .await
        .map_err(|error| io::Error::other(format!("import failed: {error}")))?;

    println!("path={}", report.path.display());
    println!("cocktails={}", report.cocktails);
    println!("ingredients={}", report.ingredients);
    Ok(())
}
