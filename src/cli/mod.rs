//! Command line interface for the bundler.
//!
//! Parses arguments, loads `Bundler.toml`, and runs the packaging pipeline
//! with a [`ProcessRunner`] bound to the caller's process registry.

mod args;

pub use args::Args;

use crate::bundler::{Bundler, ProcessRegistry, ProcessRunner, SettingsBuilder};
use crate::error::{CliError, Result};
use crate::metadata;

/// Main CLI entry point
///
/// Tool processes spawned during the run are registered in `registry` so
/// the caller can terminate them on a signal.
pub async fn run(registry: ProcessRegistry) -> Result<i32> {
    let args = Args::parse_args();
    execute(&args, registry).await
}

/// Runs the pipeline for already-parsed arguments.
pub async fn execute(args: &Args, registry: ProcessRegistry) -> Result<i32> {
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let config = metadata::load_config(&args.directory)?;
    let (app_name, app) = config.select_app(args.app.as_deref())?;
    log::info!("Bundling {} ({})", app_name, app.identifier);

    let mut builder = SettingsBuilder::new()
        .package_root(&args.directory)
        .configuration(args.configuration)
        .universal(args.universal)
        .build_kind(args.build_kind())
        .app(app_name, app.clone());
    if let Some(dir) = &args.products_directory {
        builder = builder.products_directory(dir);
    }
    if let Some(dir) = &args.output_directory {
        builder = builder.output_directory(dir);
    }
    let settings = builder.build()?;

    let bundler = Bundler::new(settings, ProcessRunner::new(registry));
    let app = bundler.bundle().await?;

    println!("{}", app.path.display());
    for library in &app.libraries {
        log::debug!("  {} -> {}", library.name, library.new_install_name);
    }

    Ok(0)
}
