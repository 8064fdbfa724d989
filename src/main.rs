//! Bundle Relocator - packages already-built products into a macOS .app.
//!
//! Tool processes still running when the user interrupts are sent SIGTERM
//! before the process exits.

use bundle_relocator::{bundler::ProcessRegistry, cli};
use std::process;

/// Exit code for termination by signal (128 + SIGINT).
const SIGNAL_EXIT_CODE: i32 = 130;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let registry = ProcessRegistry::new();

    // Registrations made inside `run` must still be alive in the signal arm.
    let run = cli::run(registry.clone());
    tokio::pin!(run);

    let exit_code = tokio::select! {
        result = &mut run => match result {
            Ok(code) => code,
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        },
        signal = shutdown_signal() => {
            log::warn!("Received {}, terminating {} tool process(es)", signal, registry.len());
            let terminated = registry.terminate_all();
            log::debug!("Sent SIGTERM to {} process(es)", terminated);
            SIGNAL_EXIT_CODE
        }
    };

    process::exit(exit_code);
}

/// Resolves when the process is asked to stop.
#[cfg(unix)]
async fn shutdown_signal() -> &'static str {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => tokio::select! {
            _ = wait_for_ctrl_c() => "SIGINT",
            _ = sigterm.recv() => "SIGTERM",
        },
        Err(e) => {
            log::debug!("SIGTERM handler unavailable: {}", e);
            wait_for_ctrl_c().await
        }
    }
}

/// Resolves when the process is asked to stop.
#[cfg(not(unix))]
async fn shutdown_signal() -> &'static str {
    wait_for_ctrl_c().await
}

async fn wait_for_ctrl_c() -> &'static str {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::debug!("Ctrl-C handler unavailable: {}", e);
        std::future::pending::<()>().await;
    }
    "SIGINT"
}
