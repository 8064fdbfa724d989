//! Top-level error types for the command line tool.
//!
//! Pipeline failures arrive as [`crate::bundler::Error`]; argument and
//! `Bundler.toml` problems are [`CliError`]s.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for command line operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Any failure of a command line run
#[derive(Error, Debug)]
pub enum BundlerError {
    /// Arguments or configuration rejected before packaging started
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Packaging pipeline failure
    #[error("Bundler error: {0}")]
    Bundler(#[from] crate::bundler::Error),
}

/// Errors detected before the pipeline runs
#[derive(Error, Debug)]
pub enum CliError {
    /// Flags that cannot be used as given
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// What is wrong with them
        reason: String,
    },

    /// `--app` is needed to pick between several apps
    #[error("Missing required argument: {argument}")]
    MissingArgument {
        /// Flag and accepted values
        argument: String,
    },

    /// `Bundler.toml` could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    ConfigUnreadable {
        /// Configuration file path
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `Bundler.toml` is not valid TOML or lacks required keys
    #[error("Failed to parse {}: {source}", .path.display())]
    ConfigInvalid {
        /// Configuration file path
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
