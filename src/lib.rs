//! Post-build packager for macOS app bundles
//!
//! This library turns the products of a finished SwiftPM or xcodebuild run
//! into a self-contained `.app`:
//! - dynamic libraries are copied into `Contents/Libraries` and the
//!   executable's install names are rewritten with `install_name_tool`
//! - resource bundles are copied into `Contents/Resources`, restructured into
//!   proper macOS bundles and have their Metal shaders compiled
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;
pub mod metadata;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
