//! Configuration structures for a packaging run.
//!
//! [`Settings`] carries everything the pipeline needs: where the package
//! lives, how it was built, where the `.app` goes, and the per-app values
//! read from `Bundler.toml`.

mod app;
mod builder;
mod configuration;
mod core;

pub use app::{AppSettings, DEFAULT_MINIMUM_MACOS_VERSION};
pub use builder::SettingsBuilder;
pub use configuration::{BuildConfiguration, BuildKind};
pub use self::core::Settings;
