//! Pipeline orchestration.
//!
//! This module provides the [`Bundler`] orchestrator that runs the packaging
//! stages in order over an already-built package.
//!
//! # Overview
//!
//! The bundler:
//! 1. Reads configuration from [`Settings`](crate::bundler::Settings)
//! 2. Locates the build products directory
//! 3. Creates the `.app` skeleton around the executable
//! 4. Relocates dynamic libraries into `Contents/Libraries`
//! 5. Normalises resource bundles into `Contents/Resources`
//! 6. Returns a [`BundledApp`] summary
//!
//! # Example
//!
//! ```no_run
//! use bundle_relocator::bundler::{
//!     AppSettings, Bundler, ProcessRegistry, ProcessRunner, SettingsBuilder,
//! };
//!
//! # async fn example() -> bundle_relocator::bundler::Result<()> {
//! let settings = SettingsBuilder::new()
//!     .package_root(".")
//!     .app(
//!         "HelloWorld",
//!         AppSettings {
//!             product: "HelloWorld".into(),
//!             version: "1.0.0".into(),
//!             identifier: "com.example.HelloWorld".into(),
//!             minimum_macos_version: None,
//!             category: None,
//!         },
//!     )
//!     .build()?;
//!
//! let bundler = Bundler::new(settings, ProcessRunner::new(ProcessRegistry::new()));
//! let app = bundler.bundle().await?;
//! println!("Created {}", app.path.display());
//! # Ok(())
//! # }
//! ```

mod orchestrator;

pub use orchestrator::{BundledApp, Bundler};
