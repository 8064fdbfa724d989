//! Core Settings struct and implementations.

use super::{AppSettings, BuildConfiguration, BuildKind};
use std::path::{Path, PathBuf};

/// Main settings for a packaging run.
///
/// Constructed via [`SettingsBuilder`](super::SettingsBuilder), which
/// absolutises every path so later relative-path arithmetic never mixes
/// absolute and relative locations.
///
/// # Examples
///
/// ```no_run
/// use bundle_relocator::bundler::{AppSettings, BuildConfiguration, SettingsBuilder};
///
/// # fn example() -> bundle_relocator::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .package_root(".")
///     .configuration(BuildConfiguration::Release)
///     .app(
///         "HelloWorld",
///         AppSettings {
///             product: "HelloWorld".into(),
///             version: "1.0.0".into(),
///             identifier: "com.example.HelloWorld".into(),
///             minimum_macos_version: None,
///             category: None,
///         },
///     )
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    /// Root of the package that was built.
    package_root: PathBuf,

    /// Build configuration of the products.
    configuration: BuildConfiguration,

    /// Whether products were built for several architectures at once.
    universal: bool,

    /// Build system that produced the products.
    build_kind: BuildKind,

    /// Explicit products directory, bypassing target-info lookup.
    products_directory: Option<PathBuf>,

    /// Directory the `.app` is created in.
    output_directory: PathBuf,

    /// Name of the app (the `.app` file stem and CFBundleName).
    app_name: String,

    /// App configuration.
    app: AppSettings,
}

impl Settings {
    /// Returns the package root.
    pub fn package_root(&self) -> &Path {
        &self.package_root
    }

    /// Returns the build configuration.
    pub fn configuration(&self) -> BuildConfiguration {
        self.configuration
    }

    /// Returns whether this is a universal build.
    pub fn universal(&self) -> bool {
        self.universal
    }

    /// Returns the build system kind.
    pub fn build_kind(&self) -> BuildKind {
        self.build_kind
    }

    /// Returns the explicit products directory, if any.
    pub fn products_directory(&self) -> Option<&Path> {
        self.products_directory.as_deref()
    }

    /// Returns the output directory.
    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    /// Returns the app name.
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Returns the app configuration.
    pub fn app(&self) -> &AppSettings {
        &self.app
    }

    /// Path of the `.app` bundle that will be produced.
    pub fn app_bundle_path(&self) -> PathBuf {
        self.output_directory.join(format!("{}.app", self.app_name))
    }

    /// Whether resource bundles need restructuring into `Contents/Resources`.
    ///
    /// Only plain single-architecture SwiftPM builds emit flat bundles;
    /// `xcodebuild` and universal builds already produce the canonical layout.
    pub fn fix_bundles(&self) -> bool {
        !self.universal && !self.build_kind.is_xcodebuild()
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        package_root: PathBuf,
        configuration: BuildConfiguration,
        universal: bool,
        build_kind: BuildKind,
        products_directory: Option<PathBuf>,
        output_directory: PathBuf,
        app_name: String,
        app: AppSettings,
    ) -> Self {
        Self {
            package_root,
            configuration,
            universal,
            build_kind,
            products_directory,
            output_directory,
            app_name,
            app,
        }
    }
}
