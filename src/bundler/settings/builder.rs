//! Builder for constructing Settings.

use super::{AppSettings, BuildConfiguration, BuildKind, Settings};
use crate::bundler::error::{Context, ErrorExt};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Builder for constructing [`Settings`].
///
/// # Required
///
/// - `package_root`
/// - `app`
///
/// Everything else has a default: debug configuration, single-architecture
/// SwiftPM build, products located via target info, and output in
/// `<package_root>/.build/bundler`.
#[derive(Default)]
pub struct SettingsBuilder {
    package_root: Option<PathBuf>,
    configuration: BuildConfiguration,
    universal: bool,
    build_kind: BuildKind,
    products_directory: Option<PathBuf>,
    output_directory: Option<PathBuf>,
    app: Option<(String, AppSettings)>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the package root.
    pub fn package_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.package_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the build configuration.
    ///
    /// Default: [`BuildConfiguration::Debug`]
    pub fn configuration(mut self, configuration: BuildConfiguration) -> Self {
        self.configuration = configuration;
        self
    }

    /// Marks the products as a universal (multi-architecture) build.
    ///
    /// Default: false
    pub fn universal(mut self, universal: bool) -> Self {
        self.universal = universal;
        self
    }

    /// Sets the build system kind.
    ///
    /// Default: [`BuildKind::SwiftPm`]
    pub fn build_kind(mut self, build_kind: BuildKind) -> Self {
        self.build_kind = build_kind;
        self
    }

    /// Uses an explicit products directory instead of querying target info.
    ///
    /// Relative paths are resolved against the package root.
    pub fn products_directory<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.products_directory = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the directory the `.app` is created in.
    ///
    /// Relative paths are resolved against the package root.
    ///
    /// Default: `<package_root>/.build/bundler`
    pub fn output_directory<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_directory = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the app to bundle.
    pub fn app(mut self, name: impl Into<String>, settings: AppSettings) -> Self {
        self.app = Some((name.into(), settings));
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `package_root` or `app` is missing, or if the
    /// current directory is needed to absolutise a path and cannot be read.
    pub fn build(self) -> crate::bundler::Result<Settings> {
        let package_root = self.package_root.context("package_root is required")?;
        let (app_name, app) = self.app.context("app is required")?;

        let package_root = package_root
            .absolutize()
            .fs_context("failed to absolutize package root", &package_root)?
            .into_owned();

        let under_root = |path: PathBuf| -> crate::bundler::Result<PathBuf> {
            Ok(path
                .absolutize_from(&package_root)
                .fs_context("failed to absolutize", &path)?
                .into_owned())
        };

        let products_directory = self.products_directory.map(&under_root).transpose()?;
        let output_directory = under_root(
            self.output_directory
                .unwrap_or_else(|| PathBuf::from(".build").join("bundler")),
        )?;

        Ok(Settings::new(
            package_root,
            self.configuration,
            self.universal,
            self.build_kind,
            products_directory,
            output_directory,
            app_name,
            app,
        ))
    }
}
