//! Per-app settings from `Bundler.toml`.

/// Minimum macOS version used when an app does not set one.
pub const DEFAULT_MINIMUM_MACOS_VERSION: &str = "11.0";

/// macOS application bundle (.app) configuration.
///
/// # Configuration
///
/// Add to `Bundler.toml`:
///
/// ```toml
/// [apps.HelloWorld]
/// product = "HelloWorld"
/// version = "0.1.0"
/// identifier = "com.example.HelloWorld"
/// minimum_macos_version = "11.0"
/// category = "public.app-category.developer-tools"
/// ```
#[derive(Clone, Debug, serde::Deserialize)]
pub struct AppSettings {
    /// Executable product in the build products directory.
    pub product: String,

    /// Version string (CFBundleShortVersionString and CFBundleVersion).
    pub version: String,

    /// Bundle identifier in reverse domain notation (CFBundleIdentifier).
    pub identifier: String,

    /// Minimum macOS version required (LSMinimumSystemVersion).
    ///
    /// Also given to every normalised resource bundle.
    ///
    /// Default: "11.0"
    #[serde(default)]
    pub minimum_macos_version: Option<String>,

    /// LSApplicationCategoryType, e.g. "public.app-category.developer-tools".
    ///
    /// Default: None
    #[serde(default)]
    pub category: Option<String>,
}

impl AppSettings {
    /// Minimum macOS version, falling back to [`DEFAULT_MINIMUM_MACOS_VERSION`].
    pub fn minimum_macos_version(&self) -> &str {
        self.minimum_macos_version
            .as_deref()
            .unwrap_or(DEFAULT_MINIMUM_MACOS_VERSION)
    }
}
