//! Build configuration and build system kinds.

use std::fmt;

/// Build configuration the products were compiled with.
///
/// Determines the last component of the products directory: `debug` /
/// `release` for single-architecture SwiftPM builds, `Debug` / `Release` for
/// universal builds.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BuildConfiguration {
    /// Unoptimised build with debug info
    #[default]
    Debug,
    /// Optimised build
    Release,
}

impl BuildConfiguration {
    /// Lowercase name, as used in `.build/<triple>/<configuration>`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Release => "release",
        }
    }

    /// Capitalised name, as used in `.build/apple/Products/<Configuration>`.
    pub fn capitalized(&self) -> &'static str {
        match self {
            Self::Debug => "Debug",
            Self::Release => "Release",
        }
    }
}

impl fmt::Display for BuildConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build system that produced the products directory.
///
/// The two lay out dynamic libraries differently: SwiftPM leaves bare
/// `lib<Name>.dylib` files next to the executable, while `xcodebuild` wraps
/// each library in `PackageFrameworks/<Name>.framework`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum BuildKind {
    /// `swift build`
    #[default]
    SwiftPm,
    /// `xcodebuild`
    Xcodebuild,
}

impl BuildKind {
    /// Whether libraries are framework-wrapped under `PackageFrameworks`.
    pub fn is_xcodebuild(&self) -> bool {
        matches!(self, Self::Xcodebuild)
    }
}
