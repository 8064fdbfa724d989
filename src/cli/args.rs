//! Command line argument parsing and validation.

use crate::bundler::{BuildConfiguration, BuildKind};
use clap::Parser;
use std::path::PathBuf;

/// Packages already-built products into a relocatable macOS .app
#[derive(Parser, Debug)]
#[command(
    name = "bundle-relocator",
    version,
    about = "Packages already-built products into a relocatable macOS .app",
    long_about = "Packages the output of a completed build into a macOS .app bundle.

Copies dynamic libraries into Contents/Libraries and rewrites the executable's
install names to match, then copies resource bundles into Contents/Resources,
restructuring flat SwiftPM bundles and compiling their Metal shaders.

App settings are read from Bundler.toml at the package root:

  [apps.HelloWorld]
  product = \"HelloWorld\"
  version = \"0.1.0\"
  identifier = \"com.example.HelloWorld\"

Usage:
  bundle-relocator --directory . --configuration release
  bundle-relocator --universal --configuration release --app HelloWorld
  bundle-relocator --xcodebuild --products-directory build/Release"
)]
pub struct Args {
    /// Package root containing Bundler.toml and .build
    #[arg(short = 'd', long, value_name = "DIR", default_value = ".")]
    pub directory: PathBuf,

    /// Build configuration the products were compiled with
    #[arg(short = 'c', long, value_enum, default_value_t = BuildConfiguration::Debug)]
    pub configuration: BuildConfiguration,

    /// Products are a universal (multi-architecture) build
    #[arg(short = 'u', long)]
    pub universal: bool,

    /// Products were built by xcodebuild (libraries under PackageFrameworks)
    #[arg(long)]
    pub xcodebuild: bool,

    /// Use this products directory instead of querying `swift -print-target-info`
    #[arg(long, value_name = "DIR")]
    pub products_directory: Option<PathBuf>,

    /// Directory to create the .app in [default: <DIR>/.build/bundler]
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_directory: Option<PathBuf>,

    /// App to bundle (required when Bundler.toml declares several)
    #[arg(short = 'a', long, value_name = "NAME")]
    pub app: Option<String>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Build system kind selected by the flags.
    pub fn build_kind(&self) -> BuildKind {
        if self.xcodebuild {
            BuildKind::Xcodebuild
        } else {
            BuildKind::SwiftPm
        }
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.directory.as_os_str().is_empty() {
            return Err("Package directory cannot be empty".to_string());
        }

        if let Some(app) = &self.app
            && app.trim().is_empty()
        {
            return Err("App name cannot be empty".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["bundle-relocator"]).unwrap();
        assert_eq!(args.directory, PathBuf::from("."));
        assert_eq!(args.configuration, BuildConfiguration::Debug);
        assert!(!args.universal);
        assert_eq!(args.build_kind(), BuildKind::SwiftPm);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn parses_flags() {
        let args = Args::try_parse_from([
            "bundle-relocator",
            "-c",
            "release",
            "--universal",
            "--xcodebuild",
            "--app",
            "Hello",
        ])
        .unwrap();
        assert_eq!(args.configuration, BuildConfiguration::Release);
        assert!(args.universal);
        assert_eq!(args.build_kind(), BuildKind::Xcodebuild);
        assert_eq!(args.app.as_deref(), Some("Hello"));
    }

    #[test]
    fn rejects_blank_app_name() {
        let args = Args::try_parse_from(["bundle-relocator", "--app", " "]).unwrap();
        assert!(args.validate().is_err());
    }
}
