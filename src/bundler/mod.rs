//! Post-build packaging of compiled products into a relocatable `.app` bundle.
//!
//! The pipeline runs three stages over an already-built package:
//!
//! 1. [`platform::macos::products`] locates the directory holding compiled artifacts
//! 2. [`platform::macos::dylib`] copies dynamic libraries into the bundle and
//!    rewrites the executable's install names to find them
//! 3. [`platform::macos::resources`] restructures resource bundles into the
//!    layout `NSBundle` expects, writing `Info.plist` and compiling Metal shaders
//!
//! [`Bundler`] wires the stages together. Every external tool call goes
//! through a [`ToolInvoker`], which is the seam tests use to observe and fake
//! `install_name_tool`, `swift` and `xcrun`.

pub mod builder;
pub mod error;
pub mod platform;
pub mod process;
pub mod settings;
pub mod utils;

pub use builder::{BundledApp, Bundler};
pub use error::{
    AppBundleError, Error, LocatorError, ManifestError, RelocationError, ResourceBundleError,
    Result, ShaderError, ToolError,
};
pub use platform::macos::dylib::{DynamicLibraryRelocator, LibraryKind, LibraryReference};
pub use platform::macos::metal::{MetalCompiler, ShaderCompiler};
pub use platform::macos::info_plist::{ManifestGenerator, PlistManifestGenerator};
pub use platform::macos::resources::ResourceBundleNormalizer;
pub use process::{ProcessRegistry, ProcessRunner, ToolInvocation, ToolInvoker, ToolOutput};
pub use settings::{AppSettings, BuildConfiguration, BuildKind, Settings, SettingsBuilder};
