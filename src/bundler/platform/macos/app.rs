//! `.app` skeleton creation.
//!
//! Lays out the bundle the later stages fill in:
//!
//! ```text
//! <App>.app/Contents/
//!     Info.plist
//!     PkgInfo
//!     MacOS/<App>
//!     Libraries/    <- dynamic libraries
//!     Resources/    <- resource bundles
//! ```

use super::info_plist::{MANIFEST_FILE_NAME, ManifestGenerator};
use crate::bundler::{
    error::{AppBundleError, ManifestError},
    settings::Settings,
    utils::fs,
};
use std::path::{Path, PathBuf};

/// Contents of `PkgInfo` for applications.
const PKG_INFO: &str = "APPL????";

/// Paths inside an app bundle.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AppBundleLayout {
    /// `<App>.app`
    pub bundle: PathBuf,
    /// `Contents`
    pub contents: PathBuf,
    /// `Contents/MacOS/<App>`
    pub executable: PathBuf,
    /// `Contents/Libraries`
    pub libraries: PathBuf,
    /// `Contents/Resources`
    pub resources: PathBuf,
}

impl AppBundleLayout {
    /// Computes the layout of `bundle` for an app called `app_name`.
    pub fn new(bundle: &Path, app_name: &str) -> Self {
        let contents = bundle.join("Contents");
        Self {
            bundle: bundle.to_path_buf(),
            executable: contents.join("MacOS").join(app_name),
            libraries: contents.join("Libraries"),
            resources: contents.join("Resources"),
            contents,
        }
    }
}

/// Creates the `.app` skeleton with the executable and manifests in place.
///
/// An existing bundle at the same path is removed first.
///
/// # Arguments
/// * `manifests` - Writes `Contents/Info.plist`
/// * `settings` - Bundle configuration
/// * `products_dir` - Directory containing the executable product
pub async fn create_app_bundle<M: ManifestGenerator>(
    manifests: &M,
    settings: &Settings,
    products_dir: &Path,
) -> Result<AppBundleLayout, AppBundleError> {
    let source_executable = products_dir.join(&settings.app().product);
    if !source_executable.is_file() {
        return Err(AppBundleError::MissingExecutable(source_executable));
    }

    let layout = AppBundleLayout::new(&settings.app_bundle_path(), settings.app_name());
    log::info!("Creating {}", layout.bundle.display());

    fs::create_dir_all(&layout.bundle, true)
        .await
        .map_err(|source| AppBundleError::StructureCreationFailed {
            path: layout.bundle.clone(),
            source,
        })?;

    let executable_dir = layout.executable.parent().unwrap_or(&layout.contents);
    for dir in [
        executable_dir,
        layout.libraries.as_path(),
        layout.resources.as_path(),
    ] {
        fs::create_dir_all(dir, false)
            .await
            .map_err(|source| AppBundleError::StructureCreationFailed {
                path: dir.to_path_buf(),
                source,
            })?;
    }

    fs::copy_file(&source_executable, &layout.executable)
        .await
        .map_err(|source| AppBundleError::ExecutableCopyFailed {
            path: layout.executable.clone(),
            source,
        })?;
    fs::set_executable(&layout.executable)
        .await
        .map_err(|source| AppBundleError::ExecutableCopyFailed {
            path: layout.executable.clone(),
            source,
        })?;

    manifests
        .create_app_manifest(
            &layout.contents.join(MANIFEST_FILE_NAME),
            settings.app_name(),
            settings.app(),
        )
        .map_err(AppBundleError::ManifestCreationFailed)?;

    let pkg_info = layout.contents.join("PkgInfo");
    tokio::fs::write(&pkg_info, PKG_INFO)
        .await
        .map_err(|source| {
            AppBundleError::ManifestCreationFailed(ManifestError::Io {
                path: pkg_info.clone(),
                source,
            })
        })?;

    Ok(layout)
}
