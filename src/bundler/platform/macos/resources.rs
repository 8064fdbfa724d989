//! Resource bundle normalisation.
//!
//! SwiftPM emits resource bundles as flat directories, but `Bundle` on macOS
//! only loads bundles shaped like `<Name>.bundle/Contents/{Info.plist,Resources/}`.
//! This stage copies every bundle from the products directory into the app,
//! restructuring it first when asked to.

use super::{info_plist::MANIFEST_FILE_NAME, info_plist::ManifestGenerator, metal::ShaderCompiler};
use crate::bundler::{error::ResourceBundleError, utils::fs};
use std::path::{Path, PathBuf};

/// Extension of resource bundle directories.
pub const RESOURCE_BUNDLE_EXTENSION: &str = "bundle";

/// A resource bundle discovered in the products directory.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResourceBundle {
    /// Bundle directory
    pub root_path: PathBuf,
    /// Whether it must be restructured into the canonical layout
    pub needs_normalization: bool,
}

impl ResourceBundle {
    /// `<Name>.bundle`
    pub fn file_name(&self) -> String {
        self.root_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// `<Name>`
    pub fn base_name(&self) -> String {
        self.root_path
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Lists `.bundle` directories directly inside `source_dir`, sorted by name.
pub async fn enumerate_resource_bundles(
    source_dir: &Path,
    fix_bundles: bool,
) -> Result<Vec<ResourceBundle>, ResourceBundleError> {
    let enumeration_failed = |source| ResourceBundleError::EnumerationFailed {
        directory: source_dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(source_dir)
        .await
        .map_err(enumeration_failed)?;

    let mut bundles = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(enumeration_failed)? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(RESOURCE_BUNDLE_EXTENSION) {
            continue;
        }
        // Follows symlinks, so a linked bundle directory still counts.
        if !tokio::fs::metadata(&path)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
        {
            continue;
        }
        bundles.push(ResourceBundle {
            root_path: path,
            needs_normalization: fix_bundles,
        });
    }

    bundles.sort_by(|a, b| a.root_path.cmp(&b.root_path));
    Ok(bundles)
}

/// Copies resource bundles into an app, restructuring them when needed.
///
/// Bundles are processed one at a time and the first failure stops the
/// pass; bundles finished before it stay in the destination. An existing
/// bundle at the destination is replaced, so repeated runs give the same tree.
pub struct ResourceBundleNormalizer<'a, M: ManifestGenerator, S: ShaderCompiler> {
    manifests: &'a M,
    shaders: &'a S,
}

impl<'a, M: ManifestGenerator, S: ShaderCompiler> ResourceBundleNormalizer<'a, M, S> {
    /// Creates a normaliser using the given manifest generator and shader compiler.
    pub fn new(manifests: &'a M, shaders: &'a S) -> Self {
        Self { manifests, shaders }
    }

    /// Copies every `.bundle` in `source_dir` into `destination_dir`.
    ///
    /// With `fix_bundles`, each bundle becomes
    /// `<Name>.bundle/Contents/{Info.plist,Resources/...}` and its Metal
    /// shaders are compiled into `Contents/Resources/default.metallib`, with
    /// the sources removed. Without it, bundles are copied verbatim.
    ///
    /// Returns the destination path of every bundle written.
    pub async fn normalize(
        &self,
        source_dir: &Path,
        destination_dir: &Path,
        fix_bundles: bool,
        minimum_macos_version: &str,
    ) -> Result<Vec<PathBuf>, ResourceBundleError> {
        let bundles = enumerate_resource_bundles(source_dir, fix_bundles).await?;
        if bundles.is_empty() {
            log::debug!("No resource bundles in {}", source_dir.display());
            return Ok(Vec::new());
        }

        let mut written = Vec::with_capacity(bundles.len());
        for bundle in &bundles {
            let destination = destination_dir.join(bundle.file_name());

            if bundle.needs_normalization {
                self.fix_bundle(bundle, &destination, minimum_macos_version)
                    .await?;
            } else {
                copy_bundle(bundle, &destination).await?;
            }

            written.push(destination);
        }

        log::info!(
            "Copied {} resource bundles into {}",
            written.len(),
            destination_dir.display()
        );
        Ok(written)
    }

    /// Rebuilds a flat bundle in the canonical layout at `destination`.
    async fn fix_bundle(
        &self,
        bundle: &ResourceBundle,
        destination: &Path,
        minimum_macos_version: &str,
    ) -> Result<(), ResourceBundleError> {
        let name = bundle.file_name();
        log::info!("Fixing and copying resource bundle {}", name);

        let contents = destination.join("Contents");
        let resources = contents.join("Resources");

        fs::remove_dir_all(destination)
            .await
            .map_err(|source| ResourceBundleError::BundleStructureCreationFailed {
                bundle: name.clone(),
                source,
            })?;
        fs::create_dir_all(&resources, false)
            .await
            .map_err(|source| ResourceBundleError::BundleStructureCreationFailed {
                bundle: name.clone(),
                source,
            })?;

        self.manifests
            .create_resource_bundle_manifest(
                &contents.join(MANIFEST_FILE_NAME),
                &bundle.base_name(),
                minimum_macos_version,
            )
            .map_err(|source| ResourceBundleError::ManifestCreationFailed {
                bundle: name.clone(),
                source,
            })?;

        fs::copy_dir_contents(&bundle.root_path, &resources)
            .await
            .map_err(|source| ResourceBundleError::ResourceCopyFailed {
                bundle: name.clone(),
                source,
            })?;

        self.shaders
            .compile_shaders(&resources, false)
            .await
            .map_err(|source| ResourceBundleError::ShaderCompilationFailed {
                bundle: name.clone(),
                source,
            })?;

        Ok(())
    }
}

/// Replaces `destination` with a verbatim copy of the bundle.
async fn copy_bundle(bundle: &ResourceBundle, destination: &Path) -> Result<(), ResourceBundleError> {
    let name = bundle.file_name();
    log::info!("Copying resource bundle {}", name);

    let copy_failed = |source| ResourceBundleError::BundleCopyFailed {
        bundle: name.clone(),
        source,
    };

    fs::remove_dir_all(destination).await.map_err(copy_failed)?;
    fs::copy_dir(&bundle.root_path, destination)
        .await
        .map_err(copy_failed)
}
