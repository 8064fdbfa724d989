//! Main bundler orchestration.
//!
//! This module provides the [`Bundler`] orchestrator that runs the packaging
//! stages in sequence, each consuming the previous stage's output directory.

use crate::bundler::{
    Result, Settings,
    platform::macos::{
        app::create_app_bundle,
        dylib::{DynamicLibraryRelocator, RelocatedLibrary},
        info_plist::PlistManifestGenerator,
        metal::MetalCompiler,
        products::locate_products_directory,
        resources::ResourceBundleNormalizer,
    },
    process::ToolInvoker,
};
use std::path::PathBuf;

/// Summary of a completed packaging run.
#[derive(Clone, Debug)]
pub struct BundledApp {
    /// Path of the created `.app`
    pub path: PathBuf,
    /// Products directory the artifacts were taken from
    pub products_directory: PathBuf,
    /// Executable inside the bundle
    pub executable: PathBuf,
    /// Libraries copied into `Contents/Libraries`
    pub libraries: Vec<RelocatedLibrary>,
    /// Resource bundles written into `Contents/Resources`
    pub resource_bundles: Vec<PathBuf>,
}

/// Main bundler orchestrator.
///
/// Runs every external tool through `T`; pass a
/// [`ProcessRunner`](crate::bundler::ProcessRunner) for real runs.
///
/// Stages run strictly one after another and the first failure is returned
/// as-is. Work finished by earlier stages is left on disk.
pub struct Bundler<T: ToolInvoker> {
    settings: Settings,
    tools: T,
    manifests: PlistManifestGenerator,
}

impl<T: ToolInvoker> std::fmt::Debug for Bundler<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bundler")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl<T: ToolInvoker> Bundler<T> {
    /// Creates a new bundler with the given settings and tool invoker.
    pub fn new(settings: Settings, tools: T) -> Self {
        Self {
            settings,
            tools,
            manifests: PlistManifestGenerator,
        }
    }

    /// Returns a reference to the bundler settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the tool invoker.
    pub fn tools(&self) -> &T {
        &self.tools
    }

    /// Resolves the build products directory.
    ///
    /// An explicit directory from the settings wins over the target-info lookup.
    pub async fn products_directory(&self) -> Result<PathBuf> {
        if let Some(dir) = self.settings.products_directory() {
            log::debug!("Using products directory override: {}", dir.display());
            return Ok(dir.to_path_buf());
        }

        Ok(locate_products_directory(
            &self.tools,
            self.settings.package_root(),
            self.settings.configuration(),
            self.settings.universal(),
        )
        .await?)
    }

    /// Runs the whole packaging pipeline.
    ///
    /// # Returns
    ///
    /// A [`BundledApp`] describing what was written.
    pub async fn bundle(&self) -> Result<BundledApp> {
        let settings = &self.settings;

        log::info!("Locating build products ({})", settings.configuration());
        let products_directory = self.products_directory().await?;
        log::info!("Using products in {}", products_directory.display());

        let layout = create_app_bundle(&self.manifests, settings, &products_directory).await?;

        log::info!("Copying dynamic libraries");
        let libraries = DynamicLibraryRelocator::new(&self.tools)
            .relocate(
                &products_directory,
                &layout.libraries,
                &layout.executable,
                settings.build_kind(),
                settings.universal(),
            )
            .await?;

        log::info!("Copying resource bundles");
        let shaders = MetalCompiler::new(&self.tools);
        let resource_bundles = ResourceBundleNormalizer::new(&self.manifests, &shaders)
            .normalize(
                &products_directory,
                &layout.resources,
                settings.fix_bundles(),
                settings.app().minimum_macos_version(),
            )
            .await?;

        log::info!("✓ Created {}", layout.bundle.display());

        Ok(BundledApp {
            path: layout.bundle,
            products_directory,
            executable: layout.executable,
            libraries,
            resource_bundles,
        })
    }
}
