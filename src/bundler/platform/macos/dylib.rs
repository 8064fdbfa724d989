//! Dynamic library relocation for macOS .app bundles.
//!
//! Copies the dynamic libraries a build produced into the bundle and rewrites
//! the executable's load commands so each `@rpath/...` install name points at
//! the copied file instead of the build products directory.
//!
//! Every copied library is named `lib<name>.dylib`, whatever its original
//! form, so the new install name can be computed without looking at the
//! output directory.

use crate::bundler::{
    error::RelocationError,
    process::{ToolInvocation, ToolInvoker},
    settings::BuildKind,
    utils::{fs, path::relative_path, path::to_forward_slashes},
};
use std::path::{Path, PathBuf};

/// Extension of standalone shared libraries.
pub const SHARED_LIBRARY_EXTENSION: &str = "dylib";

/// Filename prefix of standalone shared libraries.
pub const LIBRARY_PREFIX: &str = "lib";

/// Extension of framework-wrapped libraries.
pub const FRAMEWORK_EXTENSION: &str = "framework";

/// Products subdirectory holding framework-wrapped libraries in `xcodebuild` output.
pub const PACKAGE_FRAMEWORKS_DIRECTORY: &str = "PackageFrameworks";

/// Rpath added to executables from universal and `xcodebuild` builds.
pub const BASE_RPATH: &str = "@executable_path/../lib";

/// How a library is packaged in the products directory.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LibraryKind {
    /// Bare `lib<name>.dylib` file
    Standalone,
    /// `<name>.framework/Versions/A/<name>`
    FrameworkWrapped,
}

/// A dynamic library found in the products directory.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LibraryReference {
    logical_name: String,
    original_path: PathBuf,
    kind: LibraryKind,
}

impl LibraryReference {
    /// Builds a reference to a bare shared library file.
    ///
    /// The logical name is the file stem with one leading `lib` removed.
    /// Returns `None` if the path has no UTF-8 file stem.
    pub fn standalone(path: &Path) -> Option<Self> {
        let stem = path.file_stem()?.to_str()?;
        let logical_name = match stem.strip_prefix(LIBRARY_PREFIX) {
            Some(name) if !name.is_empty() => name,
            _ => stem,
        };

        Some(Self {
            logical_name: logical_name.to_string(),
            original_path: path.to_path_buf(),
            kind: LibraryKind::Standalone,
        })
    }

    /// Builds a reference to the library inside a `.framework` directory.
    ///
    /// The library is always taken from `Versions/A/<name>`; frameworks with
    /// other version directories are not supported. Returns `None` if the
    /// path has no UTF-8 file stem.
    pub fn framework(framework_dir: &Path) -> Option<Self> {
        let name = framework_dir.file_stem()?.to_str()?;

        Some(Self {
            logical_name: name.to_string(),
            original_path: framework_dir.join("Versions").join("A").join(name),
            kind: LibraryKind::FrameworkWrapped,
        })
    }

    /// Name used in the canonical output file name.
    pub fn logical_name(&self) -> &str {
        &self.logical_name
    }

    /// Location of the library file in the products directory.
    pub fn original_path(&self) -> &Path {
        &self.original_path
    }

    /// Packaging form in the products directory.
    pub fn kind(&self) -> LibraryKind {
        self.kind
    }

    /// `lib<name>.dylib`.
    pub fn canonical_file_name(&self) -> String {
        format!(
            "{}{}.{}",
            LIBRARY_PREFIX, self.logical_name, SHARED_LIBRARY_EXTENSION
        )
    }
}

/// A library that was copied and whose install name was rewritten.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RelocatedLibrary {
    /// Logical library name
    pub name: String,
    /// Path of the copy inside the bundle
    pub destination: PathBuf,
    /// Install name the executable referenced before the rewrite
    pub old_install_name: String,
    /// Install name the executable references now
    pub new_install_name: String,
}

/// Directory that libraries are enumerated from.
pub fn library_search_root(products_dir: &Path, build_kind: BuildKind) -> PathBuf {
    if build_kind.is_xcodebuild() {
        products_dir.join(PACKAGE_FRAMEWORKS_DIRECTORY)
    } else {
        products_dir.to_path_buf()
    }
}

/// Lists the libraries directly inside `search_root`, sorted by file name.
///
/// `xcodebuild` products contribute `.framework` directories; SwiftPM
/// products contribute `.dylib` files. Anything else is ignored.
pub async fn enumerate_libraries(
    search_root: &Path,
    build_kind: BuildKind,
) -> Result<Vec<LibraryReference>, RelocationError> {
    let enumeration_failed = |source| RelocationError::EnumerationFailed {
        directory: search_root.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(search_root)
        .await
        .map_err(enumeration_failed)?;

    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(enumeration_failed)? {
        paths.push(entry.path());
    }
    paths.sort();

    let wanted_extension = if build_kind.is_xcodebuild() {
        FRAMEWORK_EXTENSION
    } else {
        SHARED_LIBRARY_EXTENSION
    };

    let mut libraries = Vec::new();
    for path in paths {
        if path.extension().and_then(|e| e.to_str()) != Some(wanted_extension) {
            continue;
        }

        let library = if build_kind.is_xcodebuild() {
            LibraryReference::framework(&path)
        } else {
            LibraryReference::standalone(&path)
        };

        match library {
            Some(library) => libraries.push(library),
            None => log::warn!("Skipping library with non-UTF-8 name: {}", path.display()),
        }
    }

    Ok(libraries)
}

/// Copies dynamic libraries into a bundle and repoints the executable at them.
///
/// Each library is handled in enumeration order and the first failure stops
/// the pass. Nothing is rolled back: libraries handled before the failure
/// stay copied and the executable keeps their rewritten install names.
/// Two libraries mapping to the same `lib<name>.dylib` overwrite each other.
pub struct DynamicLibraryRelocator<'a, T: ToolInvoker> {
    tools: &'a T,
}

impl<'a, T: ToolInvoker> DynamicLibraryRelocator<'a, T> {
    /// Creates a relocator that patches executables through `tools`.
    pub fn new(tools: &'a T) -> Self {
        Self { tools }
    }

    /// Relocates every library in the products directory.
    ///
    /// # Arguments
    /// * `products_dir` - Build products directory
    /// * `output_dir` - Directory inside the bundle that receives the libraries
    /// * `executable` - Executable whose load commands are rewritten
    /// * `build_kind` - Build system that produced `products_dir`
    /// * `universal` - Whether `products_dir` holds a universal build
    ///
    /// # Process
    /// 1. Adds [`BASE_RPATH`] to the executable for universal and `xcodebuild` builds
    /// 2. Enumerates libraries in the search root
    /// 3. Computes the output directory relative to the executable's directory
    /// 4. For each library: copies it to `output_dir/lib<name>.dylib`, then
    ///    rewrites `@rpath/<original>` to `@rpath/<relative output>/lib<name>.dylib`
    pub async fn relocate(
        &self,
        products_dir: &Path,
        output_dir: &Path,
        executable: &Path,
        build_kind: BuildKind,
        universal: bool,
    ) -> Result<Vec<RelocatedLibrary>, RelocationError> {
        if universal || build_kind.is_xcodebuild() {
            self.add_base_rpath(executable).await?;
        }

        let search_root = library_search_root(products_dir, build_kind);
        log::info!(
            "Discovering dynamic libraries in {}",
            search_root.display()
        );
        let libraries = enumerate_libraries(&search_root, build_kind).await?;

        let executable_dir = executable.parent().unwrap_or_else(|| Path::new(""));
        let relocation_target = relative_path(executable_dir, output_dir).ok_or_else(|| {
            RelocationError::OutputPathNotRelative {
                from: executable_dir.to_path_buf(),
                to: output_dir.to_path_buf(),
            }
        })?;
        let relocation_target = to_forward_slashes(&relocation_target);
        log::debug!("Libraries are relocated to @rpath/{}", relocation_target);

        if libraries.is_empty() {
            log::debug!("No dynamic libraries to relocate");
            return Ok(Vec::new());
        }

        log::info!("Found {} dynamic libraries", libraries.len());

        let mut relocated = Vec::with_capacity(libraries.len());
        for library in &libraries {
            relocated.push(
                self.relocate_library(
                    library,
                    &search_root,
                    output_dir,
                    executable,
                    &relocation_target,
                )
                .await?,
            );
        }

        log::info!(
            "Relocated {} dynamic libraries into {}",
            relocated.len(),
            output_dir.display()
        );

        Ok(relocated)
    }

    /// Adds [`BASE_RPATH`] to the executable's rpath list.
    async fn add_base_rpath(&self, executable: &Path) -> Result<(), RelocationError> {
        log::debug!("Adding rpath {} to {}", BASE_RPATH, executable.display());

        let invocation = ToolInvocation::new("install_name_tool")
            .arg("-add_rpath")
            .arg(BASE_RPATH)
            .arg(executable);

        self.tools
            .run_checked(&invocation)
            .await
            .map_err(|source| RelocationError::AddRpathFailed {
                rpath: BASE_RPATH.to_string(),
                executable: executable.to_path_buf(),
                source,
            })?;

        Ok(())
    }

    /// Copies one library and rewrites its install name in the executable.
    async fn relocate_library(
        &self,
        library: &LibraryReference,
        search_root: &Path,
        output_dir: &Path,
        executable: &Path,
        relocation_target: &str,
    ) -> Result<RelocatedLibrary, RelocationError> {
        let file_name = library.canonical_file_name();
        let destination = output_dir.join(&file_name);

        log::info!("Copying {} to {}", library.logical_name(), destination.display());
        fs::copy_file(library.original_path(), &destination)
            .await
            .map_err(|source| RelocationError::CopyFailed {
                library: library.logical_name().to_string(),
                destination: destination.clone(),
                source,
            })?;

        let original_relative = relative_path(search_root, library.original_path())
            .ok_or_else(|| RelocationError::LibraryPathNotRelative {
                library: library.logical_name().to_string(),
                search_root: search_root.to_path_buf(),
                path: library.original_path().to_path_buf(),
            })?;

        let old_install_name = format!("@rpath/{}", to_forward_slashes(&original_relative));
        let new_install_name = format!("@rpath/{}/{}", relocation_target, file_name);

        log::debug!("  Rewriting: {} -> {}", old_install_name, new_install_name);

        let invocation = ToolInvocation::new("install_name_tool")
            .arg("-change")
            .arg(&old_install_name)
            .arg(&new_install_name)
            .arg(executable);

        self.tools
            .run_checked(&invocation)
            .await
            .map_err(|source| RelocationError::InstallNameUpdateFailed {
                library: library.logical_name().to_string(),
                executable: executable.to_path_buf(),
                source,
            })?;

        Ok(RelocatedLibrary {
            name: library.logical_name().to_string(),
            destination,
            old_install_name,
            new_install_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standalone_strips_single_lib_prefix() {
        let library = LibraryReference::standalone(Path::new("/p/libFoo.dylib")).unwrap();
        assert_eq!(library.logical_name(), "Foo");
        assert_eq!(library.canonical_file_name(), "libFoo.dylib");
        assert_eq!(library.kind(), LibraryKind::Standalone);

        let doubled = LibraryReference::standalone(Path::new("/p/liblibBar.dylib")).unwrap();
        assert_eq!(doubled.logical_name(), "libBar");
        assert_eq!(doubled.canonical_file_name(), "liblibBar.dylib");
    }

    #[test]
    fn standalone_without_prefix_gains_one() {
        let library = LibraryReference::standalone(Path::new("/p/Baz.dylib")).unwrap();
        assert_eq!(library.logical_name(), "Baz");
        assert_eq!(library.canonical_file_name(), "libBaz.dylib");

        let upper = LibraryReference::standalone(Path::new("/p/LibQux.dylib")).unwrap();
        assert_eq!(upper.logical_name(), "LibQux");
        assert_eq!(upper.canonical_file_name(), "libLibQux.dylib");
    }

    #[test]
    fn framework_uses_fixed_version_path() {
        let library = LibraryReference::framework(Path::new("/p/PackageFrameworks/Bar.framework"))
            .unwrap();
        assert_eq!(library.logical_name(), "Bar");
        assert_eq!(
            library.original_path(),
            Path::new("/p/PackageFrameworks/Bar.framework/Versions/A/Bar")
        );
        assert_eq!(library.kind(), LibraryKind::FrameworkWrapped);
        assert_eq!(library.canonical_file_name(), "libBar.dylib");
    }

    #[test]
    fn search_root_depends_on_build_kind() {
        let products = Path::new("/p/.build/apple/Products/Release");
        assert_eq!(library_search_root(products, BuildKind::SwiftPm), products);
        assert_eq!(
            library_search_root(products, BuildKind::Xcodebuild),
            products.join("PackageFrameworks")
        );
    }
}
