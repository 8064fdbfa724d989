//! Error types for the packaging pipeline.
//!
//! Every stage returns its own closed error enum so callers can match on the
//! exact sub-step that failed. [`Error`] aggregates them for the orchestrator.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for bundler operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for bundler operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem operation failed on a specific path
    #[error("{context} {}: {source}", .path.display())]
    Fs {
        /// What was being attempted
        context: String,
        /// Path involved
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Build products directory could not be resolved
    #[error(transparent)]
    Locator(#[from] LocatorError),

    /// App bundle skeleton could not be created
    #[error(transparent)]
    AppBundle(#[from] AppBundleError),

    /// Dynamic library relocation failed
    #[error(transparent)]
    Relocation(#[from] RelocationError),

    /// Resource bundle normalisation failed
    #[error(transparent)]
    ResourceBundle(#[from] ResourceBundleError),

    /// Generic errors
    #[error("{0}")]
    GenericError(String),
}

/// Failure running an external tool.
#[derive(Error, Debug)]
pub enum ToolError {
    /// Program could not be found on PATH
    #[error("`{program}` not found in PATH: {source}")]
    NotFound {
        /// Program name
        program: String,
        /// Lookup error
        #[source]
        source: which::Error,
    },

    /// Process could not be spawned or waited on
    #[error("failed to run `{command}`: {source}")]
    SpawnFailed {
        /// Full command line
        command: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Process exited unsuccessfully
    #[error("`{command}` exited with {}: {}", exit_description(.code), .stderr.trim())]
    NonZeroExit {
        /// Full command line
        command: String,
        /// Exit code, `None` when terminated by a signal
        code: Option<i32>,
        /// Captured standard error
        stderr: String,
    },
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

/// Failure resolving the build products directory.
#[derive(Error, Debug)]
pub enum LocatorError {
    /// `swift -print-target-info` could not be run or failed
    #[error("failed to query target info: {0}")]
    TargetInfoQueryFailed(#[source] ToolError),

    /// Target info output was not UTF-8
    #[error("target info output is not valid UTF-8: {0}")]
    NonUtf8Output(#[source] std::string::FromUtf8Error),

    /// Target info output was not a JSON document
    #[error("failed to parse target info: {0}")]
    InvalidTargetInfo(#[source] serde_json::Error),

    /// Target info document lacked the expected key
    #[error("target info is missing `{0}`")]
    MissingTargetInfoField(&'static str),
}

/// Failure creating the `.app` skeleton.
#[derive(Error, Debug)]
pub enum AppBundleError {
    /// Executable product does not exist
    #[error("executable product not found at {}", .0.display())]
    MissingExecutable(PathBuf),

    /// Directory structure could not be created
    #[error("failed to create app bundle structure at {}: {source}", .path.display())]
    StructureCreationFailed {
        /// Directory being created
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Executable could not be copied into the bundle
    #[error("failed to copy executable to {}: {source}", .path.display())]
    ExecutableCopyFailed {
        /// Destination path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// App Info.plist or PkgInfo could not be written
    #[error("failed to create app manifest: {0}")]
    ManifestCreationFailed(#[source] ManifestError),
}

/// Failure relocating dynamic libraries.
#[derive(Error, Debug)]
pub enum RelocationError {
    /// Library search root could not be listed
    #[error("failed to enumerate dynamic libraries in {}: {source}", .directory.display())]
    EnumerationFailed {
        /// Directory being listed
        directory: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Library could not be copied into the output directory
    #[error("failed to copy dynamic library '{library}' to {}: {source}", .destination.display())]
    CopyFailed {
        /// Logical library name
        library: String,
        /// Destination path
        destination: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Base rpath could not be added to the executable
    #[error("failed to add rpath '{rpath}' to {}: {source}", .executable.display())]
    AddRpathFailed {
        /// Rpath token
        rpath: String,
        /// Executable being patched
        executable: PathBuf,
        /// Tool failure
        #[source]
        source: ToolError,
    },

    /// Install name of a library could not be rewritten in the executable
    #[error("failed to update install name of '{library}' in {}: {source}", .executable.display())]
    InstallNameUpdateFailed {
        /// Logical library name
        library: String,
        /// Executable being patched
        executable: PathBuf,
        /// Tool failure
        #[source]
        source: ToolError,
    },

    /// Output directory is not reachable from the executable's directory by a relative path
    #[error(
        "failed to get relative path from {} to output directory {}",
        .from.display(),
        .to.display()
    )]
    OutputPathNotRelative {
        /// Executable directory
        from: PathBuf,
        /// Output directory
        to: PathBuf,
    },

    /// Original library location is not reachable from the search root by a relative path
    #[error(
        "failed to get relative path from {} to original location of '{library}' ({})",
        .search_root.display(),
        .path.display()
    )]
    LibraryPathNotRelative {
        /// Logical library name
        library: String,
        /// Library search root
        search_root: PathBuf,
        /// Original library path
        path: PathBuf,
    },
}

/// Failure normalising resource bundles.
#[derive(Error, Debug)]
pub enum ResourceBundleError {
    /// Source directory could not be listed
    #[error("failed to enumerate resource bundles in {}: {source}", .directory.display())]
    EnumerationFailed {
        /// Directory being listed
        directory: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Bundle could not be copied verbatim
    #[error("failed to copy resource bundle '{bundle}': {source}")]
    BundleCopyFailed {
        /// Bundle file name
        bundle: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Canonical `Contents/Resources` structure could not be created
    #[error("failed to create structure for resource bundle '{bundle}': {source}")]
    BundleStructureCreationFailed {
        /// Bundle file name
        bundle: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Bundle Info.plist could not be created
    #[error("failed to create Info.plist for resource bundle '{bundle}': {source}")]
    ManifestCreationFailed {
        /// Bundle file name
        bundle: String,
        /// Generator failure
        #[source]
        source: ManifestError,
    },

    /// Bundle contents could not be copied into `Contents/Resources`
    #[error("failed to copy resources of bundle '{bundle}': {source}")]
    ResourceCopyFailed {
        /// Bundle file name
        bundle: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Shaders in the bundle could not be compiled
    #[error("failed to compile shaders of resource bundle '{bundle}': {source}")]
    ShaderCompilationFailed {
        /// Bundle file name
        bundle: String,
        /// Compiler failure
        #[source]
        source: ShaderError,
    },
}

/// Failure writing a manifest file.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Property list serialisation or write failed
    #[error("failed to write property list {}: {source}", .path.display())]
    Plist {
        /// Manifest path
        path: PathBuf,
        /// Serialisation error
        #[source]
        source: plist::Error,
    },

    /// Plain file write failed
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },
}

/// Failure compiling Metal shaders.
#[derive(Error, Debug)]
pub enum ShaderError {
    /// Shader sources could not be enumerated
    #[error("failed to enumerate shader sources in {}: {source}", .directory.display())]
    EnumerationFailed {
        /// Directory searched
        directory: PathBuf,
        /// Walk error
        #[source]
        source: walkdir::Error,
    },

    /// Scratch directory for intermediate files could not be created
    #[error("failed to create scratch directory: {0}")]
    ScratchDirectory(#[source] io::Error),

    /// A single shader failed to compile
    #[error("failed to compile {}: {source}", .shader.display())]
    CompilationFailed {
        /// Shader source path
        shader: PathBuf,
        /// Tool failure
        #[source]
        source: ToolError,
    },

    /// Compiled shaders could not be linked into a library
    #[error("failed to create shader library {}: {source}", .library.display())]
    LinkFailed {
        /// Output library path
        library: PathBuf,
        /// Tool failure
        #[source]
        source: ToolError,
    },

    /// A shader source could not be deleted after compilation
    #[error("failed to remove shader source {}: {source}", .shader.display())]
    SourceRemovalFailed {
        /// Shader source path
        shader: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },
}

/// Attaches path context to IO results.
pub trait ErrorExt<T> {
    /// Converts an IO error into [`Error::Fs`] describing the attempted operation.
    fn fs_context(self, context: &str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Fs {
            context: context.to_string(),
            path: path.into(),
            source,
        })
    }
}

/// Converts a missing value into a [`Error::GenericError`].
pub trait Context<T> {
    /// Returns the value or an error carrying `message`.
    fn context(self, message: &str) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context(self, message: &str) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(message.to_string()))
    }
}
