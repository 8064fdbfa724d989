//! Metal shader compilation.

use crate::bundler::{
    error::ShaderError,
    process::{ToolInvocation, ToolInvoker},
};
use std::future::Future;
use std::path::{Path, PathBuf};

/// Extension of Metal shader sources.
pub const SHADER_SOURCE_EXTENSION: &str = "metal";

/// File name of the compiled shader library.
pub const SHADER_LIBRARY_FILE_NAME: &str = "default.metallib";

/// Compiles the shader sources found in a directory.
pub trait ShaderCompiler: Send + Sync {
    /// Compiles every shader source under `directory` into a single library
    /// placed in `directory`, deleting the sources unless `keep_sources`.
    fn compile_shaders(
        &self,
        directory: &Path,
        keep_sources: bool,
    ) -> impl Future<Output = Result<(), ShaderError>> + Send;
}

/// [`ShaderCompiler`] using `xcrun metal` and `xcrun metallib`.
pub struct MetalCompiler<'a, T: ToolInvoker> {
    tools: &'a T,
}

impl<'a, T: ToolInvoker> MetalCompiler<'a, T> {
    /// Creates a compiler that runs the Metal toolchain through `tools`.
    pub fn new(tools: &'a T) -> Self {
        Self { tools }
    }
}

/// Finds shader sources below `directory`, sorted by path.
pub fn find_shader_sources(directory: &Path) -> Result<Vec<PathBuf>, ShaderError> {
    let mut sources = Vec::new();
    for entry in walkdir::WalkDir::new(directory).sort_by_file_name() {
        let entry = entry.map_err(|source| ShaderError::EnumerationFailed {
            directory: directory.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|e| e.to_str()) == Some(SHADER_SOURCE_EXTENSION)
        {
            sources.push(entry.into_path());
        }
    }
    Ok(sources)
}

impl<T: ToolInvoker> ShaderCompiler for MetalCompiler<'_, T> {
    async fn compile_shaders(&self, directory: &Path, keep_sources: bool) -> Result<(), ShaderError> {
        let sources = find_shader_sources(directory)?;
        if sources.is_empty() {
            log::debug!("No Metal shaders in {}", directory.display());
            return Ok(());
        }

        log::info!(
            "Compiling {} Metal shaders in {}",
            sources.len(),
            directory.display()
        );

        let scratch = tempfile::tempdir().map_err(ShaderError::ScratchDirectory)?;

        let mut air_files = Vec::with_capacity(sources.len());
        for (index, source) in sources.iter().enumerate() {
            let stem = source
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            // Sources in different subdirectories may share a stem.
            let air_file = scratch.path().join(format!("{index}-{stem}.air"));

            let invocation = ToolInvocation::new("xcrun")
                .args(["-sdk", "macosx", "metal", "-c"])
                .arg(source)
                .arg("-o")
                .arg(&air_file);

            self.tools
                .run_checked(&invocation)
                .await
                .map_err(|e| ShaderError::CompilationFailed {
                    shader: source.clone(),
                    source: e,
                })?;

            air_files.push(air_file);
        }

        let library = directory.join(SHADER_LIBRARY_FILE_NAME);
        let invocation = ToolInvocation::new("xcrun")
            .args(["-sdk", "macosx", "metallib"])
            .args(&air_files)
            .arg("-o")
            .arg(&library);

        self.tools
            .run_checked(&invocation)
            .await
            .map_err(|source| ShaderError::LinkFailed {
                library: library.clone(),
                source,
            })?;

        if !keep_sources {
            for source in &sources {
                tokio::fs::remove_file(source)
                    .await
                    .map_err(|e| ShaderError::SourceRemovalFailed {
                        shader: source.clone(),
                        source: e,
                    })?;
            }
        }

        log::info!("✓ Created {}", library.display());
        Ok(())
    }
}
