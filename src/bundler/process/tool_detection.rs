//! External tool lookup.
//!
//! Resolves tool names against `PATH` once per process so a missing
//! `install_name_tool` or `xcrun` is reported by name instead of as a bare
//! spawn error.

use crate::bundler::error::ToolError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex};

/// Cached tool locations, keyed by program name.
static RESOLVED_TOOLS: LazyLock<Mutex<HashMap<String, PathBuf>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Resolves `program` to an executable path.
///
/// Programs given as a path (containing a separator) are used as-is.
pub fn resolve_tool(program: &str) -> Result<PathBuf, ToolError> {
    if Path::new(program).components().count() > 1 {
        return Ok(PathBuf::from(program));
    }

    if let Some(path) = RESOLVED_TOOLS
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .get(program)
    {
        return Ok(path.clone());
    }

    match which::which(program) {
        Ok(path) => {
            log::debug!("Found {} at: {}", program, path.display());
            RESOLVED_TOOLS
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .insert(program.to_string(), path.clone());
            Ok(path)
        }
        Err(source) => {
            log::debug!("{} not found in PATH: {}", program, source);
            Err(ToolError::NotFound {
                program: program.to_string(),
                source,
            })
        }
    }
}
