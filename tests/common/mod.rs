//! Shared helpers for integration tests.

#![allow(dead_code)]

use bundle_relocator::bundler::{ToolError, ToolInvocation, ToolInvoker, ToolOutput};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Triple reported by the fake `swift -print-target-info`.
pub const HOST_TRIPLE: &str = "arm64-apple-macosx";

/// Fake [`ToolInvoker`] that records every command instead of running it.
///
/// - `swift` prints a target-info document naming [`HOST_TRIPLE`]
/// - `xcrun` writes a placeholder file at its `-o` argument
/// - any command whose command line contains a registered failure pattern
///   exits with status 1
///
/// Clones share the recorded calls.
#[derive(Clone, Debug, Default)]
pub struct RecordingInvoker {
    calls: Arc<Mutex<Vec<Vec<String>>>>,
    failures: Arc<Mutex<Vec<String>>>,
    target_info: Arc<Mutex<Option<Vec<u8>>>>,
}

impl RecordingInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes commands containing `pattern` exit unsuccessfully.
    pub fn fail_on(self, pattern: impl Into<String>) -> Self {
        self.failures.lock().unwrap().push(pattern.into());
        self
    }

    /// Replaces the target-info document printed by `swift`.
    pub fn with_target_info(self, stdout: impl Into<Vec<u8>>) -> Self {
        *self.target_info.lock().unwrap() = Some(stdout.into());
        self
    }

    /// Every recorded command as program followed by arguments.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded commands of one program.
    pub fn calls_to(&self, program: &str) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter(|argv| argv[0] == program)
            .collect()
    }

    fn should_fail(&self, command_line: &str) -> bool {
        self.failures
            .lock()
            .unwrap()
            .iter()
            .any(|pattern| command_line.contains(pattern.as_str()))
    }

    fn target_info(&self) -> Vec<u8> {
        self.target_info.lock().unwrap().clone().unwrap_or_else(|| {
            format!(
                r#"{{"compilerVersion":"Swift 6.0","target":{{"triple":"{HOST_TRIPLE}14.0","unversionedTriple":"{HOST_TRIPLE}","moduleTriple":"{HOST_TRIPLE}"}}}}"#
            )
            .into_bytes()
        })
    }
}

impl ToolInvoker for RecordingInvoker {
    async fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, ToolError> {
        let argv = invocation.argv();
        self.calls.lock().unwrap().push(argv.clone());

        if self.should_fail(&invocation.to_string()) {
            return Ok(ToolOutput {
                code: Some(1),
                stdout: Vec::new(),
                stderr: b"simulated failure".to_vec(),
            });
        }

        let stdout = match invocation.program() {
            "swift" => self.target_info(),
            "xcrun" => {
                if let Some(index) = argv.iter().position(|a| a == "-o") {
                    std::fs::write(&argv[index + 1], b"compiled").unwrap();
                }
                Vec::new()
            }
            _ => Vec::new(),
        };

        Ok(ToolOutput {
            code: Some(0),
            stdout,
            stderr: Vec::new(),
        })
    }
}

/// Writes `contents` to `path`, creating parent directories.
pub fn write_file(path: &Path, contents: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

/// All files below `root`, relative to it, with forward slashes, sorted.
pub fn list_files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .collect();
    files.sort();
    files
}

/// `<root>/App.app/Contents/MacOS/App`, created as a small file.
pub fn fake_executable(root: &Path) -> PathBuf {
    let executable = root.join("App.app/Contents/MacOS/App");
    write_file(&executable, "#!/bin/sh\n");
    executable
}

/// Shorthand for building an expected argv.
pub fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}

/// Lossy string form of a path, as it appears in recorded argv.
pub fn display(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
