//! [`ToolInvoker`] backed by real child processes.

use super::{ProcessRegistry, ToolInvocation, ToolInvoker, ToolOutput, resolve_tool};
use crate::bundler::error::ToolError;
use std::process::Stdio;
use tokio::process::Command;

/// Runs tools as child processes, registering each one while it runs.
#[derive(Clone, Debug, Default)]
pub struct ProcessRunner {
    registry: ProcessRegistry,
}

impl ProcessRunner {
    /// Creates a runner that registers children in `registry`.
    pub fn new(registry: ProcessRegistry) -> Self {
        Self { registry }
    }

    /// Registry holding this runner's in-flight children.
    pub fn registry(&self) -> &ProcessRegistry {
        &self.registry
    }
}

impl ToolInvoker for ProcessRunner {
    async fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, ToolError> {
        let program = resolve_tool(invocation.program())?;
        let command_line = invocation.to_string();
        log::debug!("Running: {}", command_line);

        let child = Command::new(&program)
            .args(invocation.arguments())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ToolError::SpawnFailed {
                command: command_line.clone(),
                source,
            })?;

        let _registration = child
            .id()
            .map(|pid| self.registry.register(pid, command_line.clone()));

        let output = child
            .wait_with_output()
            .await
            .map_err(|source| ToolError::SpawnFailed {
                command: command_line.clone(),
                source,
            })?;

        if !output.status.success() {
            log::debug!(
                "`{}` exited with {:?}: {}",
                command_line,
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(ToolOutput {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
