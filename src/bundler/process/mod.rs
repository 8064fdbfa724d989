//! External tool execution.
//!
//! All metadata patching, target-info queries and shader compilation shell
//! out through a [`ToolInvoker`]. [`ProcessRunner`] is the real implementation;
//! it registers every child in a [`ProcessRegistry`] so a termination signal
//! can take down in-flight tools.

mod registry;
mod runner;
mod tool_detection;

pub use registry::{ProcessRegistry, Registration};
pub use runner::ProcessRunner;
pub use tool_detection::resolve_tool;

use crate::bundler::error::ToolError;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::future::Future;

/// A single external command: program name plus arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolInvocation {
    program: String,
    args: Vec<OsString>,
}

impl ToolInvocation {
    /// Creates an invocation of `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Appends several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Program name as given (resolved against `PATH` at run time).
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments in order.
    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }

    /// Program followed by arguments, lossily converted for inspection.
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().map(|a| a.to_string_lossy().into_owned()))
            .collect()
    }
}

impl fmt::Display for ToolInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv().join(" "))
    }
}

/// Captured result of a completed process.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, `None` when the process was terminated by a signal
    pub code: Option<i32>,
    /// Captured standard output
    pub stdout: Vec<u8>,
    /// Captured standard error
    pub stderr: Vec<u8>,
}

impl ToolOutput {
    /// Whether the process exited with status 0.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Converts an unsuccessful exit into [`ToolError::NonZeroExit`].
    pub fn check(self, invocation: &ToolInvocation) -> Result<Self, ToolError> {
        if self.success() {
            Ok(self)
        } else {
            Err(ToolError::NonZeroExit {
                command: invocation.to_string(),
                code: self.code,
                stderr: String::from_utf8_lossy(&self.stderr).into_owned(),
            })
        }
    }
}

/// Runs external tools synchronously from the caller's point of view.
///
/// Implementations must not return before the process has exited.
pub trait ToolInvoker: Send + Sync {
    /// Runs the invocation to completion and captures its output.
    ///
    /// A non-zero exit is *not* an error here; see [`ToolInvoker::run_checked`].
    fn run(
        &self,
        invocation: &ToolInvocation,
    ) -> impl Future<Output = Result<ToolOutput, ToolError>> + Send;

    /// Runs the invocation and fails unless it exits with status 0.
    fn run_checked(
        &self,
        invocation: &ToolInvocation,
    ) -> impl Future<Output = Result<ToolOutput, ToolError>> + Send {
        async move { self.run(invocation).await?.check(invocation) }
    }
}
