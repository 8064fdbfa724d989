//! Registry of in-flight tool processes, used only for cleanup on termination.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Tracks child processes spawned by [`ProcessRunner`](super::ProcessRunner).
///
/// Cloning shares the underlying registry, so `main` can keep a handle for its
/// signal handler while the pipeline registers children through another.
#[derive(Clone, Debug, Default)]
pub struct ProcessRegistry {
    entries: Arc<Mutex<BTreeMap<u32, String>>>,
}

impl ProcessRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a running process until the returned guard is dropped.
    pub fn register(&self, pid: u32, command: impl Into<String>) -> Registration {
        self.lock().insert(pid, command.into());
        Registration {
            registry: self.clone(),
            pid,
        }
    }

    /// Snapshot of registered processes as `(pid, command)` pairs.
    pub fn active(&self) -> Vec<(u32, String)> {
        self.lock()
            .iter()
            .map(|(pid, command)| (*pid, command.clone()))
            .collect()
    }

    /// Number of registered processes.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no process is registered.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Sends SIGTERM to every registered process.
    ///
    /// Returns the number of processes that were signalled. Entries stay
    /// registered until their owning call observes the exit and drops its guard.
    pub fn terminate_all(&self) -> usize {
        let active = self.active();
        let mut signalled = 0;

        for (pid, command) in active {
            match terminate(pid) {
                Ok(()) => {
                    log::warn!("Terminated `{}` (pid {})", command, pid);
                    signalled += 1;
                }
                Err(e) => {
                    log::debug!("Could not terminate pid {}: {}", pid, e);
                }
            }
        }

        signalled
    }

    fn deregister(&self, pid: u32) {
        self.lock().remove(&pid);
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<u32, String>> {
        // A panic while holding the lock leaves the map itself consistent.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Keeps a process registered while alive.
#[derive(Debug)]
#[must_use = "the process is deregistered as soon as the registration is dropped"]
pub struct Registration {
    registry: ProcessRegistry,
    pid: u32,
}

impl Registration {
    /// Process id of the registered child.
    pub fn pid(&self) -> u32 {
        self.pid
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.registry.deregister(self.pid);
    }
}

#[cfg(unix)]
fn terminate(pid: u32) -> std::io::Result<()> {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    let pid = i32::try_from(pid)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    kill(Pid::from_raw(pid), Signal::SIGTERM).map_err(std::io::Error::from)
}

#[cfg(not(unix))]
fn terminate(_pid: u32) -> std::io::Result<()> {
    // Children are spawned with kill_on_drop, so dropping the pipeline reaps them.
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "signalling processes is only supported on unix",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_is_removed_on_drop() {
        let registry = ProcessRegistry::new();
        let guard = registry.register(4242, "install_name_tool -add_rpath x y");
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.active(),
            vec![(4242, "install_name_tool -add_rpath x y".to_string())]
        );

        drop(guard);
        assert!(registry.is_empty());
    }

    #[test]
    fn clones_share_entries() {
        let registry = ProcessRegistry::new();
        let handle = registry.clone();
        let _guard = registry.register(7, "swift -print-target-info");
        assert_eq!(handle.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn terminate_all_signals_running_child() {
        let mut child = std::process::Command::new("sleep")
            .arg("30")
            .spawn()
            .expect("spawn sleep");
        let registry = ProcessRegistry::new();
        let _guard = registry.register(child.id(), "sleep 30");

        assert_eq!(registry.terminate_all(), 1);
        let status = child.wait().expect("wait for sleep");
        assert!(!status.success());
    }
}
