//! Profile script execution.

use crate::error::{Error, Result};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{info, warn};

/// Runs a profile script to apply it to the device.
pub trait ScriptRunner {
    fn run_script(&self, path: &Path) -> Result<()>;
}

impl<T: ScriptRunner + ?Sized> ScriptRunner for &T {
    fn run_script(&self, path: &Path) -> Result<()> {
        (**self).run_script(path)
    }
}

/// Runs profiles as `sh <path>`, blocking until the script exits.
///
/// Script output is discarded. A non-zero exit is logged and otherwise
/// ignored; only failing to start the shell is an error.
#[derive(Debug, Clone)]
pub struct ShellScriptRunner {
    shell: String,
}

impl Default for ShellScriptRunner {
    fn default() -> Self {
        Self::new("sh")
    }
}

impl ShellScriptRunner {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl ScriptRunner for ShellScriptRunner {
    fn run_script(&self, path: &Path) -> Result<()> {
        info!(script = %path.display(), "Applying profile");
        let status = Command::new(&self.shell)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| Error::Script {
                path: path.to_path_buf(),
                reason: format!("{}: {e}", self.shell),
            })?;
        if !status.success() {
            warn!(script = %path.display(), %status, "profile script exited non-zero");
        }
        Ok(())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Records the scripts it was asked to run.
    pub struct RecordingRunner {
        ran: Mutex<Vec<PathBuf>>,
    }

    impl RecordingRunner {
        pub fn new() -> Self {
            Self {
                ran: Mutex::new(Vec::new()),
            }
        }

        pub fn ran(&self) -> Vec<PathBuf> {
            self.ran.lock().unwrap().clone()
        }
    }

    impl ScriptRunner for RecordingRunner {
        fn run_script(&self, path: &Path) -> Result<()> {
            self.ran.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }
    }
}
