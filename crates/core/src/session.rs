//! A mouse session: one identified device plus its profile directory.

use crate::buttons;
use crate::device::{self, DeviceIdentity};
use crate::dpi;
use crate::error::{Error, Result};
use crate::led::{self, Led};
use crate::profile::{ProfileStore, PROFILE_EXTENSION};
use crate::report_rate;
use crate::script::{ScriptRunner, ShellScriptRunner};
use crate::transport::{RatbagTool, Ratbagctl, DEFAULT_PROGRAM, DEFAULT_TIMEOUT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Where profiles live and how to reach the tool.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Parent of the per-model profile directories.
    pub models_dir: PathBuf,
    /// Program name or path of the configuration client.
    pub program: String,
    /// Upper bound on each tool invocation.
    pub timeout: Duration,
}

impl SessionConfig {
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
            program: DEFAULT_PROGRAM.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Point-in-time capture of the device's current settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Report rate in Hz.
    pub report_rate: u32,
    /// DPI per resolution slot.
    pub resolutions: Vec<u32>,
    /// Normalized binding per button slot.
    pub buttons: Vec<String>,
    pub leds: Vec<Led>,
}

/// The connected mouse and its profiles.
///
/// Identity and the profile list are resolved once at construction. Scripts
/// added or removed afterwards are not seen by this session.
pub struct MouseSession<T, S> {
    tool: T,
    runner: S,
    identity: DeviceIdentity,
    store: ProfileStore,
    profiles: Vec<PathBuf>,
}

impl MouseSession<Ratbagctl, ShellScriptRunner> {
    /// Connect using the real tool and `sh`.
    pub fn connect(config: &SessionConfig) -> Result<Self> {
        let tool = Ratbagctl::new(config.program.clone(), config.timeout);
        Self::with_parts(tool, ShellScriptRunner::default(), &config.models_dir)
    }
}

impl<T: RatbagTool, S: ScriptRunner> MouseSession<T, S> {
    /// Identify the device, ensure its model directory exists, and discover
    /// its profiles.
    pub fn with_parts(tool: T, runner: S, models_dir: &Path) -> Result<Self> {
        let identity = device::identify(&tool)?;
        let store = ProfileStore::open(models_dir, &identity.model)?;
        let profiles = store.discover()?;
        debug!(
            dir = %store.dir().display(),
            profiles = profiles.len(),
            "Session ready"
        );
        Ok(Self {
            tool,
            runner,
            identity,
            store,
            profiles,
        })
    }

    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    /// Profiles discovered at construction, in cycling order.
    pub fn profiles(&self) -> &[PathBuf] {
        &self.profiles
    }

    /// The persisted active profile.
    pub fn active_profile(&self) -> Result<PathBuf> {
        self.store.load_active()
    }

    /// Read the device's current settings. Touches no persisted state.
    pub fn snapshot(&self) -> Result<Settings> {
        let alias = self.identity.alias.as_str();
        let report_rate = report_rate::read_report_rate(&self.tool, alias)?;
        let resolutions = dpi::read_resolutions(&self.tool, alias)?;
        let buttons = buttons::read_buttons(&self.tool, alias, self.identity.button_count)?;
        let leds = led::read_leds(&self.tool, alias)?;
        Ok(Settings {
            report_rate,
            resolutions,
            buttons,
            leds,
        })
    }

    /// Apply the profile after the active one, wrapping past the end, and
    /// persist it. Returns the newly applied profile.
    ///
    /// Fails with `ProfileNotFound` if the persisted profile is not in the
    /// discovered list; the pointer is left untouched in that case.
    pub fn cycle_profile(&self) -> Result<PathBuf> {
        let current = self.store.load_active()?;
        if self.profiles.is_empty() {
            return Err(Error::NoProfiles {
                dir: self.store.dir().to_path_buf(),
            });
        }
        let index = self
            .profiles
            .iter()
            .position(|p| *p == current)
            .ok_or(Error::ProfileNotFound { path: current })?;
        let next = &self.profiles[(index + 1) % self.profiles.len()];
        self.apply(next)?;
        Ok(next.clone())
    }

    /// Apply the profile whose file name is `name` (with or without the
    /// `.sh` extension) and persist it.
    pub fn activate(&self, name: &str) -> Result<PathBuf> {
        let with_ext = format!("{name}.{PROFILE_EXTENSION}");
        let profile = self
            .profiles
            .iter()
            .find(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n == name || n == with_ext)
            })
            .ok_or_else(|| Error::ProfileNotFound {
                path: self.store.dir().join(name),
            })?;
        self.apply(profile)?;
        Ok(profile.clone())
    }

    fn apply(&self, profile: &Path) -> Result<()> {
        self.runner.run_script(profile)?;
        self.store.save_active(profile)?;
        info!(
            model = %self.identity.model,
            profile = %profile.display(),
            "Profile active"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::mock::RecordingRunner;
    use crate::transport::mock::MockTool;
    use std::fs;
    use tempfile::TempDir;

    fn g403_tool() -> MockTool {
        let mock = MockTool::new();
        mock.on("list", "sleeping-puppy: Wireless Gaming Mouse G403\n");
        mock.on("sleeping-puppy button count", "2\n");
        mock
    }

    #[test]
    fn construction_creates_model_dir() {
        let root = TempDir::new().unwrap();
        let session =
            MouseSession::with_parts(g403_tool(), RecordingRunner::new(), root.path()).unwrap();
        assert!(root.path().join("g403").is_dir());
        assert_eq!(session.identity().alias, "sleeping-puppy");
        assert!(session.profiles().is_empty());
    }

    #[test]
    fn construction_fails_without_device() {
        let root = TempDir::new().unwrap();
        let mock = MockTool::new();
        mock.on("list", "");
        let err = MouseSession::with_parts(mock, RecordingRunner::new(), root.path())
            .err()
            .unwrap();
        assert!(matches!(err, Error::DeviceNotFound));
        assert!(!root.path().join("g403").exists());
    }

    #[test]
    fn cycle_with_no_profiles() {
        let root = TempDir::new().unwrap();
        let session =
            MouseSession::with_parts(g403_tool(), RecordingRunner::new(), root.path()).unwrap();
        assert!(matches!(
            session.cycle_profile(),
            Err(Error::NoProfiles { .. })
        ));
    }

    #[test]
    fn cycle_stale_pointer_is_profile_not_found() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("g403");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("a.sh"), "").unwrap();
        fs::write(dir.join("g403.state"), "deleted.sh\n").unwrap();

        let runner = RecordingRunner::new();
        let session = MouseSession::with_parts(g403_tool(), &runner, root.path()).unwrap();
        let err = session.cycle_profile().unwrap_err();
        assert!(matches!(err, Error::ProfileNotFound { ref path } if path.ends_with("deleted.sh")));
        assert!(runner.ran().is_empty());
        assert_eq!(
            fs::read_to_string(dir.join("g403.state")).unwrap(),
            "deleted.sh\n"
        );
    }

    #[test]
    fn activate_by_stem_or_file_name() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("g403");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("fps.sh"), "").unwrap();
        fs::write(dir.join("work.sh"), "").unwrap();

        let runner = RecordingRunner::new();
        let session = MouseSession::with_parts(g403_tool(), &runner, root.path()).unwrap();
        assert_eq!(session.activate("work").unwrap(), dir.join("work.sh"));
        assert_eq!(session.activate("fps.sh").unwrap(), dir.join("fps.sh"));
        assert_eq!(runner.ran(), vec![dir.join("work.sh"), dir.join("fps.sh")]);
        assert_eq!(session.active_profile().unwrap(), dir.join("fps.sh"));
    }

    #[test]
    fn activate_unknown_profile() {
        let root = TempDir::new().unwrap();
        let session =
            MouseSession::with_parts(g403_tool(), RecordingRunner::new(), root.path()).unwrap();
        assert!(matches!(
            session.activate("nope"),
            Err(Error::ProfileNotFound { .. })
        ));
    }
}
