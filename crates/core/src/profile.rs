//! Per-model profile scripts and the persisted active-profile pointer.
//!
//! Layout under the models directory:
//!
//! ```text
//! models/
//!   g403/
//!     default.sh
//!     fps.sh
//!     work.sh
//!     g403.state      <- one line: file name of the last applied profile
//! ```
//!
//! The state file is plain text so it can be inspected or edited by hand.
//! There is no locking: two processes cycling the same model race, and the
//! last save wins.

use crate::error::{Error, Result};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Extension of profile scripts.
pub const PROFILE_EXTENSION: &str = "sh";

/// Extension of the active-profile state file.
pub const STATE_EXTENSION: &str = "state";

/// Profile returned when no pointer has been saved yet.
pub const DEFAULT_PROFILE: &str = "default.sh";

/// Profile scripts and active pointer for one mouse model.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
    model: String,
}

impl ProfileStore {
    /// Store rooted at `<models_dir>/<model>`. Touches nothing on disk.
    pub fn new(models_dir: &Path, model: &str) -> Self {
        Self {
            dir: models_dir.join(model),
            model: model.to_string(),
        }
    }

    /// Like [`ProfileStore::new`], creating the model directory if absent.
    pub fn open(models_dir: &Path, model: &str) -> Result<Self> {
        let store = Self::new(models_dir, model);
        fs::create_dir_all(&store.dir).map_err(|e| Error::storage(&store.dir, e))?;
        Ok(store)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<dir>/<model>.state`
    pub fn state_path(&self) -> PathBuf {
        self.dir.join(format!("{}.{STATE_EXTENSION}", self.model))
    }

    pub fn default_profile(&self) -> PathBuf {
        self.dir.join(DEFAULT_PROFILE)
    }

    /// Profile scripts in the model directory, sorted by file name.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        discover_profiles(&self.dir)
    }

    /// Read the active profile.
    ///
    /// On first run (no state file) this leaves an empty state placeholder and
    /// an empty `default.sh` behind and returns the default profile. An empty
    /// or corrupt state file also yields the default profile; corrupt content is
    /// truncated to an empty placeholder. Any other read failure is a `Storage`
    /// error.
    pub fn load_active(&self) -> Result<PathBuf> {
        let state = self.state_path();
        match fs::read_to_string(&state) {
            Ok(text) => {
                let name = text.trim();
                if name.is_empty() {
                    debug!(state = %state.display(), "state file empty, using default profile");
                    return self.fall_back_to_default();
                }
                if !is_plain_file_name(name) {
                    warn!(state = %state.display(), content = %name, "resetting corrupt state file");
                    clear(&state)?;
                    return self.fall_back_to_default();
                }
                Ok(self.dir.join(name))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(state = %state.display(), "no state file, creating placeholder");
                touch(&state)?;
                self.fall_back_to_default()
            }
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                warn!(state = %state.display(), "resetting state file that is not UTF-8");
                clear(&state)?;
                self.fall_back_to_default()
            }
            Err(e) => Err(Error::storage(state, e)),
        }
    }

    /// Persist `profile` as the active profile.
    ///
    /// Written to a sibling temp file and renamed into place, so readers see
    /// either the old pointer or the new one.
    pub fn save_active(&self, profile: &Path) -> Result<()> {
        let state = self.state_path();
        let name = profile
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| is_plain_file_name(n))
            .ok_or_else(|| {
                Error::storage(
                    &state,
                    io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("not a profile file name: {}", profile.display()),
                    ),
                )
            })?;

        let tmp = state.with_extension(format!("{STATE_EXTENSION}.tmp"));
        let write = || -> io::Result<()> {
            let mut file = fs::File::create(&tmp)?;
            writeln!(file, "{name}")?;
            file.sync_all()?;
            fs::rename(&tmp, &state)
        };
        write().map_err(|e| {
            let _ = fs::remove_file(&tmp);
            Error::storage(&state, e)
        })?;
        debug!(state = %state.display(), profile = %name, "saved active profile");
        Ok(())
    }

    fn fall_back_to_default(&self) -> Result<PathBuf> {
        let default = self.default_profile();
        // Content for a generated default profile is undecided; an empty
        // script is a no-op under `sh`.
        touch(&default)?;
        Ok(default)
    }
}

/// Sorted list of `*.sh` regular files directly inside `dir`.
pub fn discover_profiles(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| Error::storage(dir, e))?;
    let mut profiles = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::storage(dir, e))?.path();
        let is_script = path.extension().and_then(|e| e.to_str()) == Some(PROFILE_EXTENSION);
        if is_script && path.is_file() {
            profiles.push(path);
        }
    }
    profiles.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!(dir = %dir.display(), count = profiles.len(), "Discovered profiles");
    Ok(profiles)
}

/// Create `path` if missing without truncating existing content.
fn touch(path: &Path) -> Result<()> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(drop)
        .map_err(|e| Error::storage(path, e))
}

fn clear(path: &Path) -> Result<()> {
    fs::write(path, b"").map_err(|e| Error::storage(path, e))
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\n', '\0'])
}
