//! Error types for ratcycle-core.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Core library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// No line of the device listing named a supported mouse.
    #[error("no supported mouse found in device listing")]
    DeviceNotFound,

    /// An expected numeric or text pattern was absent from tool output.
    #[error("could not parse {field} from tool output {output:?}")]
    Parse { field: String, output: String },

    /// The external program could not be started.
    #[error("{program} is unavailable: {reason}")]
    ToolUnavailable { program: String, reason: String },

    /// The external program ran but exited non-zero.
    #[error("`{command}` failed with {status}")]
    ToolFailed { command: String, status: String },

    /// The external program did not finish in time and was killed.
    #[error("`{command}` timed out after {after:?}")]
    Timeout { command: String, after: Duration },

    /// The persisted active profile is not in the discovered profile list.
    #[error("active profile {} is not among the discovered profiles", path.display())]
    ProfileNotFound { path: PathBuf },

    /// Cycling was requested but the model directory holds no profiles.
    #[error("no profile scripts found in {}", dir.display())]
    NoProfiles { dir: PathBuf },

    /// Reading or writing persisted state failed for a reason other than absence.
    #[error("storage error at {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The shell could not be launched for a profile script.
    #[error("could not run profile script {}: {reason}", path.display())]
    Script { path: PathBuf, reason: String },
}

impl Error {
    pub(crate) fn parse(field: impl Into<String>, output: &str) -> Self {
        Self::Parse {
            field: field.into(),
            output: output.to_string(),
        }
    }

    pub(crate) fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }
}

/// Coarse classification of errors, used to pick a process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// No device to operate on.
    NoDevice,
    /// Tool output did not have the expected shape.
    Parse,
    /// The external tool is missing, failed, or hung.
    Tool,
    /// The profile list or active pointer is unusable.
    Profile,
    /// Persisted state or profile files could not be accessed.
    Storage,
}

impl ErrorClass {
    /// Classify an error.
    pub fn classify(err: &Error) -> Self {
        match err {
            Error::DeviceNotFound => Self::NoDevice,
            Error::Parse { .. } => Self::Parse,
            Error::ToolUnavailable { .. } | Error::ToolFailed { .. } | Error::Timeout { .. } => {
                Self::Tool
            }
            Error::ProfileNotFound { .. } | Error::NoProfiles { .. } | Error::Script { .. } => {
                Self::Profile
            }
            Error::Storage { .. } => Self::Storage,
        }
    }

    /// Process exit code for this class. Zero and one are left to success
    /// and generic failures.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::NoDevice => 2,
            Self::Parse => 3,
            Self::Tool => 4,
            Self::Profile => 5,
            Self::Storage => 6,
        }
    }
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_device_not_found() {
        assert_eq!(
            ErrorClass::classify(&Error::DeviceNotFound),
            ErrorClass::NoDevice
        );
    }

    #[test]
    fn classify_tool_errors_together() {
        let missing = Error::ToolUnavailable {
            program: "ratbagctl".into(),
            reason: "not found".into(),
        };
        let failed = Error::ToolFailed {
            command: "ratbagctl list".into(),
            status: "exit status: 1".into(),
        };
        let hung = Error::Timeout {
            command: "ratbagctl list".into(),
            after: Duration::from_secs(10),
        };
        for err in [missing, failed, hung] {
            assert_eq!(ErrorClass::classify(&err), ErrorClass::Tool);
        }
    }

    #[test]
    fn classify_profile_not_found() {
        let err = Error::ProfileNotFound {
            path: PathBuf::from("models/g403/gone.sh"),
        };
        assert_eq!(ErrorClass::classify(&err), ErrorClass::Profile);
    }

    #[test]
    fn storage_is_distinct_from_profile() {
        let err = Error::storage(
            "models/g403/g403.state",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(ErrorClass::classify(&err), ErrorClass::Storage);
        assert!(err.to_string().contains("g403.state"));
    }

    #[test]
    fn exit_codes_are_distinct_and_nonzero() {
        let classes = [
            ErrorClass::NoDevice,
            ErrorClass::Parse,
            ErrorClass::Tool,
            ErrorClass::Profile,
            ErrorClass::Storage,
        ];
        let mut codes: Vec<u8> = classes.iter().map(ErrorClass::exit_code).collect();
        assert!(codes.iter().all(|&c| c > 1));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), classes.len());
    }

    #[test]
    fn parse_error_names_field() {
        let err = Error::parse("button count", "garbage");
        assert_eq!(
            err.to_string(),
            "could not parse button count from tool output \"garbage\""
        );
    }
}
