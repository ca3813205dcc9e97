use std::fmt;
use std::path::PathBuf;

/// Failure to produce a usable configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    Read { path: PathBuf, message: String },
    Parse { message: String },
    InvalidCadence { field: &'static str },
    InvalidShotDistance,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => {
                write!(f, "cannot read config {}: {message}", path.display())
            }
            Self::Parse { message } => write!(f, "invalid config: {message}"),
            Self::InvalidCadence { field } => {
                write!(f, "cadence `{field}` must be at least 1")
            }
            Self::InvalidShotDistance => {
                write!(f, "regulator `shot_distance` must be a finite number above 0")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
