/// Error types for the parts of the game that touch the outside world.
///
/// Gameplay never fails: a destroyed player or an out-of-range level index is
/// a state transition or a no-op, not an error.  What *can* fail is reading
/// configuration and sprite overrides from disk, and those paths report
/// through [`GameError`].

use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum GameError {
    /// The configuration file exists but could not be read.
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`crate::config::GameConfig`].
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A configuration value is outside its usable range.
    InvalidConfig {
        /// Name of the offending field.
        field: &'static str,
        /// Human-readable description of the constraint.
        reason: String,
    },

    /// A sprite could not be loaded; callers substitute a placeholder.
    AssetLoad {
        /// Sprite key or file the failure refers to.
        key: String,
        reason: String,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::ConfigRead { path, source } => {
                write!(f, "failed to read config {}: {}", path.display(), source)
            }
            GameError::ConfigParse { path, source } => {
                write!(f, "failed to parse config {}: {}", path.display(), source)
            }
            GameError::InvalidConfig { field, reason } => {
                write!(f, "invalid config value `{}`: {}", field, reason)
            }
            GameError::AssetLoad { key, reason } => {
                write!(f, "failed to load asset `{}`: {}", key, reason)
            }
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::ConfigRead { source, .. } => Some(source),
            GameError::ConfigParse { source, .. } => Some(source),
            _ => None,
        }
    }
}
