use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelManagerError {
    #[error("File not found: {path}")]
    ModelNotFound { path: PathBuf },

    #[error("No models selected")]
    NothingSelected,

    #[error("Failed to open folder {path}: {message}")]
    OpenFolder { path: PathBuf, message: String },

    #[error("Failed to parse config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Unknown config key: {key}")]
    ConfigKeyNotFound { key: String },

    #[error("Invalid value for {key}: {message}")]
    InvalidConfigValue { key: String, message: String },

    #[error("Invalid classification pattern: {0}")]
    InvalidPattern(#[from] glob::PatternError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("GUI error: {0}")]
    Gui(String),
}

pub type Result<T> = std::result::Result<T, ModelManagerError>;

impl ModelManagerError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ModelNotFound { .. } => 2,
            Self::NothingSelected => 3,
            Self::OpenFolder { .. } => 4,
            Self::ConfigParse { .. }
            | Self::ConfigKeyNotFound { .. }
            | Self::InvalidConfigValue { .. } => 5,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct_for_user_facing_errors() {
        let not_found = ModelManagerError::ModelNotFound {
            path: PathBuf::from("/gone.safetensors"),
        };
        assert_eq!(not_found.exit_code(), 2);
        assert_eq!(ModelManagerError::NothingSelected.exit_code(), 3);
        assert_eq!(
            ModelManagerError::ConfigKeyNotFound {
                key: "nope".to_string()
            }
            .exit_code(),
            5
        );
        assert_eq!(ModelManagerError::Gui("boom".to_string()).exit_code(), 1);
    }

    #[test]
    fn not_found_message_names_the_path() {
        let err = ModelManagerError::ModelNotFound {
            path: PathBuf::from("/models/x.pt"),
        };
        assert_eq!(err.to_string(), "File not found: /models/x.pt");
    }
}
