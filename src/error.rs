use thiserror::Error;

/// Errors raised while loading a tree configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid color '{value}' for {field} (expected #RRGGBB)")]
    InvalidColor { field: String, value: String },
}
