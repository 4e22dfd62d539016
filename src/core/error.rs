use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Unknown action token: {0}")]
    UnknownAction(String),

    #[error("Advisory sequence rejected: {recognized} recognized action(s), {attacks} attack(s)")]
    InvalidSequence { recognized: usize, attacks: usize },

    #[error("Advisory request timed out after {0} ms")]
    AdvisoryTimeout(u64),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
