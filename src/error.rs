use thiserror::Error;

#[derive(Error, Debug)]
pub enum RekrutError {
    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("unsupported document format: {0} (expected .toml or .json)")]
    UnsupportedFormat(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("invalid formula: {0}")]
    InvalidFormula(String),

    #[error("invalid candidate scores: {0}")]
    InvalidScores(String),

    #[error("expression parse error at position {position}: {message}")]
    Expression { position: usize, message: String },

    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RekrutError>;
