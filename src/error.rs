use thiserror::Error;

pub type BpResult<T> = Result<T, BpError>;

#[derive(Debug, Error)]
pub enum BpError {
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("json failure: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

impl BpError {
    /// Stable, unique, machine-readable error code for every variant.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Io(_) => "BP-IO",
            Self::Json(_) => "BP-JSON",
            Self::InvalidConfig(_) => "BP-CONFIG",
            Self::InvalidPayload(_) => "BP-PAYLOAD",
        }
    }
}
