use thiserror::Error;

/// Failure taxonomy surfaced by every client operation. Nothing is retried internally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    // 本地校验失败，不会发出请求
    #[error("validation error: {0}")]
    Validation(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Transport(_) => "transport",
            Self::NotFound(_) => "not_found",
            Self::Unauthorized(_) => "unauthorized",
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
