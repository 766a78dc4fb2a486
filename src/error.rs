use thiserror::Error;

/// A drawing call on the canvas failed.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("canvas operation `{op}` failed: {message}")]
pub struct SurfaceError {
    pub op: &'static str,
    pub message: String,
}

impl SurfaceError {
    pub fn new(op: &'static str, message: impl Into<String>) -> Self {
        Self {
            op,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid rain config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("`{field}` must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("trailEpsilon must lie in (0, 1), got {0}")]
    Epsilon(f64),
    #[error("messageIntervalMin ({min}) exceeds messageIntervalMax ({max})")]
    IntervalOrder { min: f64, max: f64 },
    #[error("message list is empty")]
    NoMessages,
    #[error("maxMessages must be at least 1")]
    NoMessageSlots,
}

/// Failure to bring a shared HTML fragment into the page.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    #[error("target element `#{0}` not found")]
    MissingTarget(String),
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("GET {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("injecting `{fragment}` failed: {message}")]
    Inject { fragment: String, message: String },
}

impl LoadError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            LoadError::Transport { .. } => true,
            LoadError::Status { status, .. } => *status >= 500 || *status == 408 || *status == 429,
            LoadError::MissingTarget(_) | LoadError::Inject { .. } => false,
        }
    }
}
