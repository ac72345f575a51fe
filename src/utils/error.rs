use thiserror::Error;

/// Main error type for setup failures in the probe
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unexpected HTTP status {0}")]
    UnexpectedStatus(u16),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration file: {0}")]
    ConfigFormat(#[from] serde_json::Error),
}

/// Failures while talking to a remote service.
///
/// The display text is the raw cause and is what ends up on the detail line
/// of a report.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("{0}")]
    Timeout(String),

    #[error("{0}")]
    Connect(String),

    #[error("{0}")]
    Request(String),

    #[error("{0}")]
    Read(String),
}

impl FetchError {
    /// Connection-level failures: anything that happened before a response arrived
    pub fn is_connection_failure(&self) -> bool {
        !matches!(self, FetchError::Read(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout(_))
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchError::Timeout(error.to_string())
        } else if error.is_connect() {
            FetchError::Connect(error.to_string())
        } else {
            FetchError::Request(error.to_string())
        }
    }
}

impl From<std::io::Error> for FetchError {
    fn from(error: std::io::Error) -> Self {
        FetchError::Read(error.to_string())
    }
}

/// Result type alias for probe operations
pub type ProbeResult<T> = Result<T, ProbeError>;
