use thiserror::Error;

/// Main error type for the transaction watcher
#[derive(Error, Debug)]
pub enum ParserError {
    #[error("Request encoding failed: {0}")]
    Encoding(#[source] serde_json::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP request failed with status code {status}")]
    Remote { status: u16 },

    #[error("Decoding error: {0}")]
    Decoding(#[from] DecodingError),

    #[error("Node returned error: code={code}, message={message}")]
    Node { code: i64, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Failures interpreting a response body
#[derive(Error, Debug)]
pub enum DecodingError {
    #[error("Malformed response envelope: {0}")]
    Envelope(#[source] serde_json::Error),

    #[error("Unsupported JSON-RPC version: {0}")]
    ProtocolVersion(String),

    #[error("Response carries neither result nor error")]
    MissingResult,

    #[error("Result is not a transaction list: {0}")]
    TransactionList(#[source] serde_json::Error),

    #[error("Result is not a block number: {0}")]
    BlockNumber(String),

    #[error("Unrecognized result payload: {0}")]
    UnrecognizedResult(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Configuration parsing failed: {0}")]
    Parsing(String),

    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ParserError>;

/// Error severity levels for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Errors that make the watcher unusable until fixed
    Critical,
    /// The remote node could not be reached or refused the request
    High,
    /// The node answered with something we could not interpret
    Medium,
    Low,
}

impl ParserError {
    /// Get the severity level of an error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ParserError::Config(_) => ErrorSeverity::Critical,
            ParserError::Encoding(_) => ErrorSeverity::Critical,

            ParserError::Transport(_) => ErrorSeverity::High,
            ParserError::Remote { status } if *status >= 500 => ErrorSeverity::High,

            ParserError::Remote { .. } => ErrorSeverity::Medium,
            ParserError::Decoding(_) => ErrorSeverity::Medium,

            ParserError::Node { .. } => ErrorSeverity::Low,
        }
    }

    /// HTTP status carried by a remote failure, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ParserError::Remote { status } => Some(*status),
            ParserError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
