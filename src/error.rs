use thiserror::Error;

/// Errors that can occur while resolving the local tz-string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Connection, DNS, TLS, timeout or HTTP status failure on either request.
    #[error("Network error: {0}")]
    Network(String),

    /// Empty body, no identifiable timezone name, or no identifiable tz-string.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The resolver could not be configured from the environment.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse classification of [`Error`], for callers that only branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// See [`Error::Network`].
    Network,
    /// See [`Error::Parse`].
    Parse,
    /// See [`Error::Config`].
    Config,
}

impl Error {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Network(_) => ErrorKind::Network,
            Error::Parse(_) => ErrorKind::Parse,
            Error::Config(_) => ErrorKind::Config,
        }
    }

    /// Returns true for transport failures, which are usually worth retrying later.
    pub fn is_network(&self) -> bool {
        self.kind() == ErrorKind::Network
    }
}

/// Result type for resolver operations.
pub type Result<T> = std::result::Result<T, Error>;
