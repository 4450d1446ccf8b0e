//! Error handling for domain checking operations.
//!
//! Per-domain failures (network, timeout, unexpected status) are downgraded to
//! a Taken result inside the worker pool, so they only surface as values of this
//! type through `CheckResult::error`. The remaining variants describe problems
//! that stop a run before any request is sent.

use std::fmt;

/// Main error type for domain-scout operations.
#[derive(Debug, Clone)]
pub enum DomainScoutError {
    /// Invalid domain name format
    InvalidDomain { domain: String, reason: String },

    /// Network-related errors (connection refused, DNS failure, TLS, etc.)
    NetworkError {
        message: String,
        source: Option<String>,
    },

    /// The RDAP request did not complete within the configured timeout
    Timeout {
        operation: String,
        duration: std::time::Duration,
    },

    /// The RDAP server answered with something other than 200 or 404
    UnexpectedStatus { domain: String, status_code: u16 },

    /// Configuration errors (invalid settings, unparsable files, etc.)
    ConfigError { message: String },

    /// File I/O errors when reading domain lists or writing reports
    FileError { path: String, message: String },

    /// Parse errors for configuration documents and CSV input
    ParseError {
        message: String,
        content: Option<String>,
    },

    /// Generic internal errors that don't fit other categories
    Internal { message: String },
}

impl DomainScoutError {
    /// Create a new invalid domain error.
    pub fn invalid_domain<D: Into<String>, R: Into<String>>(domain: D, reason: R) -> Self {
        Self::InvalidDomain {
            domain: domain.into(),
            reason: reason.into(),
        }
    }

    /// Create a new network error.
    pub fn network<M: Into<String>>(message: M) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new network error with source information.
    pub fn network_with_source<M: Into<String>, S: Into<String>>(message: M, source: S) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a new timeout error.
    pub fn timeout<O: Into<String>>(operation: O, duration: std::time::Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    pub fn unexpected_status<D: Into<String>>(domain: D, status_code: u16) -> Self {
        Self::UnexpectedStatus {
            domain: domain.into(),
            status_code,
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new parse error.
    pub fn parse<M: Into<String>>(message: M) -> Self {
        Self::ParseError {
            message: message.into(),
            content: None,
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the failure happened on the transport rather than in a response.
    ///
    /// Only transport failures are retried by the worker pool; a server that
    /// answered with any status has been heard and its answer stands.
    pub fn is_network_failure(&self) -> bool {
        matches!(self, Self::NetworkError { .. } | Self::Timeout { .. })
    }
}

impl fmt::Display for DomainScoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDomain { domain, reason } => {
                write!(f, "Invalid domain '{}': {}", domain, reason)
            }
            Self::NetworkError { message, source } => {
                if let Some(source) = source {
                    write!(f, "Network error: {} (source: {})", message, source)
                } else {
                    write!(f, "Network error: {}", message)
                }
            }
            Self::Timeout {
                operation,
                duration,
            } => {
                write!(f, "Timeout after {:?} during: {}", duration, operation)
            }
            Self::UnexpectedStatus {
                domain,
                status_code,
            } => {
                write!(
                    f,
                    "Unexpected RDAP status for '{}': HTTP {}",
                    domain, status_code
                )
            }
            Self::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::FileError { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
            Self::ParseError { message, content: _ } => {
                write!(f, "Parse error: {}", message)
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for DomainScoutError {}

// From conversions for the error types the library touches.
// reqwest errors are mapped in RdapClient, which knows the configured timeout.
impl From<serde_json::Error> for DomainScoutError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError {
            message: format!("JSON parsing failed: {}", err),
            content: None,
        }
    }
}

impl From<toml::de::Error> for DomainScoutError {
    fn from(err: toml::de::Error) -> Self {
        Self::ParseError {
            message: format!("TOML parsing failed: {}", err),
            content: None,
        }
    }
}

impl From<csv::Error> for DomainScoutError {
    fn from(err: csv::Error) -> Self {
        Self::ParseError {
            message: format!("CSV error: {}", err),
            content: None,
        }
    }
}

impl From<std::io::Error> for DomainScoutError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal {
            message: format!("I/O error: {}", err),
        }
    }
}

impl From<regex::Error> for DomainScoutError {
    fn from(err: regex::Error) -> Self {
        Self::Internal {
            message: format!("Regex error: {}", err),
        }
    }
}
