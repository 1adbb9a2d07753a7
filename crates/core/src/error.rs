//! Error types for s3kit-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.

use thiserror::Error;

/// Result type alias for s3kit-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for s3kit-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Object-store URI without a bucket and key
    #[error("Malformed path: {0}")]
    MalformedPath(String),

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Profile not found
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    /// Include/exclude pattern could not be compiled
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] glob::PatternError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::MalformedPath(_) | Error::InvalidPattern(_) => 2, // UsageError
            Error::Config(_) | Error::InvalidUrl(_) => 2,            // UsageError
            Error::Network(_) => 3,                                  // NetworkError
            Error::Auth(_) => 4,                                     // AuthError
            Error::NotFound(_) | Error::ProfileNotFound(_) => 5,     // NotFound
            _ => 1,                                                  // GeneralError
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(Error::MalformedPath("s3://x".into()).exit_code(), 2);
        assert_eq!(Error::Config("test".into()).exit_code(), 2);
        assert_eq!(Error::Network("test".into()).exit_code(), 3);
        assert_eq!(Error::Auth("test".into()).exit_code(), 4);
        assert_eq!(Error::NotFound("test".into()).exit_code(), 5);
        assert_eq!(Error::ProfileNotFound("test".into()).exit_code(), 5);
        assert_eq!(Error::General("test".into()).exit_code(), 1);
    }

    #[test]
    fn test_pattern_error_is_usage_error() {
        let err: Error = glob::Pattern::new("[").unwrap_err().into();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_error_display() {
        let err = Error::ProfileNotFound("scratch".into());
        assert_eq!(err.to_string(), "Profile not found: scratch");

        let err = Error::MalformedPath("s3://onlybucket".into());
        assert_eq!(err.to_string(), "Malformed path: s3://onlybucket");
    }
}
