//! Error types for the view client.

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during view operations.
#[derive(Debug, Error)]
pub enum Error {
    /// View type is not one the server recognizes.
    #[error("view type '{0}' is not supported by Jenkins")]
    UnsupportedType(String),

    /// View does not exist on the server.
    #[error("view '{0}' does not exist on the server")]
    ViewNotFound(String),

    /// Filter is not a valid regular expression.
    #[error("invalid filter pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Caller supplied an unusable argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Request failed before a response was received.
    #[error("request failed: {0}")]
    Request(String),

    /// Server answered with a non-success status.
    #[error("Jenkins returned {status}: {body}")]
    Server { status: u16, body: String },

    /// Response was missing a field this client relies on.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Failed to access system keyring.
    #[error("keyring error: {0}")]
    Keyring(String),

    /// No API token stored for the account.
    #[error("credentials not found for {0}")]
    CredentialsNotFound(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Request(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats_correctly() {
        let err = Error::ViewNotFound("nightly".to_string());
        assert_eq!(err.to_string(), "view 'nightly' does not exist on the server");

        let err = Error::UnsupportedType("bogus".to_string());
        assert_eq!(
            err.to_string(),
            "view type 'bogus' is not supported by Jenkins"
        );
    }

    #[test]
    fn server_error_includes_status_and_body() {
        let err = Error::Server {
            status: 404,
            body: "Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "Jenkins returned 404: Not Found");
    }

    #[test]
    fn error_from_regex() {
        let regex_err = regex::Regex::new("(unclosed").unwrap_err();
        let err: Error = regex_err.into();
        assert!(matches!(err, Error::Pattern(_)));
    }

    #[test]
    fn error_from_serde_json() {
        let json_err: serde_json::Error = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
