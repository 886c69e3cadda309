use reqwest::StatusCode;
use thiserror::Error;

/// Input problems caught before any request leaves the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("new password must be between {min} and {max} characters")]
    PasswordLength { min: usize, max: usize },
    #[error("new password cannot be the same as the old password")]
    PasswordUnchanged,
}

#[derive(Debug, Error)]
pub enum PulseError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("remote returned {status}: {message}")]
    Http { status: StatusCode, message: String },
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("{what} not found")]
    NotFound { what: &'static str },
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    Config(String),
}

/// Coarse failure classes callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    NotFound,
    Validation,
    Unauthorized,
    Other,
}

impl PulseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PulseError::Network(_) => ErrorKind::Network,
            PulseError::Http { status, .. } if status.is_server_error() => ErrorKind::Network,
            PulseError::Http { status, .. } if *status == StatusCode::NOT_FOUND => {
                ErrorKind::NotFound
            }
            PulseError::NotFound { .. } => ErrorKind::NotFound,
            PulseError::Validation(_) => ErrorKind::Validation,
            PulseError::Unauthorized(_) => ErrorKind::Unauthorized,
            PulseError::Http { .. } | PulseError::Decode(_) | PulseError::Config(_) => {
                ErrorKind::Other
            }
        }
    }

    /// Short text suitable for a snackbar-style notice.
    pub fn user_message(&self) -> String {
        match self {
            PulseError::Validation(v) => capitalize(&v.to_string()),
            PulseError::NotFound { what } => format!("No {what} found"),
            PulseError::Unauthorized(msg) if !msg.is_empty() => msg.clone(),
            PulseError::Unauthorized(_) => "You are not signed in".to_string(),
            PulseError::Network(e) if e.is_timeout() => {
                "The server took too long to respond".to_string()
            }
            PulseError::Network(_) => "Could not reach the server".to_string(),
            PulseError::Http { message, .. } if !message.is_empty() => message.clone(),
            PulseError::Http { .. } | PulseError::Decode(_) => {
                "Something went wrong, please try again".to_string()
            }
            PulseError::Config(msg) => format!("Configuration problem: {msg}"),
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub type Result<T, E = PulseError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_read_as_sentences() {
        let err = PulseError::from(ValidationError::PasswordMismatch);
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.user_message(), "Passwords do not match");

        let err = PulseError::from(ValidationError::PasswordLength { min: 8, max: 256 });
        assert_eq!(
            err.user_message(),
            "New password must be between 8 and 256 characters"
        );
    }

    #[test]
    fn http_errors_are_classified_by_status() {
        let server = PulseError::Http {
            status: StatusCode::BAD_GATEWAY,
            message: String::new(),
        };
        assert_eq!(server.kind(), ErrorKind::Network);
        assert_eq!(server.user_message(), "Something went wrong, please try again");

        let missing = PulseError::Http {
            status: StatusCode::NOT_FOUND,
            message: "Document not found".into(),
        };
        assert_eq!(missing.kind(), ErrorKind::NotFound);
        assert_eq!(missing.user_message(), "Document not found");
    }

    #[test]
    fn unauthorized_prefers_the_carried_message() {
        let err = PulseError::Unauthorized("Incorrect email or password".into());
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(err.user_message(), "Incorrect email or password");
        assert_eq!(
            PulseError::Unauthorized(String::new()).user_message(),
            "You are not signed in"
        );
    }

    #[test]
    fn not_found_names_the_missing_thing() {
        let err = PulseError::NotFound {
            what: "saved preferences",
        };
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.user_message(), "No saved preferences found");
    }
}
