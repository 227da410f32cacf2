use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Object not found")]
    NotFound,

    #[error("API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl ApiError {
    /// Classification used by read handlers: a not-found remote object means
    /// "clear state", never a diagnostic.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_classification() {
        assert!(ApiError::NotFound.is_not_found());
        assert!(!ApiError::AuthenticationFailed.is_not_found());
        assert!(!ApiError::Api {
            status: 500,
            message: "boom".to_string()
        }
        .is_not_found());
    }

    #[test]
    fn api_error_formatting_includes_status_and_message() {
        let err = ApiError::Api {
            status: 409,
            message: "user already exists".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("409"));
        assert!(text.contains("user already exists"));
    }
}
