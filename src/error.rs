//! Error types for the translation editor core

use serde::Serialize;
use thiserror::Error;

/// Library error types
#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Invalid url: {0}")]
    InvalidUrl(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

impl TranslateError {
    fn code(&self) -> &'static str {
        match self {
            TranslateError::Http(_) => "HTTP_ERROR",
            TranslateError::Api { .. } => "API_ERROR",
            TranslateError::Io(_) => "IO_ERROR",
            TranslateError::Serialization(_) => "SERIALIZATION_ERROR",
            TranslateError::Base64(_) => "BASE64_ERROR",
            TranslateError::Utf8(_) => "UTF8_ERROR",
            TranslateError::InvalidUrl(_) => "INVALID_URL",
            TranslateError::FileNotFound(_) => "FILE_NOT_FOUND",
            TranslateError::MissingCredentials(_) => "MISSING_CREDENTIALS",
            TranslateError::InvalidInput(_) => "INVALID_INPUT",
            TranslateError::Unsupported(_) => "UNSUPPORTED",
        }
    }
}

/// Serializable error response for the UI boundary
#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl From<&TranslateError> for ErrorResponse {
    fn from(error: &TranslateError) -> Self {
        ErrorResponse {
            code: error.code().to_string(),
            message: error.to_string(),
            details: None,
        }
    }
}

impl serde::Serialize for TranslateError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        ErrorResponse::from(self).serialize(serializer)
    }
}

/// Result type alias for library operations
pub type Result<T> = std::result::Result<T, TranslateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_response_carries_stable_code() {
        let error = TranslateError::Api {
            status: 404,
            body: "Not Found".to_string(),
        };
        let response = ErrorResponse::from(&error);
        assert_eq!(response.code, "API_ERROR");
        assert_eq!(response.message, "API error 404: Not Found");
    }

    #[test]
    fn error_serializes_as_response() {
        let error = TranslateError::InvalidUrl("ftp://nope".to_string());
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["code"], "INVALID_URL");
        assert_eq!(json["message"], "Invalid url: ftp://nope");
    }
}
