//! Service error types.
//!
//! Every failure in the signature pipeline maps to one of five error codes.
//! Each code has a fixed HTTP status and a fixed plain-text wire message;
//! the wire message never carries the underlying cause, which stays in the
//! internal `message` field for logging.

use std::fmt;

/// Well-known error codes for the signature service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ServiceErrorCode {
    /// Non-POST request on the signature route.
    MethodNotAllowed,
    /// Transport-level failure while reading the request body.
    BodyReadError,
    /// Request body is not a JSON object of string fields.
    MalformedJson,
    /// One or more required fields are absent or empty.
    MissingParameter,
    /// The signing primitive reported an error.
    SigningFailure,
}

impl ServiceErrorCode {
    /// Returns the short error code string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MethodNotAllowed => "MethodNotAllowed",
            Self::BodyReadError => "BodyReadError",
            Self::MalformedJson => "MalformedJson",
            Self::MissingParameter => "MissingParameter",
            Self::SigningFailure => "SigningFailure",
        }
    }

    /// Returns the fixed plain-text message sent to the caller.
    #[must_use]
    pub fn wire_message(&self) -> &'static str {
        match self {
            Self::MethodNotAllowed => "Invalid request method",
            Self::BodyReadError => "Error reading request body",
            Self::MalformedJson => "Error parsing JSON",
            Self::MissingParameter => "Missing required parameters",
            Self::SigningFailure => "Error generating signature",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> http::StatusCode {
        match self {
            Self::MethodNotAllowed => http::StatusCode::METHOD_NOT_ALLOWED,
            Self::MalformedJson | Self::MissingParameter => http::StatusCode::BAD_REQUEST,
            Self::BodyReadError | Self::SigningFailure => {
                http::StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl fmt::Display for ServiceErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A signature service error.
///
/// Carries the error code, an internal message with request-specific detail,
/// and the underlying source error, if any. The internal message must never
/// contain the API secret.
#[derive(Debug)]
pub struct ServiceError {
    /// The error code.
    pub code: ServiceErrorCode,
    /// A human-readable internal message (for logs, not for the caller).
    pub message: String,
    /// The underlying source error, if any.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceError({}): {}", self.code, self.message)
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl ServiceError {
    /// Create a new `ServiceError` from an error code.
    #[must_use]
    pub fn new(code: ServiceErrorCode) -> Self {
        Self {
            message: code.as_str().to_owned(),
            code,
            source: None,
        }
    }

    /// Create a new `ServiceError` with a custom internal message.
    #[must_use]
    pub fn with_message(code: ServiceErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
            source: None,
        }
    }

    /// Set the source error.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> http::StatusCode {
        self.code.status_code()
    }

    /// Returns the fixed plain-text message sent to the caller.
    #[must_use]
    pub fn wire_message(&self) -> &'static str {
        self.code.wire_message()
    }

    // -- Convenience constructors --

    /// Non-POST method on the signature route.
    #[must_use]
    pub fn method_not_allowed(method: &http::Method) -> Self {
        Self::with_message(
            ServiceErrorCode::MethodNotAllowed,
            format!("signature route requires POST, got {method}"),
        )
    }

    /// Failure while reading the request body.
    #[must_use]
    pub fn body_read(detail: impl Into<String>) -> Self {
        Self::with_message(ServiceErrorCode::BodyReadError, detail)
    }

    /// Request body did not decode as a flat JSON object of strings.
    #[must_use]
    pub fn malformed_json(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::with_message(ServiceErrorCode::MalformedJson, source.to_string())
            .with_source(source)
    }

    /// One or more required fields are absent or empty.
    #[must_use]
    pub fn missing_parameter(fields: &[&str]) -> Self {
        Self::with_message(
            ServiceErrorCode::MissingParameter,
            format!("missing or empty fields: {}", fields.join(", ")),
        )
    }

    /// The signing primitive reported an error.
    #[must_use]
    pub fn signing_failure(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::with_message(ServiceErrorCode::SigningFailure, source.to_string())
            .with_source(source)
    }
}
