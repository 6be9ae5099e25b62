//! Response construction and error formatting.

use upsign_model::ServiceError;

use crate::body::ResponseBody;

/// Content type for JSON responses.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Content type for plain-text error responses.
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Convert a [`ServiceError`] into a complete HTTP error response.
///
/// The body is the fixed wire message for the error code. Request-specific
/// detail stays in the error's internal message for logging and never
/// reaches the caller.
#[must_use]
pub fn error_to_response(error: &ServiceError) -> http::Response<ResponseBody> {
    http::Response::builder()
        .status(error.status_code())
        .header(http::header::CONTENT_TYPE, TEXT_CONTENT_TYPE)
        .body(ResponseBody::from_string(error.wire_message()))
        .expect("valid error response")
}

/// Build a 200 response from JSON bytes.
#[must_use]
pub fn json_response(json: impl Into<bytes::Bytes>) -> http::Response<ResponseBody> {
    http::Response::builder()
        .status(http::StatusCode::OK)
        .header(http::header::CONTENT_TYPE, JSON_CONTENT_TYPE)
        .body(ResponseBody::from_bytes(json))
        .expect("valid JSON response")
}
