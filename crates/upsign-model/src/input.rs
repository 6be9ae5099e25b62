//! Signature request body type.

use std::fmt;

use serde::Deserialize;

use crate::error::ServiceError;

/// The JSON body accepted by the signature endpoint.
///
/// All four fields are required and must be non-empty. Absent fields decode
/// to the empty string so absence and emptiness fall to the same
/// `MissingParameter` error, and unknown fields are ignored. A non-string
/// value for a known field is a deserialization error.
///
/// `timestamp` is treated as an opaque string: it is expected to hold a Unix
/// timestamp but is deliberately not validated as numeric.
#[derive(Clone, Default, Deserialize)]
pub struct SignatureRequest {
    /// Cloudinary API secret used as the signing key. Never logged or echoed.
    #[serde(default)]
    pub api_secret: String,

    /// Target folder for the asset.
    #[serde(default)]
    pub folder: String,

    /// Unique identifier for the asset.
    #[serde(default)]
    pub public_id: String,

    /// Unix timestamp of the request.
    #[serde(default)]
    pub timestamp: String,
}

impl SignatureRequest {
    /// Names of required fields that are absent or empty.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.api_secret.is_empty() {
            missing.push("api_secret");
        }
        if self.folder.is_empty() {
            missing.push("folder");
        }
        if self.public_id.is_empty() {
            missing.push("public_id");
        }
        if self.timestamp.is_empty() {
            missing.push("timestamp");
        }
        missing
    }

    /// Verify that all required fields are present and non-empty.
    ///
    /// # Errors
    ///
    /// Returns a `MissingParameter` error naming the offending fields.
    pub fn validate(&self) -> Result<(), ServiceError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::missing_parameter(&missing))
        }
    }
}

// The secret must not leak through debug formatting of the request.
impl fmt::Debug for SignatureRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureRequest")
            .field("api_secret", &"<redacted>")
            .field("folder", &self.folder)
            .field("public_id", &self.public_id)
            .field("timestamp", &self.timestamp)
            .finish()
    }
}
