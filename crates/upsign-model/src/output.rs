//! Signature response body type.

use serde::{Deserialize, Serialize};

/// The JSON body returned on a successful signature computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureResponse {
    /// The computed signature as a lowercase hex string.
    pub signature: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_serialize_signature_field_only() {
        let response = SignatureResponse {
            signature: "f1db0b090cc1b2c57704e63ab2f0f1e879782e62".to_owned(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(
            json,
            r#"{"signature":"f1db0b090cc1b2c57704e63ab2f0f1e879782e62"}"#,
        );
    }
}
