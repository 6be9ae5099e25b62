//! SHA-1 signature computation and the signer trait.

use sha1::{Digest, Sha1};
use tracing::debug;

use crate::canonical::{SignParams, string_to_sign};
use crate::error::SignError;

/// Compute the Cloudinary signature for a parameter set.
///
/// The signature is the lowercase hex SHA-1 digest of the canonical string
/// to sign with the API secret appended. Identical inputs always produce the
/// same signature.
///
/// # Errors
///
/// Returns a [`SignError`] if the parameter set or the secret is empty.
pub fn sign_params(params: &SignParams, api_secret: &str) -> Result<String, SignError> {
    if params.is_empty() {
        return Err(SignError::EmptyParams);
    }
    if api_secret.is_empty() {
        return Err(SignError::EmptySecret);
    }

    let to_sign = string_to_sign(params);
    // The canonical string holds only public parameters; the secret stays
    // out of all log fields.
    debug!(params = %to_sign, "computing upload signature");

    let mut hasher = Sha1::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// The signing primitive as seen by the transport layer.
///
/// The HTTP pipeline depends on this trait rather than on the concrete
/// algorithm, so tests can substitute a failing implementation to exercise
/// the error path.
pub trait ParameterSigner: Send + Sync + 'static {
    /// Sign a parameter set with the given secret.
    ///
    /// # Errors
    ///
    /// Returns a [`SignError`] on malformed input.
    fn sign(&self, params: &SignParams, api_secret: &str) -> Result<String, SignError>;
}

/// Production signer implementing the Cloudinary scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct CloudinarySigner;

impl ParameterSigner for CloudinarySigner {
    fn sign(&self, params: &SignParams, api_secret: &str) -> Result<String, SignError> {
        sign_params(params, api_secret)
    }
}
