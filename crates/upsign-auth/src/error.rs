//! Signing error types.

/// Errors from the signing primitive.
///
/// These occur only on malformed input. A caller that validates its
/// parameters before signing never sees them.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SignError {
    /// The parameter set contains nothing to sign.
    #[error("cannot sign an empty parameter set")]
    EmptyParams,

    /// The signing key is empty.
    #[error("cannot sign with an empty secret")]
    EmptySecret,
}
