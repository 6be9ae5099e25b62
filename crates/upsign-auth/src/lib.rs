//! Cloudinary upload-signature computation.
//!
//! Cloudinary authorizes upload requests with a deterministic signature
//! derived from the request parameters and the account's API secret:
//!
//! ```text
//! signature = lowercase_hex(SHA1(canonical_params + api_secret))
//! ```
//!
//! where `canonical_params` is the parameter set sorted lexicographically by
//! name and rendered as `name=value` pairs joined with `&`. This crate
//! implements that scheme as a pure function over an ordered parameter set.
//!
//! # Usage
//!
//! ```rust
//! use upsign_auth::{CloudinarySigner, ParameterSigner, SignParams};
//!
//! let mut params = SignParams::new();
//! params.append("folder", "images");
//! params.append("public_id", "abc123");
//! params.append("timestamp", "1700000000");
//!
//! let signature = CloudinarySigner.sign(&params, "shh").unwrap();
//! assert_eq!(signature, "f1db0b090cc1b2c57704e63ab2f0f1e879782e62");
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Ordered parameter set and canonical string construction
//! - [`error`] - Signing error types
//! - [`signer`] - SHA-1 signature computation and the signer trait

pub mod canonical;
pub mod error;
pub mod signer;

pub use canonical::{SignParams, string_to_sign};
pub use error::SignError;
pub use signer::{CloudinarySigner, ParameterSigner, sign_params};
