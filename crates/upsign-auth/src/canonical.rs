//! Canonical parameter serialization for Cloudinary request signing.
//!
//! The string to sign is built by sorting parameters lexicographically by
//! name, rendering each as `name=value` (a multi-valued parameter joins its
//! values with `,`), and joining the pairs with `&`:
//!
//! ```text
//! folder=images&public_id=abc123&timestamp=1700000000
//! ```
//!
//! Both sides of the exchange derive this form independently, so it must be
//! deterministic regardless of the order parameters were gathered in.

use std::collections::BTreeMap;

/// An ordered set of parameters to sign.
///
/// Parameter names iterate in lexicographic order regardless of insertion
/// order. Values for a repeated name accumulate in insertion order.
#[derive(Debug, Clone, Default)]
pub struct SignParams {
    params: BTreeMap<String, Vec<String>>,
}

impl SignParams {
    /// Create an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value under a parameter name.
    pub fn append(&mut self, name: &str, value: &str) {
        self.params
            .entry(name.to_owned())
            .or_default()
            .push(value.to_owned());
    }

    /// Number of distinct parameter names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` if the set holds no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterate over `(name, values)` pairs in lexicographic name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// Build the canonical string to sign for a parameter set.
///
/// # Examples
///
/// ```
/// use upsign_auth::canonical::{SignParams, string_to_sign};
///
/// let mut params = SignParams::new();
/// params.append("timestamp", "1700000000");
/// params.append("folder", "images");
/// assert_eq!(string_to_sign(&params), "folder=images&timestamp=1700000000");
/// ```
#[must_use]
pub fn string_to_sign(params: &SignParams) -> String {
    params
        .iter()
        .map(|(name, values)| format!("{name}={}", values.join(",")))
        .collect::<Vec<_>>()
        .join("&")
}
