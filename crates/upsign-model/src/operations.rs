//! Operations exposed by the service.

use std::fmt;

/// An operation resolved from the request path.
///
/// The service has exactly two: the signature endpoint, matched by exact
/// path, and the descriptor document served for every other path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Serve the static service descriptor.
    Info,
    /// Compute an upload signature.
    GenerateSignature,
}

impl Operation {
    /// Returns the operation name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::GenerateSignature => "GenerateSignature",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
