//! Path-based operation resolution.
//!
//! The service exposes two operations. The signature endpoint is matched by
//! exact path; every other path serves the descriptor document. The Info
//! operation acting as the catch-all keeps root-mux semantics: probing any
//! unknown path answers with the API description rather than a 404.

use upsign_model::Operation;

/// Path of the signature endpoint.
pub const SIGNATURE_PATH: &str = "/api/gen/signature";

/// Resolve the operation for a request path.
///
/// `/api/gen/signature` resolves to [`Operation::GenerateSignature`]; any
/// other path falls through to [`Operation::Info`].
#[must_use]
pub fn resolve_operation(path: &str) -> Operation {
    if path == SIGNATURE_PATH {
        Operation::GenerateSignature
    } else {
        Operation::Info
    }
}
