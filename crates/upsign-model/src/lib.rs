//! Data model for the Upsign signature service.
//!
//! This crate defines the wire types exchanged over the HTTP API — the
//! signature request and response, and the static service descriptor —
//! together with the operation enum and the service error type shared by the
//! transport layer. Nothing here performs I/O; the types exist so the
//! transport and signing layers agree on one vocabulary.

pub mod descriptor;
pub mod error;
pub mod input;
pub mod operations;
pub mod output;

pub use descriptor::ServiceDescriptor;
pub use error::{ServiceError, ServiceErrorCode};
pub use input::SignatureRequest;
pub use operations::Operation;
pub use output::SignatureResponse;
