//! HTTP transport for the Upsign signature service.
//!
//! This crate adapts the signature pipeline to hyper. It owns everything
//! wire-shaped: routing the two operations, collecting request bodies,
//! mapping service errors to plain-text responses with the fixed wire
//! messages, and the `hyper::service::Service` implementation the server
//! binary mounts on its listener.
//!
//! # Modules
//!
//! - [`body`] - Response body type
//! - [`response`] - Response construction and error formatting
//! - [`router`] - Path-based operation resolution
//! - [`service`] - The hyper `Service` implementation and request pipeline

pub mod body;
pub mod response;
pub mod router;
pub mod service;

pub use body::ResponseBody;
pub use router::{SIGNATURE_PATH, resolve_operation};
pub use service::{UpsignHttpConfig, UpsignHttpService};
