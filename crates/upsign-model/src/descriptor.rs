//! The static service descriptor.
//!
//! The descriptor is the JSON document served for any request outside the
//! signature route. It describes the service and the shape of the signature
//! API so a client can discover the endpoint without separate documentation.
//! It is immutable: built once at process start and reused for every
//! response.

use serde::Serialize;

/// Service metadata and API shape.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceDescriptor {
    /// Service name.
    pub name: &'static str,
    /// Service version.
    pub version: &'static str,
    /// One-line description of what the service is for.
    pub description: &'static str,
    /// License identifier.
    pub license: &'static str,
    /// The signature API shape.
    pub api: ApiDescriptor,
}

/// Shape of the signature API: endpoint, method, and field documentation.
#[derive(Debug, Clone, Serialize)]
pub struct ApiDescriptor {
    /// Path of the signature endpoint.
    pub endpoint: &'static str,
    /// Accepted HTTP method.
    pub method: &'static str,
    /// Documentation of the request body fields.
    pub body: RequestFieldDocs,
    /// Documentation of the response body fields.
    pub response: ResponseFieldDocs,
}

/// Per-field documentation of the signature request body.
#[derive(Debug, Clone, Serialize)]
pub struct RequestFieldDocs {
    /// What the `api_secret` field holds.
    pub api_secret: &'static str,
    /// What the `folder` field holds.
    pub folder: &'static str,
    /// What the `public_id` field holds.
    pub public_id: &'static str,
    /// What the `timestamp` field holds.
    pub timestamp: &'static str,
}

/// Per-field documentation of the signature response body.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseFieldDocs {
    /// What the `signature` field holds.
    pub signature: &'static str,
}

impl Default for ServiceDescriptor {
    fn default() -> Self {
        Self {
            name: "Upsign",
            version: env!("CARGO_PKG_VERSION"),
            description: "Signature generation API for Cloudinary uploads, for clients \
                          that cannot hold the API secret themselves",
            license: "MIT",
            api: ApiDescriptor {
                endpoint: "/api/gen/signature",
                method: "POST",
                body: RequestFieldDocs {
                    api_secret: "Cloudinary API secret used as the signing key",
                    folder: "Target folder for the asset",
                    public_id: "Unique identifier for the asset",
                    timestamp: "Unix timestamp of the request",
                },
                response: ResponseFieldDocs {
                    signature: "Generated signature for upload authentication",
                },
            },
        }
    }
}

impl ServiceDescriptor {
    /// Serialize the descriptor to JSON bytes.
    #[must_use]
    pub fn to_json(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("descriptor serialization cannot fail")
    }
}
