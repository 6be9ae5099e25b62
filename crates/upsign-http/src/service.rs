//! Upsign HTTP service implementing the hyper `Service` trait.

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::BodyExt;
use hyper::body::Incoming;
use tracing::{debug, info};

use upsign_auth::{CloudinarySigner, ParameterSigner, SignParams};
use upsign_model::{Operation, ServiceDescriptor, ServiceError, SignatureRequest, SignatureResponse};

use crate::body::ResponseBody;
use crate::response::{error_to_response, json_response};
use crate::router::resolve_operation;

/// Configuration for the Upsign HTTP service.
pub struct UpsignHttpConfig {
    /// The signing primitive invoked for signature requests.
    pub signer: Arc<dyn ParameterSigner>,
    /// The descriptor document served by the info operation.
    pub descriptor: ServiceDescriptor,
}

impl fmt::Debug for UpsignHttpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpsignHttpConfig")
            .field("signer", &"...")
            .field("descriptor", &self.descriptor)
            .finish()
    }
}

impl Default for UpsignHttpConfig {
    fn default() -> Self {
        Self {
            signer: Arc::new(CloudinarySigner),
            descriptor: ServiceDescriptor::default(),
        }
    }
}

/// Hyper `Service` implementation for the signature API.
///
/// Routes each request to the info or signature operation and runs the
/// signature pipeline: method check, body read, JSON decode, field
/// validation, signing. The descriptor is serialized once at construction
/// and reused for every info response.
pub struct UpsignHttpService {
    signer: Arc<dyn ParameterSigner>,
    descriptor_json: Bytes,
}

impl fmt::Debug for UpsignHttpService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpsignHttpService")
            .field("signer", &"...")
            .field("descriptor_json", &self.descriptor_json.len())
            .finish()
    }
}

impl UpsignHttpService {
    /// Create a new `UpsignHttpService`.
    #[must_use]
    pub fn new(config: UpsignHttpConfig) -> Self {
        Self {
            signer: config.signer,
            descriptor_json: Bytes::from(config.descriptor.to_json()),
        }
    }
}

impl Clone for UpsignHttpService {
    fn clone(&self) -> Self {
        Self {
            signer: Arc::clone(&self.signer),
            descriptor_json: self.descriptor_json.clone(),
        }
    }
}

impl hyper::service::Service<http::Request<Incoming>> for UpsignHttpService {
    type Response = http::Response<ResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let svc = self.clone();
        let request_id = uuid::Uuid::new_v4().to_string();

        Box::pin(async move {
            let method = req.method().clone();
            let path = req.uri().path().to_owned();

            let response = process_request(req, &svc).await;
            let response = add_common_headers(response, &request_id);

            info!(
                method = %method,
                path = %path,
                status = response.status().as_u16(),
                request_id = %request_id,
                "handled request",
            );
            Ok(response)
        })
    }
}

/// Process a single request through the full pipeline.
///
/// Generic over the request body type so tests can drive the pipeline with
/// buffered bodies instead of a live hyper connection.
async fn process_request<B>(
    req: http::Request<B>,
    svc: &UpsignHttpService,
) -> http::Response<ResponseBody>
where
    B: http_body::Body,
    B::Error: fmt::Display,
{
    let (parts, body) = req.into_parts();

    let op = resolve_operation(parts.uri.path());
    debug!(operation = %op, "dispatching operation");

    match op {
        Operation::Info => json_response(svc.descriptor_json.clone()),
        Operation::GenerateSignature => {
            match generate_signature(&parts, body, svc.signer.as_ref()).await {
                Ok(response) => response,
                Err(err) => {
                    debug!(code = %err.code, detail = %err.message, "signature request failed");
                    error_to_response(&err)
                }
            }
        }
    }
}

/// Run the signature pipeline for a request on the signature route.
async fn generate_signature<B>(
    parts: &http::request::Parts,
    body: B,
    signer: &dyn ParameterSigner,
) -> Result<http::Response<ResponseBody>, ServiceError>
where
    B: http_body::Body,
    B::Error: fmt::Display,
{
    // 1. Only POST reaches the body.
    if parts.method != http::Method::POST {
        return Err(ServiceError::method_not_allowed(&parts.method));
    }

    // 2. Collect the request body.
    let body = collect_body(body).await?;

    // 3. Decode the JSON body.
    let request: SignatureRequest =
        serde_json::from_slice(&body).map_err(ServiceError::malformed_json)?;

    // 4. Validate required fields.
    request.validate()?;

    // 5. Sign exactly folder, public_id, timestamp; extra body fields never
    //    enter the parameter set.
    let mut params = SignParams::new();
    params.append("folder", &request.folder);
    params.append("public_id", &request.public_id);
    params.append("timestamp", &request.timestamp);

    let signature = signer
        .sign(&params, &request.api_secret)
        .map_err(ServiceError::signing_failure)?;

    // 6. Respond.
    let json = serde_json::to_vec(&SignatureResponse { signature })
        .expect("signature response serialization cannot fail");
    Ok(json_response(json))
}

/// Collect the request body into a single `Bytes` buffer.
async fn collect_body<B>(body: B) -> Result<Bytes, ServiceError>
where
    B: http_body::Body,
    B::Error: fmt::Display,
{
    body.collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .map_err(|e| ServiceError::body_read(format!("failed to read request body: {e}")))
}

/// Add common response headers to every response.
fn add_common_headers(
    mut response: http::Response<ResponseBody>,
    request_id: &str,
) -> http::Response<ResponseBody> {
    let headers = response.headers_mut();

    if let Ok(hv) = http::HeaderValue::from_str(request_id) {
        headers.entry("x-request-id").or_insert(hv);
    }

    headers.insert("server", http::HeaderValue::from_static("Upsign"));

    response
}

#[cfg(test)]
mod tests {
    use std::task::{Context, Poll};

    use http_body_util::Full;
    use upsign_auth::SignError;

    use super::*;
    use crate::router::SIGNATURE_PATH;

    /// Signer that always fails, for driving the 500 path.
    struct FailingSigner;

    impl ParameterSigner for FailingSigner {
        fn sign(&self, _params: &SignParams, _api_secret: &str) -> Result<String, SignError> {
            Err(SignError::EmptyParams)
        }
    }

    /// Body that fails at the transport level on the first read.
    struct FailingBody;

    impl http_body::Body for FailingBody {
        type Data = Bytes;
        type Error = std::io::Error;

        fn poll_frame(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
        ) -> Poll<Option<Result<http_body::Frame<Self::Data>, Self::Error>>> {
            Poll::Ready(Some(Err(std::io::Error::other("connection reset"))))
        }
    }

    fn test_service() -> UpsignHttpService {
        UpsignHttpService::new(UpsignHttpConfig::default())
    }

    fn request(
        method: http::Method,
        path: &str,
        body: &str,
    ) -> http::Request<Full<Bytes>> {
        http::Request::builder()
            .method(method)
            .uri(path)
            .body(Full::new(Bytes::from(body.to_owned())))
            .unwrap()
    }

    async fn body_string(response: http::Response<ResponseBody>) -> String {
        let collected = response.into_body().collect().await.unwrap();
        String::from_utf8(collected.to_bytes().to_vec()).unwrap()
    }

    const VALID_BODY: &str =
        r#"{"api_secret":"shh","folder":"images","public_id":"abc123","timestamp":"1700000000"}"#;

    #[tokio::test]
    async fn test_should_sign_valid_request() {
        let svc = test_service();
        let req = request(http::Method::POST, SIGNATURE_PATH, VALID_BODY);

        let resp = process_request(req, &svc).await;
        assert_eq!(resp.status(), http::StatusCode::OK);
        assert_eq!(
            resp.headers()
                .get(http::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("application/json"),
        );

        let body = body_string(resp).await;
        assert_eq!(
            body,
            r#"{"signature":"f1db0b090cc1b2c57704e63ab2f0f1e879782e62"}"#,
        );
    }

    #[tokio::test]
    async fn test_should_ignore_extra_body_fields() {
        let svc = test_service();
        let with_extra = r#"{"api_secret":"shh","folder":"images","public_id":"abc123","timestamp":"1700000000","tags":"x","note":"y"}"#;

        let base = body_string(
            process_request(request(http::Method::POST, SIGNATURE_PATH, VALID_BODY), &svc).await,
        )
        .await;
        let extra = body_string(
            process_request(request(http::Method::POST, SIGNATURE_PATH, with_extra), &svc).await,
        )
        .await;

        assert_eq!(base, extra);
    }

    #[tokio::test]
    async fn test_should_reject_non_post_method() {
        let svc = test_service();

        for method in [
            http::Method::GET,
            http::Method::PUT,
            http::Method::DELETE,
            http::Method::PATCH,
        ] {
            let req = request(method.clone(), SIGNATURE_PATH, VALID_BODY);
            let resp = process_request(req, &svc).await;

            assert_eq!(
                resp.status(),
                http::StatusCode::METHOD_NOT_ALLOWED,
                "method: {method}",
            );
            assert_eq!(body_string(resp).await, "Invalid request method");
        }
    }

    #[tokio::test]
    async fn test_should_reject_invalid_json() {
        let svc = test_service();

        // Not JSON at all, and valid JSON of the wrong shape.
        for body in ["not json{", r#""not json""#, "[1,2,3]"] {
            let req = request(http::Method::POST, SIGNATURE_PATH, body);
            let resp = process_request(req, &svc).await;

            assert_eq!(resp.status(), http::StatusCode::BAD_REQUEST, "body: {body}");
            assert_eq!(body_string(resp).await, "Error parsing JSON");
        }
    }

    #[tokio::test]
    async fn test_should_reject_empty_object() {
        let svc = test_service();
        let req = request(http::Method::POST, SIGNATURE_PATH, "{}");

        let resp = process_request(req, &svc).await;
        assert_eq!(resp.status(), http::StatusCode::BAD_REQUEST);
        assert_eq!(body_string(resp).await, "Missing required parameters");
    }

    #[tokio::test]
    async fn test_should_reject_each_missing_field() {
        let svc = test_service();
        let bodies = [
            r#"{"folder":"images","public_id":"abc123","timestamp":"1700000000"}"#,
            r#"{"api_secret":"shh","public_id":"abc123","timestamp":"1700000000"}"#,
            r#"{"api_secret":"shh","folder":"images","timestamp":"1700000000"}"#,
            r#"{"api_secret":"shh","folder":"images","public_id":"abc123"}"#,
        ];

        for body in bodies {
            let req = request(http::Method::POST, SIGNATURE_PATH, body);
            let resp = process_request(req, &svc).await;

            assert_eq!(resp.status(), http::StatusCode::BAD_REQUEST, "body: {body}");
            assert_eq!(body_string(resp).await, "Missing required parameters");
        }
    }

    #[tokio::test]
    async fn test_should_treat_empty_fields_as_missing() {
        let svc = test_service();
        let body =
            r#"{"api_secret":"","folder":"images","public_id":"abc123","timestamp":"1700000000"}"#;

        let req = request(http::Method::POST, SIGNATURE_PATH, body);
        let resp = process_request(req, &svc).await;
        assert_eq!(resp.status(), http::StatusCode::BAD_REQUEST);
        assert_eq!(body_string(resp).await, "Missing required parameters");
    }

    #[tokio::test]
    async fn test_should_map_body_read_failure() {
        let svc = test_service();
        let (parts, ()) = http::Request::builder()
            .method(http::Method::POST)
            .uri(SIGNATURE_PATH)
            .body(())
            .unwrap()
            .into_parts();

        let err = generate_signature(&parts, FailingBody, svc.signer.as_ref())
            .await
            .unwrap_err();
        let resp = error_to_response(&err);

        assert_eq!(resp.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(resp).await, "Error reading request body");
    }

    #[tokio::test]
    async fn test_should_map_signing_failure() {
        let svc = UpsignHttpService::new(UpsignHttpConfig {
            signer: Arc::new(FailingSigner),
            descriptor: ServiceDescriptor::default(),
        });

        let req = request(http::Method::POST, SIGNATURE_PATH, VALID_BODY);
        let resp = process_request(req, &svc).await;

        assert_eq!(resp.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(resp).await, "Error generating signature");
    }

    #[tokio::test]
    async fn test_should_serve_descriptor_on_root_for_any_method() {
        let svc = test_service();

        for method in [http::Method::GET, http::Method::POST, http::Method::DELETE] {
            let req = request(method.clone(), "/", "");
            let resp = process_request(req, &svc).await;

            assert_eq!(resp.status(), http::StatusCode::OK, "method: {method}");
            let parsed: serde_json::Value =
                serde_json::from_str(&body_string(resp).await).unwrap();
            assert_eq!(parsed["name"], "Upsign");
            assert_eq!(parsed["api"]["endpoint"], "/api/gen/signature");
        }
    }

    #[tokio::test]
    async fn test_should_serve_descriptor_on_unknown_paths() {
        let svc = test_service();
        let req = request(http::Method::GET, "/some/other/path", "");

        let resp = process_request(req, &svc).await;
        assert_eq!(resp.status(), http::StatusCode::OK);

        let parsed: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(parsed["name"], "Upsign");
    }

    #[test]
    fn test_should_add_common_headers() {
        let resp = json_response(Vec::new());
        let resp = add_common_headers(resp, "req-123");

        assert_eq!(
            resp.headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok()),
            Some("req-123"),
        );
        assert_eq!(
            resp.headers().get("server").and_then(|v| v.to_str().ok()),
            Some("Upsign"),
        );
    }
}
