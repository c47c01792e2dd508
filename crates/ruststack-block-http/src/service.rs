//! The gateway HTTP service implementing hyper's `Service` trait.
//!
//! [`BlockHttpService`] ties together routing, dispatch and response
//! serialization into a single hyper-compatible service. It handles:
//!
//! 1. Health check interception (`GET /health`, `GET /_health`)
//! 2. CORS preflight requests (`OPTIONS`)
//! 3. Request routing via [`BlockRouter`]
//! 4. Bounded request body collection
//! 5. Operation dispatch to the [`BlockHandler`]
//! 6. Common response headers (`x-amz-request-id`, `Server`, CORS)
//! 7. Error response formatting

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http::header::HeaderValue;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::service::Service;
use ruststack_block_model::{BlockError, BlockErrorCode};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::body::BlockResponseBody;
use crate::dispatch::{BlockHandler, dispatch_operation};
use crate::response::error_to_response;
use crate::router::BlockRouter;

/// Default upper bound on a request body: 16 MiB.
pub const DEFAULT_MAX_BODY_SIZE: usize = 16 * 1024 * 1024;

/// Configuration for the gateway HTTP service.
#[derive(Debug, Clone)]
pub struct BlockHttpConfig {
    /// Largest request body accepted, in bytes.
    pub max_body_size: usize,
}

impl Default for BlockHttpConfig {
    fn default() -> Self {
        Self {
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }
}

/// The gateway HTTP service.
///
/// # Type Parameters
///
/// - `H`: The business logic handler implementing [`BlockHandler`].
#[derive(Debug)]
pub struct BlockHttpService<H: BlockHandler> {
    handler: Arc<H>,
    router: BlockRouter,
    config: Arc<BlockHttpConfig>,
}

impl<H: BlockHandler> BlockHttpService<H> {
    /// Create a new service with the given handler and configuration.
    #[must_use]
    pub fn new(handler: H, config: BlockHttpConfig) -> Self {
        Self::from_shared(Arc::new(handler), config)
    }

    /// Create a new service from a shared handler.
    #[must_use]
    pub fn from_shared(handler: Arc<H>, config: BlockHttpConfig) -> Self {
        Self {
            handler,
            router: BlockRouter::new(),
            config: Arc::new(config),
        }
    }

    /// Run a request through the full gateway pipeline.
    ///
    /// Never fails: every error is rendered as an XML error response.
    pub async fn handle<B>(&self, req: http::Request<B>) -> http::Response<BlockResponseBody>
    where
        B: http_body::Body<Data = Bytes>,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let request_id = Uuid::new_v4().to_string();
        let response = process_request(
            req,
            self.handler.as_ref(),
            &self.router,
            &self.config,
            &request_id,
        )
        .await;
        add_common_headers(response, &request_id)
    }
}

impl<H: BlockHandler> Clone for BlockHttpService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            router: self.router,
            config: Arc::clone(&self.config),
        }
    }
}

impl<H: BlockHandler> Service<http::Request<Incoming>> for BlockHttpService<H> {
    type Response = http::Response<BlockResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let service = self.clone();
        Box::pin(async move { Ok(service.handle(req).await) })
    }
}

/// Process a request through the gateway pipeline.
async fn process_request<H, B>(
    req: http::Request<B>,
    handler: &H,
    router: &BlockRouter,
    config: &BlockHttpConfig,
    request_id: &str,
) -> http::Response<BlockResponseBody>
where
    H: BlockHandler,
    B: http_body::Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    let uri = req.uri().clone();
    debug!(%method, %uri, request_id, "processing gateway request");

    if is_health_check(&method, uri.path()) {
        return health_check_response();
    }

    if method == http::Method::OPTIONS {
        return cors_preflight_response();
    }

    let ctx = match router.resolve(&req) {
        Ok(ctx) => ctx,
        Err(err) => {
            warn!(%method, %uri, error = %err, request_id, "failed to route gateway request");
            return error_to_response(&err, request_id);
        }
    };

    info!(
        operation = %ctx.operation,
        bucket = ?ctx.bucket,
        key = ?ctx.key,
        request_id,
        "routed gateway request"
    );

    let (parts, body) = req.into_parts();
    let body = match collect_body(body, config.max_body_size).await {
        Ok(body) => body,
        Err(err) => {
            if err.code == BlockErrorCode::EntityTooLarge {
                warn!(limit = config.max_body_size, request_id, "request body too large");
            } else {
                error!(error = %err, request_id, "failed to collect request body");
            }
            return error_to_response(&err, request_id);
        }
    };

    match dispatch_operation(handler, parts, body, ctx).await {
        Ok(response) => response,
        Err(err) => {
            match std::error::Error::source(&err) {
                Some(source) => {
                    error!(error = %err, source = %source, request_id, "gateway operation failed");
                }
                None => debug!(error = %err, request_id, "gateway operation returned error"),
            }
            error_to_response(&err, request_id)
        }
    }
}

/// Collect a request body, rejecting bodies longer than `limit`.
async fn collect_body<B>(body: B, limit: usize) -> Result<Bytes, BlockError>
where
    B: http_body::Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
            Err(BlockError::with_message(
                BlockErrorCode::EntityTooLarge,
                format!("request body exceeds the maximum of {limit} bytes"),
            ))
        }
        Err(err) => Err(BlockError::internal_error(format!(
            "failed to read request body: {err}"
        ))),
    }
}

fn is_health_check(method: &http::Method, path: &str) -> bool {
    *method == http::Method::GET && (path == "/health" || path == "/_health")
}

fn health_check_response() -> http::Response<BlockResponseBody> {
    let mut resp = http::Response::new(BlockResponseBody::from_string(
        r#"{"status":"running","service":"block"}"#,
    ));
    resp.headers_mut().insert(
        http::header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    resp
}

fn cors_preflight_response() -> http::Response<BlockResponseBody> {
    let mut resp = http::Response::new(BlockResponseBody::empty());
    let headers = resp.headers_mut();
    headers.insert("Access-Control-Allow-Origin", HeaderValue::from_static("*"));
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static("GET, PUT, POST, DELETE, HEAD, OPTIONS"),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static("*, Content-Type"),
    );
    headers.insert("Access-Control-Max-Age", HeaderValue::from_static("86400"));
    resp
}

/// Add the headers every gateway response carries.
fn add_common_headers(
    mut response: http::Response<BlockResponseBody>,
    request_id: &str,
) -> http::Response<BlockResponseBody> {
    let headers = response.headers_mut();

    if let Ok(hv) = HeaderValue::from_str(request_id) {
        headers.insert("x-amz-request-id", hv);
    }
    headers.insert("Server", HeaderValue::from_static("RustStackBlock"));
    headers.insert("Access-Control-Allow-Origin", HeaderValue::from_static("*"));
    headers.insert(
        "Access-Control-Expose-Headers",
        HeaderValue::from_static("x-amz-request-id, Location"),
    );

    response
}
