//! Operation dispatch: hands a routed request to the business logic handler.
//!
//! [`BlockHandler`] is the boundary between the HTTP layer and the storage
//! provider. The handler deserializes the request into the operation's
//! input (via [`FromBlockRequest`](crate::request::FromBlockRequest)), runs
//! the operation, and serializes the output (via
//! [`IntoBlockResponse`](crate::response::IntoBlockResponse)).

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use ruststack_block_model::{BlockError, BlockOperation};

use crate::body::BlockResponseBody;
use crate::router::RoutingContext;

/// Trait that the business logic provider must implement.
///
/// Returns a boxed future so the service can hold any handler behind an
/// `Arc` without `async-trait`.
pub trait BlockHandler: Send + Sync + 'static {
    /// Handle a gateway operation and produce an HTTP response.
    fn handle_operation(
        &self,
        op: BlockOperation,
        parts: http::request::Parts,
        body: Bytes,
        ctx: RoutingContext,
    ) -> Pin<Box<dyn Future<Output = Result<http::Response<BlockResponseBody>, BlockError>> + Send>>;
}

/// Dispatch a routed request to the handler.
pub async fn dispatch_operation<H: BlockHandler>(
    handler: &H,
    parts: http::request::Parts,
    body: Bytes,
    ctx: RoutingContext,
) -> Result<http::Response<BlockResponseBody>, BlockError> {
    let op = ctx.operation;
    tracing::debug!(operation = %op, bucket = ?ctx.bucket, key = ?ctx.key, "dispatching block operation");
    handler.handle_operation(op, parts, body, ctx).await
}

/// A handler that returns `NotImplemented` for every operation.
///
/// Useful for testing routing and request parsing in isolation.
#[derive(Debug, Clone, Default)]
pub struct NotImplementedHandler;

impl BlockHandler for NotImplementedHandler {
    fn handle_operation(
        &self,
        op: BlockOperation,
        _parts: http::request::Parts,
        _body: Bytes,
        _ctx: RoutingContext,
    ) -> Pin<Box<dyn Future<Output = Result<http::Response<BlockResponseBody>, BlockError>> + Send>>
    {
        Box::pin(async move { Err(BlockError::not_implemented(op.as_str())) })
    }
}
