//! Gateway operation handler for [`RustStackBlock`].
//!
//! Bridges the HTTP layer (`ruststack-block-http`) and the business logic
//! (`ruststack-block-core`) by implementing [`BlockHandler`]. Each operation
//! is deserialized via [`FromBlockRequest`], run on the matching `handle_*`
//! method, and serialized via [`IntoBlockResponse`].

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use ruststack_block_core::RustStackBlock;
use ruststack_block_http::body::BlockResponseBody;
use ruststack_block_http::dispatch::BlockHandler;
use ruststack_block_http::request::FromBlockRequest;
use ruststack_block_http::response::IntoBlockResponse;
use ruststack_block_http::router::RoutingContext;
use ruststack_block_model::{BlockError, BlockOperation};

/// Implements [`BlockHandler`] by delegating to [`RustStackBlock`].
#[derive(Debug, Clone)]
pub struct BlockStoreHandler(pub RustStackBlock);

impl BlockHandler for BlockStoreHandler {
    fn handle_operation(
        &self,
        op: BlockOperation,
        parts: http::request::Parts,
        body: Bytes,
        ctx: RoutingContext,
    ) -> Pin<Box<dyn Future<Output = Result<http::Response<BlockResponseBody>, BlockError>> + Send>>
    {
        let provider = self.0.clone();
        Box::pin(async move {
            match op {
                BlockOperation::CreateBucket => {
                    dispatch_output(&parts, &ctx, body, |input| {
                        provider.handle_create_bucket(input)
                    })
                    .await
                }
                BlockOperation::DeleteBucket => {
                    dispatch_output(&parts, &ctx, body, |input| {
                        provider.handle_delete_bucket(input)
                    })
                    .await
                }
                BlockOperation::HeadBucket => {
                    dispatch_output(&parts, &ctx, body, |input| {
                        provider.handle_head_bucket(input)
                    })
                    .await
                }
                BlockOperation::ListBuckets => {
                    dispatch_output(&parts, &ctx, body, |input| {
                        provider.handle_list_buckets(input)
                    })
                    .await
                }
                BlockOperation::PutObject => {
                    dispatch_output(&parts, &ctx, body, |input| {
                        provider.handle_put_object(input)
                    })
                    .await
                }
                BlockOperation::GetObject => {
                    dispatch_output(&parts, &ctx, body, |input| {
                        provider.handle_get_object(input)
                    })
                    .await
                }
                BlockOperation::AllocateMetadata => {
                    dispatch_output(&parts, &ctx, body, |input| {
                        provider.handle_allocate_metadata(input)
                    })
                    .await
                }
                BlockOperation::GetCapacity => {
                    dispatch_output(&parts, &ctx, body, |input| {
                        provider.handle_get_capacity(input)
                    })
                    .await
                }
                BlockOperation::ListNamespaces => {
                    dispatch_output(&parts, &ctx, body, |input| {
                        provider.handle_list_namespaces(input)
                    })
                    .await
                }
            }
        })
    }
}

/// Deserialize the input, run the operation, serialize the output.
async fn dispatch_output<I, O, F, Fut>(
    parts: &http::request::Parts,
    ctx: &RoutingContext,
    body: Bytes,
    handler_fn: F,
) -> Result<http::Response<BlockResponseBody>, BlockError>
where
    I: FromBlockRequest,
    O: IntoBlockResponse,
    F: FnOnce(I) -> Fut,
    Fut: Future<Output = Result<O, BlockError>>,
{
    let input = I::from_block_request(parts, ctx, body)?;
    let output = handler_fn(input).await?;
    output.into_block_response()
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;
    use ruststack_block_core::BlockConfig;
    use ruststack_block_http::router::BlockRouter;
    use ruststack_block_model::BlockErrorCode;

    use super::*;

    fn handler() -> BlockStoreHandler {
        let config = BlockConfig::builder().capacity(64 * 1024).build();
        BlockStoreHandler(RustStackBlock::new(config).expect("valid capacity"))
    }

    async fn call(
        handler: &BlockStoreHandler,
        method: http::Method,
        uri: &str,
        body: &'static [u8],
    ) -> Result<http::Response<BlockResponseBody>, BlockError> {
        let req = http::Request::builder()
            .method(method)
            .uri(uri)
            .body(())
            .expect("valid request");
        let ctx = BlockRouter::new().resolve(&req).expect("routes");
        let (parts, ()) = req.into_parts();
        handler
            .handle_operation(ctx.operation, parts, Bytes::from_static(body), ctx)
            .await
    }

    async fn body_bytes(resp: http::Response<BlockResponseBody>) -> Bytes {
        resp.into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes()
    }

    #[tokio::test]
    async fn test_should_create_put_and_get_object() {
        let handler = handler();

        let resp = call(&handler, http::Method::POST, "/bucket/alpha", b"")
            .await
            .expect("create bucket");
        assert_eq!(resp.status(), http::StatusCode::OK);
        assert_eq!(
            resp.headers().get("Location").and_then(|v| v.to_str().ok()),
            Some("/bucket/alpha")
        );

        let resp = call(&handler, http::Method::PUT, "/bucket/alpha/object/k", b"hello")
            .await
            .expect("put object");
        let xml = body_bytes(resp).await;
        assert!(String::from_utf8_lossy(&xml).contains("<Size>5</Size>"));

        let resp = call(
            &handler,
            http::Method::GET,
            "/bucket/alpha/object/k?length=5",
            b"",
        )
        .await
        .expect("get object");
        assert_eq!(&body_bytes(resp).await[..], b"hello");
    }

    #[tokio::test]
    async fn test_should_delete_bucket_with_no_content() {
        let handler = handler();
        call(&handler, http::Method::POST, "/bucket/alpha", b"")
            .await
            .expect("create bucket");

        let resp = call(&handler, http::Method::DELETE, "/bucket/alpha", b"")
            .await
            .expect("delete bucket");
        assert_eq!(resp.status(), http::StatusCode::NO_CONTENT);

        let err = call(&handler, http::Method::HEAD, "/bucket/alpha", b"")
            .await
            .expect_err("bucket is gone");
        assert_eq!(err.code, BlockErrorCode::NoSuchBucket);
    }

    #[tokio::test]
    async fn test_should_report_capacity_after_allocation() {
        let handler = handler();
        call(&handler, http::Method::POST, "/allocate-metadata/1000", b"")
            .await
            .expect("allocate");

        let resp = call(&handler, http::Method::GET, "/capacity", b"")
            .await
            .expect("capacity");
        let xml = body_bytes(resp).await;
        let xml = String::from_utf8_lossy(&xml);
        assert!(xml.contains("<Allocated>1000</Allocated>"));
        assert!(xml.contains("<TotalCapacity>65536</TotalCapacity>"));
    }

    #[tokio::test]
    async fn test_should_surface_input_errors() {
        let handler = handler();
        let err = call(
            &handler,
            http::Method::GET,
            "/bucket/alpha/object/k?length=many",
            b"",
        )
        .await
        .expect_err("bad length");
        assert_eq!(err.code, BlockErrorCode::InvalidArgument);
    }
}
