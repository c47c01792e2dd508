//! Output struct to HTTP response serialization.
//!
//! Response categories:
//! - **Header-only**: `CreateBucket` (Location header), `DeleteBucket` (204),
//!   `HeadBucket`.
//! - **XML body**: listings, `PutObject` and ledger reports.
//! - **Raw body**: `GetObject` returns the requested object bytes.

use bytes::Bytes;
use http::StatusCode;
use http::header::{CONTENT_TYPE, HeaderValue, LOCATION};
use ruststack_block_model::BlockError;
use ruststack_block_model::output::{
    AllocateMetadataOutput, CapacityOutput, CreateBucketOutput, DeleteBucketOutput,
    GetObjectOutput, HeadBucketOutput, ListBucketsOutput, ListNamespacesOutput, PutObjectOutput,
};
use ruststack_block_xml::{BlockSerialize, to_xml};

use crate::body::BlockResponseBody;

const APPLICATION_XML: &str = "application/xml";
const OCTET_STREAM: &str = "application/octet-stream";

/// Trait for converting an operation output into an HTTP response.
pub trait IntoBlockResponse {
    /// Convert this output into an HTTP response.
    ///
    /// # Errors
    ///
    /// Returns a `BlockError` if the body cannot be serialized or a header
    /// value is invalid.
    fn into_block_response(self) -> Result<http::Response<BlockResponseBody>, BlockError>;
}

fn response(status: StatusCode, body: BlockResponseBody) -> http::Response<BlockResponseBody> {
    let mut resp = http::Response::new(body);
    *resp.status_mut() = status;
    resp
}

fn with_content_type(
    mut resp: http::Response<BlockResponseBody>,
    content_type: &'static str,
) -> http::Response<BlockResponseBody> {
    resp.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    resp
}

/// Serialize `value` under `root` and wrap it in a 200 XML response.
fn xml_response<T: BlockSerialize>(
    root: &str,
    value: &T,
) -> Result<http::Response<BlockResponseBody>, BlockError> {
    let xml = to_xml(root, value).map_err(|e| {
        BlockError::internal_error(format!("failed to serialize {root}: {e}"))
    })?;
    Ok(with_content_type(
        response(StatusCode::OK, BlockResponseBody::from_bytes(xml)),
        APPLICATION_XML,
    ))
}

impl IntoBlockResponse for CreateBucketOutput {
    fn into_block_response(self) -> Result<http::Response<BlockResponseBody>, BlockError> {
        let mut resp = response(StatusCode::OK, BlockResponseBody::empty());
        if let Some(location) = self.location {
            let value = HeaderValue::from_str(&location).map_err(|e| {
                BlockError::internal_error(format!("invalid Location header: {e}"))
            })?;
            resp.headers_mut().insert(LOCATION, value);
        }
        Ok(resp)
    }
}

impl IntoBlockResponse for DeleteBucketOutput {
    fn into_block_response(self) -> Result<http::Response<BlockResponseBody>, BlockError> {
        Ok(response(StatusCode::NO_CONTENT, BlockResponseBody::empty()))
    }
}

impl IntoBlockResponse for HeadBucketOutput {
    fn into_block_response(self) -> Result<http::Response<BlockResponseBody>, BlockError> {
        Ok(response(StatusCode::OK, BlockResponseBody::empty()))
    }
}

impl IntoBlockResponse for ListBucketsOutput {
    fn into_block_response(self) -> Result<http::Response<BlockResponseBody>, BlockError> {
        xml_response("ListAllMyBucketsResult", &self)
    }
}

impl IntoBlockResponse for PutObjectOutput {
    fn into_block_response(self) -> Result<http::Response<BlockResponseBody>, BlockError> {
        xml_response("PutObjectResult", &self)
    }
}

impl IntoBlockResponse for GetObjectOutput {
    fn into_block_response(self) -> Result<http::Response<BlockResponseBody>, BlockError> {
        Ok(with_content_type(
            response(StatusCode::OK, BlockResponseBody::from_bytes(self.body)),
            OCTET_STREAM,
        ))
    }
}

impl IntoBlockResponse for CapacityOutput {
    fn into_block_response(self) -> Result<http::Response<BlockResponseBody>, BlockError> {
        xml_response("CapacityResult", &self)
    }
}

impl IntoBlockResponse for AllocateMetadataOutput {
    fn into_block_response(self) -> Result<http::Response<BlockResponseBody>, BlockError> {
        xml_response("AllocateMetadataResult", &self)
    }
}

impl IntoBlockResponse for ListNamespacesOutput {
    fn into_block_response(self) -> Result<http::Response<BlockResponseBody>, BlockError> {
        xml_response("ListNamespacesResult", &self)
    }
}

/// Convert a `BlockError` into an XML error response.
#[must_use]
pub fn error_to_response(err: &BlockError, request_id: &str) -> http::Response<BlockResponseBody> {
    let xml = ruststack_block_xml::error_to_xml(
        err.code.as_str(),
        &err.message,
        err.resource.as_deref(),
        request_id,
    );
    with_content_type(
        response(err.status_code, BlockResponseBody::from_bytes(Bytes::from(xml))),
        APPLICATION_XML,
    )
}
