//! HTTP request to typed input deserialization.
//!
//! [`FromBlockRequest`] builds an operation's input struct from the request
//! parts, the [`RoutingContext`] and the collected body. Numeric path and
//! query values are validated here; a malformed value is rejected with
//! `InvalidArgument` rather than silently defaulted.

use bytes::Bytes;
use ruststack_block_model::BlockError;
use ruststack_block_model::input::{
    AllocateMetadataInput, CreateBucketInput, DeleteBucketInput, GetCapacityInput,
    GetObjectInput, HeadBucketInput, ListBucketsInput, ListNamespacesInput, PutObjectInput,
};

use crate::multipart;
use crate::router::RoutingContext;

/// Trait for building an operation input from an HTTP request.
pub trait FromBlockRequest: Sized {
    /// Build the input from request parts, routing context and body.
    ///
    /// # Errors
    ///
    /// Returns a `BlockError` if a required value is missing or malformed.
    fn from_block_request(
        parts: &http::request::Parts,
        ctx: &RoutingContext,
        body: Bytes,
    ) -> Result<Self, BlockError>;
}

fn require_bucket(ctx: &RoutingContext) -> Result<String, BlockError> {
    ctx.bucket
        .clone()
        .ok_or_else(|| BlockError::invalid_request("missing bucket name"))
}

fn require_key(ctx: &RoutingContext) -> Result<String, BlockError> {
    ctx.key
        .clone()
        .ok_or_else(|| BlockError::invalid_request("missing object key"))
}

/// Parse a signed integer parameter.
fn parse_i64(name: &str, value: &str) -> Result<i64, BlockError> {
    value.trim().parse::<i64>().map_err(|e| {
        BlockError::invalid_argument(format!("invalid {name} '{value}': {e}")).with_resource(name)
    })
}

/// Parse an optional integer query parameter.
fn query_i64(ctx: &RoutingContext, name: &str) -> Result<Option<i64>, BlockError> {
    ctx.query_value(name)
        .map(|value| parse_i64(name, value))
        .transpose()
}

/// Object payload: the `file` field of a form upload, or the raw body.
fn object_payload(parts: &http::request::Parts, body: Bytes) -> Result<Bytes, BlockError> {
    let boundary = parts
        .headers
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(multipart::form_data_boundary);

    match boundary {
        Some(boundary) => multipart::extract_file(&body, &boundary),
        None => Ok(body),
    }
}

impl FromBlockRequest for CreateBucketInput {
    fn from_block_request(
        _parts: &http::request::Parts,
        ctx: &RoutingContext,
        _body: Bytes,
    ) -> Result<Self, BlockError> {
        Ok(Self {
            bucket: require_bucket(ctx)?,
        })
    }
}

impl FromBlockRequest for DeleteBucketInput {
    fn from_block_request(
        _parts: &http::request::Parts,
        ctx: &RoutingContext,
        _body: Bytes,
    ) -> Result<Self, BlockError> {
        Ok(Self {
            bucket: require_bucket(ctx)?,
        })
    }
}

impl FromBlockRequest for HeadBucketInput {
    fn from_block_request(
        _parts: &http::request::Parts,
        ctx: &RoutingContext,
        _body: Bytes,
    ) -> Result<Self, BlockError> {
        Ok(Self {
            bucket: require_bucket(ctx)?,
        })
    }
}

impl FromBlockRequest for ListBucketsInput {
    fn from_block_request(
        _parts: &http::request::Parts,
        _ctx: &RoutingContext,
        _body: Bytes,
    ) -> Result<Self, BlockError> {
        Ok(Self)
    }
}

impl FromBlockRequest for PutObjectInput {
    fn from_block_request(
        parts: &http::request::Parts,
        ctx: &RoutingContext,
        body: Bytes,
    ) -> Result<Self, BlockError> {
        Ok(Self {
            bucket: require_bucket(ctx)?,
            key: require_key(ctx)?,
            offset: query_i64(ctx, "offset")?.unwrap_or(0),
            body: object_payload(parts, body)?,
            location: parts.uri.path().to_owned(),
        })
    }
}

impl FromBlockRequest for GetObjectInput {
    fn from_block_request(
        _parts: &http::request::Parts,
        ctx: &RoutingContext,
        _body: Bytes,
    ) -> Result<Self, BlockError> {
        Ok(Self {
            bucket: require_bucket(ctx)?,
            key: require_key(ctx)?,
            offset: query_i64(ctx, "offset")?.unwrap_or(0),
            length: query_i64(ctx, "length")?,
        })
    }
}

impl FromBlockRequest for AllocateMetadataInput {
    fn from_block_request(
        _parts: &http::request::Parts,
        ctx: &RoutingContext,
        _body: Bytes,
    ) -> Result<Self, BlockError> {
        let raw = ctx
            .size
            .as_deref()
            .ok_or_else(|| BlockError::invalid_request("missing allocation size"))?;
        Ok(Self {
            size: parse_i64("size", raw)?,
        })
    }
}

impl FromBlockRequest for GetCapacityInput {
    fn from_block_request(
        _parts: &http::request::Parts,
        _ctx: &RoutingContext,
        _body: Bytes,
    ) -> Result<Self, BlockError> {
        Ok(Self)
    }
}

impl FromBlockRequest for ListNamespacesInput {
    fn from_block_request(
        _parts: &http::request::Parts,
        _ctx: &RoutingContext,
        _body: Bytes,
    ) -> Result<Self, BlockError> {
        Ok(Self)
    }
}
