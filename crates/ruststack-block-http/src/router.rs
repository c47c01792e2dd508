//! Request routing.
//!
//! [`BlockRouter`] maps an HTTP method and path-style URI onto a
//! [`BlockOperation`]:
//!
//! | Path | Methods |
//! |------|---------|
//! | `/`, `/buckets` | `GET` ListBuckets |
//! | `/bucket/{bucket}` | `POST` CreateBucket, `DELETE` DeleteBucket, `HEAD` HeadBucket |
//! | `/bucket/{bucket}/object/{key...}` | `PUT` PutObject, `GET` GetObject |
//! | `/allocate-metadata/{size}` | `POST` AllocateMetadata |
//! | `/capacity` | `GET` GetCapacity |
//! | `/namespaces` | `GET` ListNamespaces |
//!
//! Everything after `/object/` is the key, so keys may contain `/`. Path
//! segments and query parameters are percent-decoded.

use http::Method;
use percent_encoding::percent_decode_str;
use ruststack_block_model::{BlockError, BlockOperation};

/// Routes requests to gateway operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockRouter;

/// The result of routing a request.
#[derive(Debug, Clone)]
pub struct RoutingContext {
    /// The identified operation.
    pub operation: BlockOperation,
    /// The decoded bucket name, if the path has one.
    pub bucket: Option<String>,
    /// The decoded object key, if the path has one.
    pub key: Option<String>,
    /// The raw `{size}` path segment of `/allocate-metadata/{size}`.
    pub size: Option<String>,
    /// Decoded query parameters in request order.
    pub query_params: Vec<(String, String)>,
}

impl RoutingContext {
    /// First value of the query parameter `name`.
    #[must_use]
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Path shapes the gateway serves, before method checks.
enum Resource {
    Root,
    Capacity,
    Namespaces,
    AllocateMetadata(String),
    Bucket(String),
    Object(String, String),
}

impl Resource {
    fn operation(&self, method: &Method) -> Option<BlockOperation> {
        let op = match self {
            Self::Root if *method == Method::GET => BlockOperation::ListBuckets,
            Self::Capacity if *method == Method::GET => BlockOperation::GetCapacity,
            Self::Namespaces if *method == Method::GET => BlockOperation::ListNamespaces,
            Self::AllocateMetadata(_) if *method == Method::POST => {
                BlockOperation::AllocateMetadata
            }
            Self::Bucket(_) if *method == Method::POST => BlockOperation::CreateBucket,
            Self::Bucket(_) if *method == Method::DELETE => BlockOperation::DeleteBucket,
            Self::Bucket(_) if *method == Method::HEAD => BlockOperation::HeadBucket,
            Self::Object(..) if *method == Method::PUT => BlockOperation::PutObject,
            Self::Object(..) if *method == Method::GET => BlockOperation::GetObject,
            _ => return None,
        };
        Some(op)
    }
}

impl BlockRouter {
    /// Create a new router.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Resolve a request to a routing context.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if the path matches no resource and
    /// `MethodNotAllowed` if the resource does not accept the method.
    pub fn resolve<B>(&self, req: &http::Request<B>) -> Result<RoutingContext, BlockError> {
        let method = req.method();
        let uri = req.uri();
        let path = uri.path();

        let resource = parse_path(path).ok_or_else(|| {
            BlockError::invalid_request(format!("no gateway resource at path {path}"))
                .with_resource(path)
        })?;

        let operation = resource
            .operation(method)
            .ok_or_else(|| BlockError::method_not_allowed(method.as_str()))?;

        let query_params = parse_query_params(uri.query().unwrap_or(""));
        let (bucket, key, size) = match resource {
            Resource::Root | Resource::Capacity | Resource::Namespaces => (None, None, None),
            Resource::AllocateMetadata(size) => (None, None, Some(size)),
            Resource::Bucket(bucket) => (Some(bucket), None, None),
            Resource::Object(bucket, key) => (Some(bucket), Some(key), None),
        };

        Ok(RoutingContext {
            operation,
            bucket,
            key,
            size,
            query_params,
        })
    }
}

fn parse_path(path: &str) -> Option<Resource> {
    match path {
        "" | "/" | "/buckets" | "/buckets/" => return Some(Resource::Root),
        "/capacity" => return Some(Resource::Capacity),
        "/namespaces" => return Some(Resource::Namespaces),
        _ => {}
    }

    if let Some(size) = path.strip_prefix("/allocate-metadata/") {
        return (!size.is_empty() && !size.contains('/'))
            .then(|| Resource::AllocateMetadata(decode_uri_component(size)));
    }

    let rest = path.strip_prefix("/bucket/")?;
    match rest.split_once('/') {
        None if !rest.is_empty() => Some(Resource::Bucket(decode_uri_component(rest))),
        None => None,
        Some((bucket, "")) if !bucket.is_empty() => {
            Some(Resource::Bucket(decode_uri_component(bucket)))
        }
        Some((bucket, tail)) => {
            let key = tail.strip_prefix("object/")?;
            (!bucket.is_empty() && !key.is_empty()).then(|| {
                Resource::Object(decode_uri_component(bucket), decode_uri_component(key))
            })
        }
    }
}

/// Decode a percent-encoded URI component.
fn decode_uri_component(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}

/// Parse a query string into decoded key-value pairs.
fn parse_query_params(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|s| !s.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (decode_query_component(k), decode_query_component(v)),
            None => (decode_query_component(pair), String::new()),
        })
        .collect()
}

/// Decode a query component, treating `+` as a space.
fn decode_query_component(s: &str) -> String {
    decode_uri_component(&s.replace('+', " "))
}
