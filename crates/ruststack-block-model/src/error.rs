//! Wire-level error type for the block gateway.
//!
//! [`BlockError`] carries everything the HTTP layer needs to render an
//! `<Error>` document: a [`BlockErrorCode`], a message, an optional resource,
//! and the HTTP status derived from the code.

use std::fmt;

/// Error codes the gateway can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockErrorCode {
    /// A bucket with this name is already registered.
    BucketAlreadyExists,
    /// The request body exceeds the limit, or a write exceeds its backing buffer.
    EntityTooLarge,
    /// The capacity ledger cannot satisfy an allocation.
    InsufficientCapacity,
    /// Unexpected server-side failure.
    InternalError,
    /// A parameter could not be parsed or is out of its domain.
    InvalidArgument,
    /// The requested read window lies outside the backing buffer.
    InvalidRange,
    /// The request does not map to any operation.
    InvalidRequest,
    /// The HTTP method is not allowed on this resource.
    MethodNotAllowed,
    /// The bucket is not registered.
    NoSuchBucket,
    /// The key was never written.
    NoSuchKey,
    /// The operation is not implemented by the handler.
    NotImplemented,
}

impl BlockErrorCode {
    /// Returns the error code as a string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BucketAlreadyExists => "BucketAlreadyExists",
            Self::EntityTooLarge => "EntityTooLarge",
            Self::InsufficientCapacity => "InsufficientCapacity",
            Self::InternalError => "InternalError",
            Self::InvalidArgument => "InvalidArgument",
            Self::InvalidRange => "InvalidRange",
            Self::InvalidRequest => "InvalidRequest",
            Self::MethodNotAllowed => "MethodNotAllowed",
            Self::NoSuchBucket => "NoSuchBucket",
            Self::NoSuchKey => "NoSuchKey",
            Self::NotImplemented => "NotImplemented",
        }
    }

    /// Returns the default HTTP status code for this error.
    #[must_use]
    pub fn default_status_code(&self) -> http::StatusCode {
        match self {
            Self::EntityTooLarge | Self::InvalidArgument | Self::InvalidRequest => {
                http::StatusCode::BAD_REQUEST
            }
            Self::NoSuchBucket | Self::NoSuchKey => http::StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => http::StatusCode::METHOD_NOT_ALLOWED,
            Self::BucketAlreadyExists => http::StatusCode::CONFLICT,
            Self::InvalidRange => http::StatusCode::RANGE_NOT_SATISFIABLE,
            Self::InsufficientCapacity => http::StatusCode::INSUFFICIENT_STORAGE,
            Self::InternalError => http::StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotImplemented => http::StatusCode::NOT_IMPLEMENTED,
        }
    }

    /// Returns the default message for this error.
    #[must_use]
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::BucketAlreadyExists => "The requested bucket already exists",
            Self::EntityTooLarge => "Your proposed upload exceeds the maximum allowed size",
            Self::InsufficientCapacity => "Not enough block storage capacity remains",
            Self::InternalError => "Internal server error",
            Self::InvalidArgument => "Invalid Argument",
            Self::InvalidRange => "The requested range cannot be satisfied",
            Self::InvalidRequest => "Invalid Request",
            Self::MethodNotAllowed => "The specified method is not allowed against this resource",
            Self::NoSuchBucket => "The specified bucket does not exist.",
            Self::NoSuchKey => "The specified key does not exist.",
            Self::NotImplemented => "The functionality is not implemented",
        }
    }
}

impl fmt::Display for BlockErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A gateway error response.
#[derive(Debug)]
pub struct BlockError {
    /// The error code.
    pub code: BlockErrorCode,
    /// A human-readable error message.
    pub message: String,
    /// The resource that caused the error.
    pub resource: Option<String>,
    /// The HTTP status code.
    pub status_code: http::StatusCode,
    /// The underlying source error, if any.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for BlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockError({}): {}", self.code, self.message)
    }
}

impl std::error::Error for BlockError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl BlockError {
    /// Create a new error from a code, using the code's default message.
    #[must_use]
    pub fn new(code: BlockErrorCode) -> Self {
        Self::with_message(code, code.default_message())
    }

    /// Create a new error with a custom message.
    #[must_use]
    pub fn with_message(code: BlockErrorCode, message: impl Into<String>) -> Self {
        Self {
            status_code: code.default_status_code(),
            message: message.into(),
            code,
            resource: None,
            source: None,
        }
    }

    /// Set the resource that caused this error.
    #[must_use]
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Set the source error.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a NoSuchBucket error.
    #[must_use]
    pub fn no_such_bucket(bucket: impl Into<String>) -> Self {
        Self::new(BlockErrorCode::NoSuchBucket).with_resource(bucket)
    }

    /// Create a NoSuchKey error.
    #[must_use]
    pub fn no_such_key(key: impl Into<String>) -> Self {
        Self::new(BlockErrorCode::NoSuchKey).with_resource(key)
    }

    /// Create an InternalError error.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::with_message(BlockErrorCode::InternalError, message)
    }

    /// Create an InvalidArgument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::with_message(BlockErrorCode::InvalidArgument, message)
    }

    /// Create an InvalidRequest error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::with_message(BlockErrorCode::InvalidRequest, message)
    }

    /// Create a MethodNotAllowed error.
    #[must_use]
    pub fn method_not_allowed(method: impl Into<String>) -> Self {
        Self::new(BlockErrorCode::MethodNotAllowed).with_resource(method)
    }

    /// Create a NotImplemented error.
    #[must_use]
    pub fn not_implemented(detail: impl Into<String>) -> Self {
        Self::new(BlockErrorCode::NotImplemented).with_resource(detail)
    }
}
