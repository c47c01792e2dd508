//! Typed operation inputs.

use bytes::Bytes;

/// CreateBucket input.
#[derive(Debug, Clone, Default)]
pub struct CreateBucketInput {
    /// URI label: bucket name.
    pub bucket: String,
}

/// DeleteBucket input.
#[derive(Debug, Clone, Default)]
pub struct DeleteBucketInput {
    /// URI label: bucket name.
    pub bucket: String,
}

/// HeadBucket input.
#[derive(Debug, Clone, Default)]
pub struct HeadBucketInput {
    /// URI label: bucket name.
    pub bucket: String,
}

/// ListBuckets input.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListBucketsInput;

/// PutObject input.
#[derive(Debug, Clone, Default)]
pub struct PutObjectInput {
    /// URI label: bucket name.
    pub bucket: String,
    /// URI label: object key.
    pub key: String,
    /// Query `offset`; byte offset into the backing buffer.
    pub offset: i64,
    /// Object payload.
    pub body: Bytes,
    /// Request path, echoed back as the object location.
    pub location: String,
}

/// GetObject input.
#[derive(Debug, Clone, Default)]
pub struct GetObjectInput {
    /// URI label: bucket name.
    pub bucket: String,
    /// URI label: object key.
    pub key: String,
    /// Query `offset`.
    pub offset: i64,
    /// Query `length`. The provider's configured default applies when absent.
    pub length: Option<i64>,
}

/// AllocateMetadata input.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllocateMetadataInput {
    /// URI label: number of bytes to allocate.
    pub size: i64,
}

/// GetCapacity input.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetCapacityInput;

/// ListNamespaces input.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListNamespacesInput;
