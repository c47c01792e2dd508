//! Typed operation outputs.

use bytes::Bytes;
use chrono::{DateTime, Utc};

/// CreateBucket output.
#[derive(Debug, Clone, Default)]
pub struct CreateBucketOutput {
    /// HTTP header: `Location`.
    pub location: Option<String>,
}

/// DeleteBucket output.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteBucketOutput;

/// HeadBucket output.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadBucketOutput;

/// A registered bucket as reported by ListBuckets.
#[derive(Debug, Clone)]
pub struct BucketSummary {
    /// Bucket name.
    pub name: String,
    /// When the bucket was registered.
    pub creation_date: DateTime<Utc>,
}

/// Bucket owner reported by ListBuckets.
#[derive(Debug, Clone, Default)]
pub struct Owner {
    /// Owner ID.
    pub id: String,
}

/// ListBuckets output.
#[derive(Debug, Clone, Default)]
pub struct ListBucketsOutput {
    /// Registered buckets, sorted by name.
    pub buckets: Vec<BucketSummary>,
    /// Owner of all buckets.
    pub owner: Owner,
}

/// PutObject output.
#[derive(Debug, Clone, Default)]
pub struct PutObjectOutput {
    /// Request path of the written object.
    pub location: String,
    /// Number of payload bytes written.
    pub size: u64,
}

/// GetObject output.
#[derive(Debug, Clone, Default)]
pub struct GetObjectOutput {
    /// The requested byte window.
    pub body: Bytes,
}

/// Snapshot of the capacity ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CapacityOutput {
    /// Fixed total capacity in bytes.
    pub total_capacity: i64,
    /// Bytes allocated so far.
    pub allocated: i64,
    /// `total_capacity - allocated`.
    pub remaining: i64,
}

/// AllocateMetadata output.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllocateMetadataOutput {
    /// Bytes allocated by this call.
    pub size: i64,
    /// Ledger after the allocation.
    pub capacity: CapacityOutput,
}

/// A namespace present in the address space.
#[derive(Debug, Clone, Default)]
pub struct NamespaceSummary {
    /// Namespace name.
    pub name: String,
    /// Number of keys with a backing buffer.
    pub key_count: usize,
    /// Whether a bucket of the same name is registered.
    pub registered: bool,
}

/// ListNamespaces output.
#[derive(Debug, Clone, Default)]
pub struct ListNamespacesOutput {
    /// Namespaces, sorted by name.
    pub namespaces: Vec<NamespaceSummary>,
}
