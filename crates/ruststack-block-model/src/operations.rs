//! Supported gateway operations.

use std::fmt;

/// All operations the block gateway can route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockOperation {
    /// Register a bucket and write its metadata record.
    CreateBucket,
    /// Remove a bucket from the registry.
    DeleteBucket,
    /// Check whether a bucket is registered.
    HeadBucket,
    /// List all registered buckets.
    ListBuckets,
    /// Write object data at an offset.
    PutObject,
    /// Read an offset + length window of object data.
    GetObject,
    /// Explicitly allocate capacity from the ledger.
    AllocateMetadata,
    /// Report the capacity ledger.
    GetCapacity,
    /// List the namespaces present in the address space.
    ListNamespaces,
}

impl BlockOperation {
    /// Returns the operation name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateBucket => "CreateBucket",
            Self::DeleteBucket => "DeleteBucket",
            Self::HeadBucket => "HeadBucket",
            Self::ListBuckets => "ListBuckets",
            Self::PutObject => "PutObject",
            Self::GetObject => "GetObject",
            Self::AllocateMetadata => "AllocateMetadata",
            Self::GetCapacity => "GetCapacity",
            Self::ListNamespaces => "ListNamespaces",
        }
    }
}

impl fmt::Display for BlockOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
