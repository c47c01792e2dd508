//! Engine and gateway error types.
//!
//! [`BlockStoreError`] covers every failure the block storage engine and the
//! bucket registry can produce. None of them are transient: retrying the same
//! request without changing it (freeing capacity, fixing offsets) cannot
//! succeed. Conversion into the wire-level [`BlockError`] attaches the code
//! and HTTP status the gateway reports.
//!
//! ```
//! use ruststack_block_core::error::BlockStoreError;
//! use ruststack_block_model::BlockErrorCode;
//!
//! let err = BlockStoreError::NoSuchBucket {
//!     bucket: "photos".to_owned(),
//! };
//! let wire = err.into_block_error();
//! assert_eq!(wire.code, BlockErrorCode::NoSuchBucket);
//! ```

use ruststack_block_model::{BlockError, BlockErrorCode};

/// Block storage error type.
#[derive(Debug, thiserror::Error)]
pub enum BlockStoreError {
    /// An operation was attempted before a successful `connect`.
    #[error("block storage is not connected")]
    NotConnected,

    /// `connect` was called with a non-positive capacity.
    #[error("invalid capacity: {capacity} (must be positive)")]
    InvalidCapacity {
        /// The rejected capacity.
        capacity: i64,
    },

    /// An allocation was non-positive or would exceed the total capacity.
    #[error(
        "invalid size for storage allocation: {size} bytes requested, \
         {allocated} of {total_capacity} bytes allocated"
    )]
    InvalidAllocation {
        /// The requested size.
        size: i64,
        /// Bytes already allocated.
        allocated: i64,
        /// Total capacity of the ledger.
        total_capacity: i64,
    },

    /// A write fell outside the key's backing buffer.
    #[error(
        "write of {length} bytes at offset {offset} exceeds backing buffer \
         of {capacity} bytes for {bucket}/{key}"
    )]
    WriteOutOfRange {
        /// Namespace of the write.
        bucket: String,
        /// Key of the write.
        key: String,
        /// Requested offset.
        offset: i64,
        /// Number of bytes to write.
        length: usize,
        /// Length of the backing buffer.
        capacity: usize,
    },

    /// A read fell outside the key's backing buffer.
    #[error(
        "read of {length} bytes at offset {offset} exceeds backing buffer \
         of {capacity} bytes for {bucket}/{key}"
    )]
    ReadOutOfRange {
        /// Namespace of the read.
        bucket: String,
        /// Key of the read.
        key: String,
        /// Requested offset.
        offset: i64,
        /// Requested length.
        length: i64,
        /// Length of the backing buffer.
        capacity: usize,
    },

    /// The namespace was never referenced, or the bucket is not registered.
    #[error("bucket does not exist: {bucket}")]
    NoSuchBucket {
        /// The bucket name that was not found.
        bucket: String,
    },

    /// The key was never written within its namespace.
    #[error("object does not exist: {bucket}/{key}")]
    NoSuchKey {
        /// The namespace that was searched.
        bucket: String,
        /// The key that was not found.
        key: String,
    },

    /// The allocator could not provide a new backing buffer.
    #[error("cannot allocate backing buffer of {capacity} bytes for {bucket}/{key}")]
    BufferAllocation {
        /// Namespace of the write.
        bucket: String,
        /// Key of the write.
        key: String,
        /// Requested buffer length.
        capacity: usize,
    },

    /// A bucket with this name is already registered.
    #[error("bucket already exists: {bucket}")]
    BucketAlreadyExists {
        /// The bucket name that already exists.
        bucket: String,
    },

    /// A metadata record could not be encoded.
    #[error("failed to encode metadata record: {0}")]
    MetadataEncoding(#[from] std::io::Error),
}

impl BlockStoreError {
    /// Convert this error into a wire-level [`BlockError`].
    #[must_use]
    pub fn into_block_error(self) -> BlockError {
        BlockError::from(self)
    }
}

impl From<BlockStoreError> for BlockError {
    fn from(err: BlockStoreError) -> Self {
        let message = err.to_string();
        let code = error_code(&err);
        match err {
            BlockStoreError::NoSuchKey { key, .. } => BlockError::no_such_key(key),
            BlockStoreError::MetadataEncoding(source) => {
                BlockError::with_message(code, message).with_source(source)
            }
            BlockStoreError::NoSuchBucket { bucket }
            | BlockStoreError::BucketAlreadyExists { bucket } => {
                BlockError::with_message(code, message).with_resource(bucket)
            }
            BlockStoreError::WriteOutOfRange { key, .. }
            | BlockStoreError::BufferAllocation { key, .. }
            | BlockStoreError::ReadOutOfRange { key, .. } => {
                BlockError::with_message(code, message).with_resource(key)
            }
            BlockStoreError::NotConnected
            | BlockStoreError::InvalidCapacity { .. }
            | BlockStoreError::InvalidAllocation { .. } => BlockError::with_message(code, message),
        }
    }
}

/// Map a [`BlockStoreError`] variant to the corresponding [`BlockErrorCode`].
fn error_code(err: &BlockStoreError) -> BlockErrorCode {
    match err {
        BlockStoreError::NotConnected | BlockStoreError::MetadataEncoding(_) => {
            BlockErrorCode::InternalError
        }
        BlockStoreError::InvalidCapacity { .. } => BlockErrorCode::InvalidArgument,
        BlockStoreError::InvalidAllocation { .. } | BlockStoreError::BufferAllocation { .. } => {
            BlockErrorCode::InsufficientCapacity
        }
        BlockStoreError::WriteOutOfRange { .. } => BlockErrorCode::EntityTooLarge,
        BlockStoreError::ReadOutOfRange { .. } => BlockErrorCode::InvalidRange,
        BlockStoreError::NoSuchBucket { .. } => BlockErrorCode::NoSuchBucket,
        BlockStoreError::NoSuchKey { .. } => BlockErrorCode::NoSuchKey,
        BlockStoreError::BucketAlreadyExists { .. } => BlockErrorCode::BucketAlreadyExists,
    }
}
