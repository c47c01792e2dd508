//! Bucket operation handlers.
//!
//! Implements `create_bucket`, `delete_bucket`, `head_bucket` and
//! `list_buckets`.

use ruststack_block_model::BlockError;
use ruststack_block_model::input::{
    CreateBucketInput, DeleteBucketInput, HeadBucketInput, ListBucketsInput,
};
use ruststack_block_model::output::{
    BucketSummary, CreateBucketOutput, DeleteBucketOutput, HeadBucketOutput, ListBucketsOutput,
    Owner,
};
use tracing::{debug, info, warn};

use crate::config::BufferSizing;
use crate::error::BlockStoreError;
use crate::metadata::{BUCKET_NAMESPACE, bucket_record};
use crate::provider::RustStackBlock;

/// Owner reported in bucket listings.
const DEFAULT_OWNER_ID: &str = "ruststack";

// Handlers stay async so the HTTP bridge can treat every operation alike.
#[allow(clippy::unused_async)]
impl RustStackBlock {
    /// Register a bucket and write its metadata record.
    ///
    /// The registry insert is rolled back if the metadata allocation or write
    /// fails. The rollback only removes the entry this call inserted, so a
    /// concurrent delete and re-create of the same name is left intact.
    pub async fn handle_create_bucket(
        &self,
        input: CreateBucketInput,
    ) -> Result<CreateBucketOutput, BlockError> {
        let bucket = input.bucket;

        let registration = self
            .registry
            .register(&bucket)
            .map_err(BlockStoreError::into_block_error)?;

        if let Err(e) = self.write_bucket_record(&bucket) {
            warn!(bucket = %bucket, error = %e, "bucket metadata failed, rolling back");
            if !self.registry.release(&bucket, registration) {
                warn!(bucket = %bucket, "bucket was replaced before rollback, keeping it");
            }
            return Err(e.into_block_error());
        }

        info!(bucket = %bucket, "create_bucket completed");
        Ok(CreateBucketOutput {
            location: Some(format!("/bucket/{bucket}")),
        })
    }

    /// Remove a bucket from the registry.
    ///
    /// Object data, metadata records and allocated capacity are kept.
    pub async fn handle_delete_bucket(
        &self,
        input: DeleteBucketInput,
    ) -> Result<DeleteBucketOutput, BlockError> {
        self.registry
            .unregister(&input.bucket)
            .map_err(BlockStoreError::into_block_error)?;

        info!(bucket = %input.bucket, "delete_bucket completed");
        Ok(DeleteBucketOutput)
    }

    /// Check whether a bucket is registered.
    pub async fn handle_head_bucket(
        &self,
        input: HeadBucketInput,
    ) -> Result<HeadBucketOutput, BlockError> {
        if !self.registry.contains(&input.bucket) {
            return Err(BlockError::no_such_bucket(input.bucket));
        }
        Ok(HeadBucketOutput)
    }

    /// List registered buckets sorted by name.
    pub async fn handle_list_buckets(
        &self,
        _input: ListBucketsInput,
    ) -> Result<ListBucketsOutput, BlockError> {
        let buckets: Vec<BucketSummary> = self
            .registry
            .list()
            .into_iter()
            .map(|(name, creation_date)| BucketSummary {
                name,
                creation_date,
            })
            .collect();

        debug!(count = buckets.len(), "list_buckets completed");
        Ok(ListBucketsOutput {
            buckets,
            owner: Owner {
                id: DEFAULT_OWNER_ID.to_owned(),
            },
        })
    }

    /// Charge and write the metadata record of `bucket`.
    ///
    /// Under [`BufferSizing::Reserved`] a name whose record buffer already
    /// exists (a re-create after delete) is not charged again, since the
    /// engine skips reservations for backed keys.
    fn write_bucket_record(&self, bucket: &str) -> Result<(), BlockStoreError> {
        let size = self.config.bucket_metadata_size;
        match self.engine.sizing() {
            BufferSizing::RemainingCapacity => {
                self.engine.allocate_capacity(size, "bucket_metadata")?;
            }
            BufferSizing::Reserved => {
                self.engine
                    .reserve(BUCKET_NAMESPACE, bucket, size, "bucket_metadata")?;
            }
        }
        let record = bucket_record(bucket)?;
        self.engine.write(BUCKET_NAMESPACE, bucket, 0, &record)
    }
}
