//! Object operation handlers.
//!
//! Implements `put_object` and `get_object`. Objects are addressed in the
//! engine by `(bucket, key)`; each put also writes an object metadata record
//! into the `objects` namespace.

use ruststack_block_model::BlockError;
use ruststack_block_model::input::{GetObjectInput, PutObjectInput};
use ruststack_block_model::output::{GetObjectOutput, PutObjectOutput};
use tracing::debug;

use crate::config::BufferSizing;
use crate::error::BlockStoreError;
use crate::metadata::{OBJECT_NAMESPACE, object_record, object_record_key};
use crate::provider::RustStackBlock;

// Handlers stay async so the HTTP bridge can treat every operation alike.
#[allow(clippy::unused_async)]
impl RustStackBlock {
    /// Store an object payload at `offset` within the object's backing buffer.
    pub async fn handle_put_object(
        &self,
        input: PutObjectInput,
    ) -> Result<PutObjectOutput, BlockError> {
        let PutObjectInput {
            bucket,
            key,
            offset,
            body,
            location,
        } = input;

        if !self.registry.contains(&bucket) {
            return Err(BlockError::no_such_bucket(bucket));
        }

        self.store_object(&bucket, &key, offset, &body)
            .map_err(BlockStoreError::into_block_error)?;

        debug!(bucket = %bucket, key = %key, offset, size = body.len(), "put_object completed");
        Ok(PutObjectOutput {
            location,
            size: u64::try_from(body.len()).unwrap_or(u64::MAX),
        })
    }

    /// Read `length` bytes of an object starting at `offset`.
    ///
    /// A missing length falls back to the configured default read length.
    pub async fn handle_get_object(
        &self,
        input: GetObjectInput,
    ) -> Result<GetObjectOutput, BlockError> {
        let GetObjectInput {
            bucket,
            key,
            offset,
            length,
        } = input;

        if !self.registry.contains(&bucket) {
            return Err(BlockError::no_such_bucket(bucket));
        }

        let length = length.unwrap_or(self.config.default_read_length);
        let body = self
            .engine
            .read(&bucket, &key, offset, length)
            .map_err(|e| match e {
                // The bucket is registered but nothing was ever stored in it.
                BlockStoreError::NoSuchBucket { bucket } => BlockStoreError::NoSuchKey {
                    bucket,
                    key: key.clone(),
                },
                other => other,
            })
            .map_err(BlockStoreError::into_block_error)?;

        debug!(bucket = %bucket, key = %key, offset, length, "get_object completed");
        Ok(GetObjectOutput { body })
    }

    fn store_object(
        &self,
        bucket: &str,
        key: &str,
        offset: i64,
        body: &[u8],
    ) -> Result<(), BlockStoreError> {
        let record_key = object_record_key(bucket, key);
        let metadata_size = self.config.object_metadata_size;
        let sizing = self.engine.sizing();

        match sizing {
            BufferSizing::RemainingCapacity => {
                self.engine
                    .allocate_capacity(metadata_size, "object_metadata")?;
            }
            BufferSizing::Reserved => {
                self.engine
                    .reserve(OBJECT_NAMESPACE, &record_key, metadata_size, "object_metadata")?;
            }
        }
        let record = object_record(key, body.len())?;
        self.engine.write(OBJECT_NAMESPACE, &record_key, 0, &record)?;

        if sizing == BufferSizing::Reserved {
            let span = i64::try_from(body.len())
                .ok()
                .and_then(|len| offset.checked_add(len))
                .filter(|span| *span > 0);
            if let Some(span) = span {
                self.engine.reserve(bucket, key, span, "object_data")?;
            }
        }

        self.engine.write(bucket, key, offset, body)
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use ruststack_block_model::BlockErrorCode;
    use ruststack_block_model::input::CreateBucketInput;

    use crate::ops::test_support::provider;

    use super::*;

    async fn with_bucket(capacity: i64, sizing: BufferSizing, bucket: &str) -> RustStackBlock {
        let provider = provider(capacity, sizing);
        provider
            .handle_create_bucket(CreateBucketInput {
                bucket: bucket.to_owned(),
            })
            .await
            .expect("create bucket");
        provider
    }

    fn put(bucket: &str, key: &str, offset: i64, body: &'static [u8]) -> PutObjectInput {
        PutObjectInput {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
            offset,
            body: Bytes::from_static(body),
            location: format!("/bucket/{bucket}/object/{key}"),
        }
    }

    fn get(bucket: &str, key: &str, offset: i64, length: Option<i64>) -> GetObjectInput {
        GetObjectInput {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
            offset,
            length,
        }
    }

    #[tokio::test]
    async fn test_should_put_and_get_object() {
        let provider = with_bucket(8192, BufferSizing::RemainingCapacity, "alpha").await;
        let output = provider
            .handle_put_object(put("alpha", "docs/readme.txt", 0, b"hello"))
            .await
            .expect("put");
        assert_eq!(output.location, "/bucket/alpha/object/docs/readme.txt");
        assert_eq!(output.size, 5);

        let object = provider
            .handle_get_object(get("alpha", "docs/readme.txt", 0, Some(5)))
            .await
            .expect("get");
        assert_eq!(&object.body[..], b"hello");
    }

    #[tokio::test]
    async fn test_should_write_object_metadata_record() {
        let provider = with_bucket(8192, BufferSizing::RemainingCapacity, "alpha").await;
        provider
            .handle_put_object(put("alpha", "k", 0, b"abc"))
            .await
            .expect("put");

        let engine = provider.engine();
        assert_eq!(engine.ledger().expect("connected").allocated, 1024 + 512);
        let record = engine
            .read(OBJECT_NAMESPACE, "alpha/k", 0, 34)
            .expect("metadata record");
        assert_eq!(&record[..], b"<Object><Key>k</Key><Size>3</Size>");
    }

    #[tokio::test]
    async fn test_should_use_default_read_length() {
        let provider = with_bucket(8192, BufferSizing::RemainingCapacity, "alpha").await;
        provider
            .handle_put_object(put("alpha", "k", 0, b"abc"))
            .await
            .expect("put");

        let object = provider
            .handle_get_object(get("alpha", "k", 0, None))
            .await
            .expect("get");
        assert_eq!(object.body.len(), 1024);
        assert_eq!(&object.body[..3], b"abc");
        assert!(object.body[3..].iter().all(|b| *b == 0));
    }

    #[tokio::test]
    async fn test_should_write_at_offset() {
        let provider = with_bucket(8192, BufferSizing::RemainingCapacity, "alpha").await;
        provider
            .handle_put_object(put("alpha", "k", 0, b"aaaaaaaa"))
            .await
            .expect("put");
        provider
            .handle_put_object(put("alpha", "k", 4, b"bb"))
            .await
            .expect("put at offset");

        let object = provider
            .handle_get_object(get("alpha", "k", 0, Some(8)))
            .await
            .expect("get");
        assert_eq!(&object.body[..], b"aaaabbaa");
    }

    #[tokio::test]
    async fn test_should_reject_put_to_unregistered_bucket() {
        let provider = provider(8192, BufferSizing::RemainingCapacity);
        let err = provider
            .handle_put_object(put("ghost", "k", 0, b"abc"))
            .await
            .expect_err("unregistered");
        assert_eq!(err.code, BlockErrorCode::NoSuchBucket);
        assert_eq!(provider.engine().ledger().expect("connected").allocated, 0);
    }

    #[tokio::test]
    async fn test_should_distinguish_missing_bucket_and_key_on_get() {
        let provider = with_bucket(8192, BufferSizing::RemainingCapacity, "alpha").await;

        let err = provider
            .handle_get_object(get("ghost", "k", 0, None))
            .await
            .expect_err("unregistered");
        assert_eq!(err.code, BlockErrorCode::NoSuchBucket);

        // Registered but empty bucket.
        let err = provider
            .handle_get_object(get("alpha", "k", 0, None))
            .await
            .expect_err("empty bucket");
        assert_eq!(err.code, BlockErrorCode::NoSuchKey);

        provider
            .handle_put_object(put("alpha", "k", 0, b"abc"))
            .await
            .expect("put");
        let err = provider
            .handle_get_object(get("alpha", "other", 0, None))
            .await
            .expect_err("missing key");
        assert_eq!(err.code, BlockErrorCode::NoSuchKey);
        assert_eq!(err.status_code.as_u16(), 404);
    }

    #[tokio::test]
    async fn test_should_report_invalid_range() {
        let provider = with_bucket(8192, BufferSizing::RemainingCapacity, "alpha").await;
        provider
            .handle_put_object(put("alpha", "k", 0, b"abc"))
            .await
            .expect("put");
        let err = provider
            .handle_get_object(get("alpha", "k", 1 << 20, Some(1)))
            .await
            .expect_err("past end");
        assert_eq!(err.code, BlockErrorCode::InvalidRange);
        assert_eq!(err.status_code.as_u16(), 416);
    }

    #[tokio::test]
    async fn test_should_reject_payload_exceeding_backing_buffer() {
        let provider = with_bucket(2048, BufferSizing::RemainingCapacity, "alpha").await;
        provider
            .handle_put_object(put("alpha", "k", 0, b"abc"))
            .await
            .expect("put");

        // 2048 - 1024 - 512 = 512 bytes of backing buffer.
        let err = provider
            .handle_put_object(put("alpha", "k", 511, b"xy"))
            .await
            .expect_err("past end");
        assert_eq!(err.code, BlockErrorCode::EntityTooLarge);
    }

    #[tokio::test]
    async fn test_should_reserve_payload_under_reserved_sizing() {
        let provider = with_bucket(8192, BufferSizing::Reserved, "alpha").await;
        let before = provider.engine().ledger().expect("connected").allocated;

        provider
            .handle_put_object(put("alpha", "k", 0, b"0123456789"))
            .await
            .expect("put");

        let engine = provider.engine();
        assert_eq!(
            engine.ledger().expect("connected").allocated - before,
            512 + 10
        );
        assert_eq!(engine.backing_len("alpha", "k").expect("connected"), Some(10));

        let object = provider
            .handle_get_object(get("alpha", "k", 0, Some(10)))
            .await
            .expect("get");
        assert_eq!(&object.body[..], b"0123456789");
    }
}
