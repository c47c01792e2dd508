//! Block storage engine.
//!
//! [`BlockStorage`] is the engine contract consumed by the gateway. The
//! in-memory implementation keeps a [`CapacityLedger`] and a two-level address
//! space (`namespace -> key -> backing buffer`) behind a single mutex, so every
//! check-and-mutate sequence runs in one critical section.
//!
//! A key's backing buffer is created on its first successful write and is
//! never resized afterwards. Its length depends on the [`BufferSizing`] policy:
//!
//! - [`BufferSizing::RemainingCapacity`]: the unallocated capacity at the
//!   moment of the first write. Writing does not consume capacity.
//! - [`BufferSizing::Reserved`]: the capacity previously reserved for that
//!   key through [`BlockStorage::reserve`], or zero if none was.
//!
//! # Examples
//!
//! ```
//! use ruststack_block_core::storage::{BlockStorage, InMemoryBlockStorage};
//!
//! let engine = InMemoryBlockStorage::default();
//! engine.connect(1024).unwrap();
//! engine.write("buckets", "alpha", 0, b"0123456789").unwrap();
//!
//! let bytes = engine.read("buckets", "alpha", 0, 10).unwrap();
//! assert_eq!(&bytes[..], b"0123456789");
//! assert_eq!(engine.backing_len("buckets", "alpha").unwrap(), Some(1024));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

use bytes::Bytes;
use parking_lot::Mutex;

use crate::config::BufferSizing;
use crate::error::BlockStoreError;
use crate::ledger::{CapacityLedger, LedgerSnapshot};

/// A namespace in the engine's address space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceInfo {
    /// Namespace name.
    pub name: String,
    /// Number of keys with a backing buffer.
    pub key_count: usize,
}

/// Block storage engine contract.
///
/// Every method other than [`connect`](Self::connect) and
/// [`sizing`](Self::sizing) fails with [`BlockStoreError::NotConnected`]
/// until a connect has succeeded.
pub trait BlockStorage: Send + Sync + fmt::Debug {
    /// Initialize the engine with `capacity` bytes, discarding any prior
    /// ledger and address space.
    ///
    /// # Errors
    ///
    /// Returns [`BlockStoreError::InvalidCapacity`] if `capacity <= 0`; prior
    /// state is left untouched.
    fn connect(&self, capacity: i64) -> Result<(), BlockStoreError>;

    /// Allocate `size` bytes from the ledger. `purpose` is informational.
    ///
    /// # Errors
    ///
    /// Returns [`BlockStoreError::InvalidAllocation`] if `size <= 0` or the
    /// allocation would exceed the total capacity.
    fn allocate_capacity(&self, size: i64, purpose: &str) -> Result<(), BlockStoreError>;

    /// Allocate `size` bytes and record them as the reservation of
    /// `(bucket, key)`. Does nothing if the key already has a backing buffer.
    ///
    /// # Errors
    ///
    /// Same as [`allocate_capacity`](Self::allocate_capacity).
    fn reserve(
        &self,
        bucket: &str,
        key: &str,
        size: i64,
        purpose: &str,
    ) -> Result<(), BlockStoreError>;

    /// Copy `data` into the backing buffer of `(bucket, key)` at `offset`,
    /// creating the namespace and buffer on first write.
    ///
    /// # Errors
    ///
    /// Returns [`BlockStoreError::WriteOutOfRange`] if the write does not fit
    /// in the backing buffer, or [`BlockStoreError::BufferAllocation`] if a
    /// new backing buffer cannot be allocated. Nothing is created or modified
    /// on error.
    fn write(&self, bucket: &str, key: &str, offset: i64, data: &[u8])
    -> Result<(), BlockStoreError>;

    /// Copy `length` bytes out of the backing buffer of `(bucket, key)`
    /// starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`BlockStoreError::NoSuchBucket`] if the namespace was never
    /// written, [`BlockStoreError::NoSuchKey`] if the key was never written,
    /// or [`BlockStoreError::ReadOutOfRange`] if the span is out of bounds.
    fn read(&self, bucket: &str, key: &str, offset: i64, length: i64)
    -> Result<Bytes, BlockStoreError>;

    /// Current ledger values.
    ///
    /// # Errors
    ///
    /// Returns [`BlockStoreError::NotConnected`] before connect.
    fn ledger(&self) -> Result<LedgerSnapshot, BlockStoreError>;

    /// Whether a namespace exists in the address space.
    ///
    /// # Errors
    ///
    /// Returns [`BlockStoreError::NotConnected`] before connect.
    fn namespace_exists(&self, bucket: &str) -> Result<bool, BlockStoreError>;

    /// Length of the backing buffer of `(bucket, key)`, if it exists.
    ///
    /// # Errors
    ///
    /// Returns [`BlockStoreError::NotConnected`] before connect.
    fn backing_len(&self, bucket: &str, key: &str) -> Result<Option<usize>, BlockStoreError>;

    /// All namespaces in the address space, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`BlockStoreError::NotConnected`] before connect.
    fn namespaces(&self) -> Result<Vec<NamespaceInfo>, BlockStoreError>;

    /// The buffer sizing policy of this engine.
    fn sizing(&self) -> BufferSizing;
}

/// State established by a successful connect.
#[derive(Debug)]
struct EngineState {
    ledger: CapacityLedger,
    namespaces: HashMap<String, HashMap<String, Vec<u8>>>,
    reservations: HashMap<String, HashMap<String, i64>>,
}

impl EngineState {
    fn new(ledger: CapacityLedger) -> Self {
        Self {
            ledger,
            namespaces: HashMap::new(),
            reservations: HashMap::new(),
        }
    }

    fn backing(&self, bucket: &str, key: &str) -> Option<&Vec<u8>> {
        self.namespaces.get(bucket).and_then(|ns| ns.get(key))
    }

    fn reservation(&self, bucket: &str, key: &str) -> i64 {
        self.reservations
            .get(bucket)
            .and_then(|ns| ns.get(key))
            .copied()
            .unwrap_or(0)
    }

    fn clear_reservation(&mut self, bucket: &str, key: &str) {
        if let Some(ns) = self.reservations.get_mut(bucket) {
            ns.remove(key);
            if ns.is_empty() {
                self.reservations.remove(bucket);
            }
        }
    }
}

/// In-memory [`BlockStorage`] implementation.
#[derive(Debug, Default)]
pub struct InMemoryBlockStorage {
    sizing: BufferSizing,
    state: Mutex<Option<EngineState>>,
}

impl InMemoryBlockStorage {
    /// Create a disconnected engine using the given sizing policy.
    #[must_use]
    pub fn new(sizing: BufferSizing) -> Self {
        Self {
            sizing,
            state: Mutex::new(None),
        }
    }

    /// Length of a new backing buffer for `(bucket, key)` under this engine's policy.
    fn initial_len(&self, state: &EngineState, bucket: &str, key: &str) -> usize {
        let len = match self.sizing {
            BufferSizing::RemainingCapacity => state.ledger.remaining(),
            BufferSizing::Reserved => state.reservation(bucket, key),
        };
        usize::try_from(len).unwrap_or(0)
    }
}

/// Byte range `[offset, offset + length)` if it lies within `capacity`.
fn span(offset: i64, length: usize, capacity: usize) -> Option<Range<usize>> {
    let start = usize::try_from(offset).ok()?;
    let end = start.checked_add(length)?;
    (end <= capacity).then_some(start..end)
}

/// Zero-filled buffer of `len` bytes, or `None` if the allocator refuses it.
fn zeroed(len: usize) -> Option<Vec<u8>> {
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(len).ok()?;
    buffer.resize(len, 0);
    Some(buffer)
}

impl BlockStorage for InMemoryBlockStorage {
    fn connect(&self, capacity: i64) -> Result<(), BlockStoreError> {
        let ledger = CapacityLedger::new(capacity)?;
        let mut guard = self.state.lock();
        let reconnect = guard.is_some();
        *guard = Some(EngineState::new(ledger));
        tracing::info!(capacity, reconnect, sizing = %self.sizing, "block storage connected");
        Ok(())
    }

    fn allocate_capacity(&self, size: i64, purpose: &str) -> Result<(), BlockStoreError> {
        let mut guard = self.state.lock();
        let state = guard.as_mut().ok_or(BlockStoreError::NotConnected)?;
        state.ledger.allocate(size).inspect_err(|e| {
            tracing::debug!(size, purpose, error = %e, "allocation rejected");
        })?;
        tracing::debug!(
            size,
            purpose,
            allocated = state.ledger.allocated(),
            "allocated capacity"
        );
        Ok(())
    }

    fn reserve(
        &self,
        bucket: &str,
        key: &str,
        size: i64,
        purpose: &str,
    ) -> Result<(), BlockStoreError> {
        let mut guard = self.state.lock();
        let state = guard.as_mut().ok_or(BlockStoreError::NotConnected)?;
        if state.backing(bucket, key).is_some() {
            tracing::trace!(bucket, key, "key already backed, reservation skipped");
            return Ok(());
        }

        state.ledger.allocate(size)?;
        *state
            .reservations
            .entry(bucket.to_owned())
            .or_default()
            .entry(key.to_owned())
            .or_insert(0) += size;
        tracing::debug!(bucket, key, size, purpose, "reserved capacity");
        Ok(())
    }

    fn write(
        &self,
        bucket: &str,
        key: &str,
        offset: i64,
        data: &[u8],
    ) -> Result<(), BlockStoreError> {
        let mut guard = self.state.lock();
        let state = guard.as_mut().ok_or(BlockStoreError::NotConnected)?;

        let existing = state.backing(bucket, key).map(Vec::len);
        let capacity = existing.unwrap_or_else(|| self.initial_len(state, bucket, key));
        let range = span(offset, data.len(), capacity).ok_or_else(|| {
            BlockStoreError::WriteOutOfRange {
                bucket: bucket.to_owned(),
                key: key.to_owned(),
                offset,
                length: data.len(),
                capacity,
            }
        })?;

        let fresh = match existing {
            Some(_) => None,
            None => Some(zeroed(capacity).ok_or_else(|| BlockStoreError::BufferAllocation {
                bucket: bucket.to_owned(),
                key: key.to_owned(),
                capacity,
            })?),
        };
        if fresh.is_some() {
            state.clear_reservation(bucket, key);
            tracing::debug!(bucket, key, capacity, "created backing buffer");
        }
        let buffer = state
            .namespaces
            .entry(bucket.to_owned())
            .or_default()
            .entry(key.to_owned())
            .or_insert_with(|| fresh.unwrap_or_default());
        buffer[range].copy_from_slice(data);

        tracing::trace!(bucket, key, offset, length = data.len(), "wrote block");
        Ok(())
    }

    fn read(
        &self,
        bucket: &str,
        key: &str,
        offset: i64,
        length: i64,
    ) -> Result<Bytes, BlockStoreError> {
        let guard = self.state.lock();
        let state = guard.as_ref().ok_or(BlockStoreError::NotConnected)?;

        let namespace = state
            .namespaces
            .get(bucket)
            .ok_or_else(|| BlockStoreError::NoSuchBucket {
                bucket: bucket.to_owned(),
            })?;
        let buffer = namespace
            .get(key)
            .ok_or_else(|| BlockStoreError::NoSuchKey {
                bucket: bucket.to_owned(),
                key: key.to_owned(),
            })?;

        let range = usize::try_from(length)
            .ok()
            .and_then(|len| span(offset, len, buffer.len()))
            .ok_or_else(|| BlockStoreError::ReadOutOfRange {
                bucket: bucket.to_owned(),
                key: key.to_owned(),
                offset,
                length,
                capacity: buffer.len(),
            })?;

        tracing::trace!(bucket, key, offset, length, "read block");
        Ok(Bytes::copy_from_slice(&buffer[range]))
    }

    fn ledger(&self) -> Result<LedgerSnapshot, BlockStoreError> {
        let guard = self.state.lock();
        let state = guard.as_ref().ok_or(BlockStoreError::NotConnected)?;
        Ok(state.ledger.snapshot())
    }

    fn namespace_exists(&self, bucket: &str) -> Result<bool, BlockStoreError> {
        let guard = self.state.lock();
        let state = guard.as_ref().ok_or(BlockStoreError::NotConnected)?;
        Ok(state.namespaces.contains_key(bucket))
    }

    fn backing_len(&self, bucket: &str, key: &str) -> Result<Option<usize>, BlockStoreError> {
        let guard = self.state.lock();
        let state = guard.as_ref().ok_or(BlockStoreError::NotConnected)?;
        Ok(state.backing(bucket, key).map(Vec::len))
    }

    fn namespaces(&self) -> Result<Vec<NamespaceInfo>, BlockStoreError> {
        let guard = self.state.lock();
        let state = guard.as_ref().ok_or(BlockStoreError::NotConnected)?;
        let mut namespaces: Vec<NamespaceInfo> = state
            .namespaces
            .iter()
            .map(|(name, keys)| NamespaceInfo {
                name: name.clone(),
                key_count: keys.len(),
            })
            .collect();
        namespaces.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(namespaces)
    }

    fn sizing(&self) -> BufferSizing {
        self.sizing
    }
}
