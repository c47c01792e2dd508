//! Bucket registry.
//!
//! [`BucketRegistry`] records which bucket names have been created through
//! the gateway, with their creation time. Insert and remove use `DashMap`
//! entry APIs so racing creates or deletes of one name have exactly one
//! winner.
//!
//! Every successful [`BucketRegistry::register`] hands out a [`Registration`]
//! carrying a generation number unique to that insert. A failed create uses
//! it with [`BucketRegistry::release`], which removes the entry only if it is
//! still the one that create inserted. A delete followed by a fresh create of
//! the same name in between therefore survives the rollback.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use crate::error::BlockStoreError;

/// Proof of one successful registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    /// Creation time recorded for the bucket.
    pub created_at: DateTime<Utc>,
    generation: u64,
}

#[derive(Debug, Clone, Copy)]
struct BucketEntry {
    created_at: DateTime<Utc>,
    generation: u64,
}

/// Concurrent set of registered bucket names.
pub struct BucketRegistry {
    buckets: DashMap<String, BucketEntry>,
    next_generation: AtomicU64,
}

impl std::fmt::Debug for BucketRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BucketRegistry")
            .field("bucket_count", &self.buckets.len())
            .finish_non_exhaustive()
    }
}

impl Default for BucketRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BucketRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buckets: DashMap::new(),
            next_generation: AtomicU64::new(1),
        }
    }

    /// Register `name`.
    ///
    /// # Errors
    ///
    /// Returns [`BlockStoreError::BucketAlreadyExists`] if the name is
    /// already registered.
    pub fn register(&self, name: &str) -> Result<Registration, BlockStoreError> {
        match self.buckets.entry(name.to_owned()) {
            Entry::Occupied(_) => Err(BlockStoreError::BucketAlreadyExists {
                bucket: name.to_owned(),
            }),
            Entry::Vacant(slot) => {
                let entry = BucketEntry {
                    created_at: Utc::now(),
                    generation: self.next_generation.fetch_add(1, Ordering::Relaxed),
                };
                slot.insert(entry);
                debug!(bucket = %name, generation = entry.generation, "registered bucket");
                Ok(Registration {
                    created_at: entry.created_at,
                    generation: entry.generation,
                })
            }
        }
    }

    /// Undo `registration` if `name` still maps to it.
    ///
    /// Returns whether an entry was removed. An entry inserted by a later
    /// `register` of the same name is left alone.
    pub fn release(&self, name: &str, registration: Registration) -> bool {
        let removed = self
            .buckets
            .remove_if(name, |_, entry| entry.generation == registration.generation)
            .is_some();
        if removed {
            debug!(bucket = %name, generation = registration.generation, "released bucket");
        }
        removed
    }

    /// Remove `name` from the registry.
    ///
    /// # Errors
    ///
    /// Returns [`BlockStoreError::NoSuchBucket`] if the name is not
    /// registered.
    pub fn unregister(&self, name: &str) -> Result<(), BlockStoreError> {
        if self.buckets.remove(name).is_none() {
            return Err(BlockStoreError::NoSuchBucket {
                bucket: name.to_owned(),
            });
        }
        debug!(bucket = %name, "unregistered bucket");
        Ok(())
    }

    /// Whether `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.buckets.contains_key(name)
    }

    /// All registered buckets with their creation times, sorted by name.
    #[must_use]
    pub fn list(&self) -> Vec<(String, DateTime<Utc>)> {
        let mut buckets: Vec<(String, DateTime<Utc>)> = self
            .buckets
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().created_at))
            .collect();
        buckets.sort_by(|a, b| a.0.cmp(&b.0));
        buckets
    }

    /// Number of registered buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether no bucket is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Remove every registered bucket.
    pub fn clear(&self) {
        self.buckets.clear();
    }
}
