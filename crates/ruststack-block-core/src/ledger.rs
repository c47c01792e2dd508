//! Capacity ledger.
//!
//! The ledger records a fixed total capacity and the running sum of
//! allocations. `allocated` never decreases and never exceeds the total.

use ruststack_block_model::output::CapacityOutput;

use crate::error::BlockStoreError;

/// Finite capacity budget established at connect time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityLedger {
    total_capacity: i64,
    allocated: i64,
}

impl CapacityLedger {
    /// Create a ledger with `total_capacity` bytes and nothing allocated.
    ///
    /// # Errors
    ///
    /// Returns [`BlockStoreError::InvalidCapacity`] if `total_capacity <= 0`.
    pub fn new(total_capacity: i64) -> Result<Self, BlockStoreError> {
        if total_capacity <= 0 {
            return Err(BlockStoreError::InvalidCapacity {
                capacity: total_capacity,
            });
        }
        Ok(Self {
            total_capacity,
            allocated: 0,
        })
    }

    /// Total capacity in bytes.
    #[must_use]
    pub fn total_capacity(&self) -> i64 {
        self.total_capacity
    }

    /// Bytes allocated so far.
    #[must_use]
    pub fn allocated(&self) -> i64 {
        self.allocated
    }

    /// Bytes still available for allocation.
    #[must_use]
    pub fn remaining(&self) -> i64 {
        self.total_capacity - self.allocated
    }

    /// Add `size` bytes to the allocated total.
    ///
    /// # Errors
    ///
    /// Returns [`BlockStoreError::InvalidAllocation`] if `size <= 0` or the
    /// allocation would exceed the total capacity. The ledger is unchanged on
    /// error.
    pub fn allocate(&mut self, size: i64) -> Result<(), BlockStoreError> {
        let next = self
            .allocated
            .checked_add(size)
            .filter(|next| size > 0 && *next <= self.total_capacity);

        match next {
            Some(next) => {
                self.allocated = next;
                Ok(())
            }
            None => Err(BlockStoreError::InvalidAllocation {
                size,
                allocated: self.allocated,
                total_capacity: self.total_capacity,
            }),
        }
    }

    /// Capture the current ledger values.
    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            total_capacity: self.total_capacity,
            allocated: self.allocated,
            remaining: self.remaining(),
        }
    }
}

/// Read-only view of the ledger at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerSnapshot {
    /// Total capacity in bytes.
    pub total_capacity: i64,
    /// Bytes allocated.
    pub allocated: i64,
    /// Bytes still available.
    pub remaining: i64,
}

impl From<LedgerSnapshot> for CapacityOutput {
    fn from(snapshot: LedgerSnapshot) -> Self {
        Self {
            total_capacity: snapshot.total_capacity,
            allocated: snapshot.allocated,
            remaining: snapshot.remaining,
        }
    }
}
