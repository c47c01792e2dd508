//! Block gateway provider.
//!
//! [`RustStackBlock`] owns the bucket registry and a handle to the block
//! storage engine. The gateway operations are implemented as `handle_*`
//! methods in the [`crate::ops`] submodules.

use std::sync::Arc;

use tracing::info;

use crate::config::BlockConfig;
use crate::error::BlockStoreError;
use crate::state::BucketRegistry;
use crate::storage::{BlockStorage, InMemoryBlockStorage};

/// The block gateway provider.
///
/// All fields are `Arc`-wrapped for cheap cloning and shared ownership
/// across handler tasks.
///
/// # Examples
///
/// ```
/// use ruststack_block_core::RustStackBlock;
/// use ruststack_block_core::config::BlockConfig;
///
/// let provider = RustStackBlock::new(BlockConfig::default()).unwrap();
/// assert_eq!(provider.engine().ledger().unwrap().total_capacity, 1_048_576);
/// ```
#[derive(Debug, Clone)]
pub struct RustStackBlock {
    /// Block storage engine (ledger and address space).
    pub(crate) engine: Arc<dyn BlockStorage>,
    /// Registered bucket names.
    pub(crate) registry: Arc<BucketRegistry>,
    /// Provider configuration.
    pub(crate) config: Arc<BlockConfig>,
}

impl RustStackBlock {
    /// Create a provider backed by a new in-memory engine connected with
    /// `config.capacity` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`BlockStoreError::InvalidCapacity`] if the configured
    /// capacity is not positive.
    pub fn new(config: BlockConfig) -> Result<Self, BlockStoreError> {
        let engine = InMemoryBlockStorage::new(config.buffer_sizing);
        engine.connect(config.capacity)?;
        Ok(Self::with_engine(Arc::new(engine), config))
    }

    /// Create a provider around an existing engine. The engine is used as-is
    /// and must already be connected.
    #[must_use]
    pub fn with_engine(engine: Arc<dyn BlockStorage>, config: BlockConfig) -> Self {
        info!(
            capacity = config.capacity,
            sizing = %engine.sizing(),
            "block gateway provider initialized"
        );
        Self {
            engine,
            registry: Arc::new(BucketRegistry::new()),
            config: Arc::new(config),
        }
    }

    /// Returns the block storage engine.
    #[must_use]
    pub fn engine(&self) -> &dyn BlockStorage {
        self.engine.as_ref()
    }

    /// Returns the bucket registry.
    #[must_use]
    pub fn registry(&self) -> &BucketRegistry {
        &self.registry
    }

    /// Returns the provider configuration.
    #[must_use]
    pub fn config(&self) -> &BlockConfig {
        &self.config
    }

    /// Clear the registry and reconnect the engine with the configured
    /// capacity, discarding all stored data.
    ///
    /// # Errors
    ///
    /// Returns [`BlockStoreError::InvalidCapacity`] if the configured
    /// capacity is not positive.
    pub fn reset(&self) -> Result<(), BlockStoreError> {
        self.engine.connect(self.config.capacity)?;
        self.registry.clear();
        Ok(())
    }
}
