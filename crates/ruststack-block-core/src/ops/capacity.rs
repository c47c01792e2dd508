//! Capacity and address-space inspection handlers.
//!
//! Implements `allocate_metadata`, `get_capacity` and `list_namespaces`.

use ruststack_block_model::BlockError;
use ruststack_block_model::input::{AllocateMetadataInput, GetCapacityInput, ListNamespacesInput};
use ruststack_block_model::output::{
    AllocateMetadataOutput, CapacityOutput, ListNamespacesOutput, NamespaceSummary,
};
use tracing::info;

use crate::error::BlockStoreError;
use crate::provider::RustStackBlock;

// Handlers stay async so the HTTP bridge can treat every operation alike.
#[allow(clippy::unused_async)]
impl RustStackBlock {
    /// Allocate `size` bytes of metadata capacity from the ledger.
    pub async fn handle_allocate_metadata(
        &self,
        input: AllocateMetadataInput,
    ) -> Result<AllocateMetadataOutput, BlockError> {
        self.engine
            .allocate_capacity(input.size, "metadata")
            .map_err(BlockStoreError::into_block_error)?;
        let capacity = self.capacity()?;

        info!(size = input.size, allocated = capacity.allocated, "allocate_metadata completed");
        Ok(AllocateMetadataOutput {
            size: input.size,
            capacity,
        })
    }

    /// Report the current ledger values.
    pub async fn handle_get_capacity(
        &self,
        _input: GetCapacityInput,
    ) -> Result<CapacityOutput, BlockError> {
        self.capacity()
    }

    /// List engine namespaces, marking those that are registered buckets.
    pub async fn handle_list_namespaces(
        &self,
        _input: ListNamespacesInput,
    ) -> Result<ListNamespacesOutput, BlockError> {
        let namespaces = self
            .engine
            .namespaces()
            .map_err(BlockStoreError::into_block_error)?
            .into_iter()
            .map(|ns| NamespaceSummary {
                registered: self.registry.contains(&ns.name),
                name: ns.name,
                key_count: ns.key_count,
            })
            .collect();
        Ok(ListNamespacesOutput { namespaces })
    }

    fn capacity(&self) -> Result<CapacityOutput, BlockError> {
        self.engine
            .ledger()
            .map(CapacityOutput::from)
            .map_err(BlockStoreError::into_block_error)
    }
}
