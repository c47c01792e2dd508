//! Gateway-owned state.
//!
//! - [`BucketRegistry`] -- the set of registered bucket names
//!
//! The registry is independent of the engine's address space. Engine
//! namespaces are queried through
//! [`BlockStorage::namespaces`](crate::storage::BlockStorage::namespaces).

pub(crate) mod registry;

pub use registry::{BucketRegistry, Registration};
