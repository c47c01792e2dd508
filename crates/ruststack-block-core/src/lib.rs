//! Block storage engine and object gateway logic for RustStack.
//!
//! The engine tracks a finite capacity budget and serves offset-addressed
//! reads and writes keyed by `(bucket, key)`. The gateway provider layers
//! bucket lifecycle and metadata bookkeeping on top of it.
//!
//! # Architecture
//!
//! ```text
//! HTTP layer (ruststack-block-http)
//!        |
//!        v
//! RustStackBlock (handle_* operations)
//!        |                  \
//!        v                   v
//!  BucketRegistry      Arc<dyn BlockStorage>
//!  (registered names)   (ledger + address space)
//! ```
//!
//! The registry and the address space are separate structures: a namespace
//! can exist in the engine (for example the reserved `buckets` and `objects`
//! metadata namespaces) without a registered bucket of the same name.

pub mod config;
pub mod error;
pub mod ledger;
pub mod metadata;
mod ops;
pub mod provider;
pub mod state;
pub mod storage;

pub use config::{BlockConfig, BufferSizing};
pub use error::BlockStoreError;
pub use ledger::{CapacityLedger, LedgerSnapshot};
pub use provider::RustStackBlock;
pub use storage::{BlockStorage, InMemoryBlockStorage, NamespaceInfo};
