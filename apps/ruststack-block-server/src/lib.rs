//! RustStack block gateway server library.
//!
//! Holds the pieces of the binary that are also driven in-process by the
//! integration tests: the [`BlockStoreHandler`] bridge and the [`serve`]
//! accept loop.

pub mod handler;
pub mod server;

pub use handler::BlockStoreHandler;
pub use server::{ctrl_c, run_health_check, serve};
