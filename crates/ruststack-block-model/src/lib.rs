//! Shared types for the RustStack block gateway.
//!
//! This crate sits between the HTTP layer (`ruststack-block-http`) and the
//! business logic (`ruststack-block-core`). It has no knowledge of either:
//!
//! - [`operations`]: the [`BlockOperation`] enum identifying every routed request
//! - [`input`] / [`output`]: typed request and response shapes per operation
//! - [`error`]: the wire-level [`BlockError`] and its [`BlockErrorCode`]

pub mod error;
pub mod input;
pub mod operations;
pub mod output;

pub use error::{BlockError, BlockErrorCode};
pub use operations::BlockOperation;
