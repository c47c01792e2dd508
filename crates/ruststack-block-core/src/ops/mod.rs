//! Gateway operation handlers.
//!
//! Each submodule exposes `handle_*` methods on
//! [`crate::provider::RustStackBlock`]. The server binary bridges them to the
//! HTTP layer by implementing the `BlockHandler` trait from
//! `ruststack-block-http`.

pub mod bucket;
pub mod capacity;
pub mod object;
