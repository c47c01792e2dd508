//! Block gateway HTTP routing, request parsing, response serialization, and
//! hyper service.
//!
//! - **Routing** ([`router`]): maps method and path onto a gateway operation.
//! - **Request deserialization** ([`request`]): builds typed inputs from the
//!   request, including `multipart/form-data` uploads ([`multipart`]).
//! - **Response serialization** ([`response`]): turns typed outputs into
//!   responses with status, headers and XML or raw bodies.
//! - **Dispatch** ([`dispatch`]): the [`BlockHandler`] boundary to the
//!   storage provider.
//! - **Service** ([`service`]): [`BlockHttpService`], the hyper `Service`.
//! - **Body** ([`body`]): [`BlockResponseBody`].
//!
//! # Architecture
//!
//! ```text
//! HTTP Request
//!   -> BlockHttpService (hyper Service)
//!     -> Health check / CORS interception
//!     -> BlockRouter (operation identification)
//!     -> Bounded body collection
//!     -> dispatch_operation (BlockHandler trait)
//!     -> Common response headers (x-amz-request-id, Server)
//!   <- HTTP Response
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use ruststack_block_http::dispatch::NotImplementedHandler;
//! use ruststack_block_http::service::{BlockHttpConfig, BlockHttpService};
//!
//! let service = BlockHttpService::new(NotImplementedHandler, BlockHttpConfig::default());
//! // Use `service` with a hyper server.
//! ```

// BlockError is the wire error type returned everywhere; boxing it in every
// Result would only add indirection.
#![allow(clippy::result_large_err)]

pub mod body;
pub mod dispatch;
pub mod multipart;
pub mod request;
pub mod response;
pub mod router;
pub mod service;

pub use body::BlockResponseBody;
pub use dispatch::{BlockHandler, NotImplementedHandler};
pub use request::FromBlockRequest;
pub use response::{IntoBlockResponse, error_to_response};
pub use router::{BlockRouter, RoutingContext};
pub use service::{BlockHttpConfig, BlockHttpService};
