//! XML serialization for the RustStack block gateway.
//!
//! Response bodies for listings and ledger reports, and every error response,
//! are small tagged documents:
//!
//! - [`BlockSerialize`] trait and [`to_xml`] for response bodies
//! - [`error_to_xml`] for `<Error>` documents
//!
//! Conventions follow the S3 RestXml style: an XML declaration, the S3
//! namespace on listing roots, ISO 8601 timestamps with milliseconds.

pub mod error;
pub mod serialize;

pub use error::{XmlError, error_to_xml};
pub use serialize::{BlockSerialize, S3_NAMESPACE, to_xml};
