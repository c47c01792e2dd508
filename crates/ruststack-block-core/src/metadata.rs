//! Metadata records written by the gateway.
//!
//! Bucket and object metadata are small XML fragments stored in reserved
//! engine namespaces through the ordinary write path:
//!
//! - `<Bucket><Name>{bucket}</Name></Bucket>` at `("buckets", bucket)`
//! - `<Object><Key>{key}</Key><Size>{n}</Size></Object>` at
//!   `("objects", "{bucket}/{key}")`

use std::io;

use quick_xml::Writer;
use quick_xml::events::BytesText;

/// Namespace holding bucket metadata records.
pub const BUCKET_NAMESPACE: &str = "buckets";

/// Namespace holding object metadata records.
pub const OBJECT_NAMESPACE: &str = "objects";

/// Key of the object metadata record for `key` in `bucket`.
#[must_use]
pub fn object_record_key(bucket: &str, key: &str) -> String {
    format!("{bucket}/{key}")
}

/// Encode the metadata record of a bucket.
///
/// # Errors
///
/// Returns `io::Error` if the XML writer fails.
pub fn bucket_record(bucket: &str) -> io::Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::with_capacity(64));
    writer.create_element("Bucket").write_inner_content(|w| {
        w.create_element("Name")
            .write_text_content(BytesText::new(bucket))?;
        Ok(())
    })?;
    Ok(writer.into_inner())
}

/// Encode the metadata record of an object of `size` bytes.
///
/// # Errors
///
/// Returns `io::Error` if the XML writer fails.
pub fn object_record(key: &str, size: usize) -> io::Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::with_capacity(96));
    writer.create_element("Object").write_inner_content(|w| {
        w.create_element("Key")
            .write_text_content(BytesText::new(key))?;
        w.create_element("Size")
            .write_text_content(BytesText::new(&size.to_string()))?;
        Ok(())
    })?;
    Ok(writer.into_inner())
}
