//! XML serialization of gateway response bodies.
//!
//! Each output type implements [`BlockSerialize`] by writing its child
//! elements; [`to_xml`] wraps them in a namespaced root element preceded by
//! the XML declaration.

use std::io::{self, Write};

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesText, Event};
use ruststack_block_model::output::{
    AllocateMetadataOutput, CapacityOutput, ListBucketsOutput, ListNamespacesOutput,
    PutObjectOutput,
};

use crate::error::XmlError;

/// The S3 XML namespace.
pub const S3_NAMESPACE: &str = "http://s3.amazonaws.com/doc/2006-03-01/";

/// Trait for serializing gateway types to XML.
///
/// Implementors write their content as child elements inside the current XML
/// context. The root element is handled by [`to_xml`].
pub trait BlockSerialize {
    /// Serialize this value as XML child elements into the given writer.
    ///
    /// # Errors
    ///
    /// Returns `io::Error` if writing to the underlying writer fails.
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()>;
}

/// Serialize a value as a complete XML document under `root_element`.
///
/// # Errors
///
/// Returns `XmlError` if serialization fails.
pub fn to_xml<T: BlockSerialize>(root_element: &str, value: &T) -> Result<Vec<u8>, XmlError> {
    write_document(root_element, Some(S3_NAMESPACE), value)
}

/// Write the XML declaration and `value` under `root_element`, with an
/// `xmlns` attribute when `namespace` is given.
pub(crate) fn write_document<T: BlockSerialize>(
    root_element: &str,
    namespace: Option<&str>,
    value: &T,
) -> Result<Vec<u8>, XmlError> {
    let mut buf = Vec::with_capacity(512);
    let mut writer = Writer::new(&mut buf);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = writer.create_element(root_element);
    if let Some(namespace) = namespace {
        root = root.with_attribute(("xmlns", namespace));
    }
    root.write_inner_content(|w| value.serialize_xml(w))?;

    Ok(buf)
}

/// Write a simple `<tag>text</tag>` element.
pub(crate) fn write_text_element<W: Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> io::Result<()> {
    writer
        .create_element(tag)
        .write_text_content(BytesText::new(text))?;
    Ok(())
}

/// Format a `DateTime<Utc>` as ISO 8601 with milliseconds and `Z` suffix.
fn format_timestamp(dt: &chrono::DateTime<chrono::Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

fn write_ledger<W: Write>(writer: &mut Writer<W>, capacity: &CapacityOutput) -> io::Result<()> {
    write_text_element(writer, "TotalCapacity", &capacity.total_capacity.to_string())?;
    write_text_element(writer, "Allocated", &capacity.allocated.to_string())?;
    write_text_element(writer, "Remaining", &capacity.remaining.to_string())?;
    Ok(())
}

impl BlockSerialize for ListBucketsOutput {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer.create_element("Buckets").write_inner_content(|w| {
            for bucket in &self.buckets {
                w.create_element("Bucket").write_inner_content(|b| {
                    write_text_element(b, "Name", &bucket.name)?;
                    write_text_element(
                        b,
                        "CreationDate",
                        &format_timestamp(&bucket.creation_date),
                    )?;
                    Ok(())
                })?;
            }
            Ok(())
        })?;
        writer.create_element("Owner").write_inner_content(|w| {
            write_text_element(w, "ID", &self.owner.id)?;
            Ok(())
        })?;
        Ok(())
    }
}

impl BlockSerialize for PutObjectOutput {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_text_element(writer, "Location", &self.location)?;
        write_text_element(writer, "Size", &self.size.to_string())?;
        Ok(())
    }
}

impl BlockSerialize for CapacityOutput {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_ledger(writer, self)
    }
}

impl BlockSerialize for AllocateMetadataOutput {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_text_element(writer, "Size", &self.size.to_string())?;
        write_ledger(writer, &self.capacity)
    }
}

impl BlockSerialize for ListNamespacesOutput {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        for ns in &self.namespaces {
            writer.create_element("Namespace").write_inner_content(|w| {
                write_text_element(w, "Name", &ns.name)?;
                write_text_element(w, "KeyCount", &ns.key_count.to_string())?;
                write_text_element(w, "Registered", if ns.registered { "true" } else { "false" })?;
                Ok(())
            })?;
        }
        Ok(())
    }
}
