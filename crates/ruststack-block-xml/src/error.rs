//! XML error type and `<Error>` document formatting.

use std::io::{self, Write};

use quick_xml::Writer;

use crate::serialize::{BlockSerialize, write_document, write_text_element};

/// Errors that can occur during XML serialization.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// An I/O error during XML writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An error from the underlying quick-xml library.
    #[error("XML processing error: {0}")]
    QuickXml(#[from] quick_xml::Error),
}

/// Format a gateway error as XML.
///
/// Errors are a flat `<Error>` element without an outer wrapper:
///
/// ```xml
/// <?xml version="1.0" encoding="UTF-8"?>
/// <Error>
///   <Code>NoSuchBucket</Code>
///   <Message>The specified bucket does not exist.</Message>
///   <Resource>photos</Resource>
///   <RequestId>4c1b...</RequestId>
/// </Error>
/// ```
pub fn error_to_xml(
    code: &str,
    message: &str,
    resource: Option<&str>,
    request_id: &str,
) -> Vec<u8> {
    let document = ErrorDocument {
        code,
        message,
        resource,
        request_id,
    };
    write_document("Error", None, &document).unwrap_or_else(|e| {
        tracing::error!(error = %e, code, request_id, "failed to serialize error XML");
        Vec::new()
    })
}

/// Children of an `<Error>` element, in document order.
struct ErrorDocument<'a> {
    code: &'a str,
    message: &'a str,
    resource: Option<&'a str>,
    request_id: &'a str,
}

impl BlockSerialize for ErrorDocument<'_> {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        let fields = [
            ("Code", Some(self.code)),
            ("Message", Some(self.message)),
            ("Resource", self.resource),
            ("RequestId", Some(self.request_id)),
        ];
        for (tag, text) in fields {
            if let Some(text) = text {
                write_text_element(writer, tag, text)?;
            }
        }
        Ok(())
    }
}
