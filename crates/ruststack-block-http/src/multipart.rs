//! `multipart/form-data` upload support.
//!
//! `PutObject` accepts either a raw body or a form upload whose `file` field
//! carries the object payload. The parser works on the already collected
//! body bytes.

use bytes::Bytes;
use mime::Mime;
use ruststack_block_model::BlockError;

/// Name of the form field holding the object payload.
pub const FILE_FIELD: &str = "file";

/// One part of a multipart body.
#[derive(Debug, Clone)]
pub struct FormPart {
    /// The `name` parameter of the part's Content-Disposition.
    pub name: Option<String>,
    /// The `filename` parameter of the part's Content-Disposition.
    pub filename: Option<String>,
    /// The part's Content-Type, if given.
    pub content_type: Option<String>,
    /// The part payload.
    pub data: Bytes,
}

/// Parse a Content-Type header and return its boundary if it is
/// `multipart/form-data`.
#[must_use]
pub fn form_data_boundary(content_type: &str) -> Option<String> {
    let mime: Mime = content_type.parse().ok()?;
    if mime.type_() != mime::MULTIPART || mime.subtype() != mime::FORM_DATA {
        return None;
    }
    mime.get_param(mime::BOUNDARY)
        .map(|b| b.as_str().to_owned())
        .filter(|b| !b.is_empty())
}

/// Extract the payload of the `file` field from a multipart body.
///
/// # Errors
///
/// Returns `InvalidRequest` if the body has no `file` field.
pub fn extract_file(body: &Bytes, boundary: &str) -> Result<Bytes, BlockError> {
    let part = parse_parts(body, boundary)
        .into_iter()
        .find(|part| part.name.as_deref() == Some(FILE_FIELD))
        .ok_or_else(|| {
            BlockError::invalid_request(format!(
                "multipart upload is missing the '{FILE_FIELD}' field"
            ))
        })?;
    tracing::debug!(
        filename = ?part.filename,
        content_type = ?part.content_type,
        size = part.data.len(),
        "extracted form upload"
    );
    Ok(part.data)
}

/// Split a multipart body into its parts.
///
/// Parts without a header/body separator are skipped.
#[must_use]
pub fn parse_parts(body: &Bytes, boundary: &str) -> Vec<FormPart> {
    let delimiter = format!("--{boundary}");
    let delimiter = delimiter.as_bytes();

    let Some(first) = find_bytes(body, delimiter) else {
        return Vec::new();
    };
    let mut cursor = first + delimiter.len();
    let mut parts = Vec::new();

    loop {
        let rest = &body[cursor..];
        // A delimiter followed by "--" closes the body.
        if rest.starts_with(b"--") {
            break;
        }
        let start = cursor + leading_crlf(rest);
        let Some(len) = find_bytes(&body[start..], delimiter) else {
            break;
        };
        let end = start + len;
        let raw = body.slice(start..end);
        let raw = raw.slice(..raw.len() - trailing_crlf(&raw));
        if let Some(part) = parse_part(&raw) {
            parts.push(part);
        }
        cursor = end + delimiter.len();
    }

    parts
}

fn parse_part(raw: &Bytes) -> Option<FormPart> {
    let separator = b"\r\n\r\n";
    let split = find_bytes(raw, separator)?;
    let headers = String::from_utf8_lossy(&raw[..split]);

    let mut part = FormPart {
        name: None,
        filename: None,
        content_type: None,
        data: raw.slice(split + separator.len()..),
    };

    for line in headers.split("\r\n") {
        let Some((header, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if header.eq_ignore_ascii_case("content-disposition") {
            part.name = disposition_param(value, "name");
            part.filename = disposition_param(value, "filename");
        } else if header.eq_ignore_ascii_case("content-type") {
            part.content_type = Some(value.to_owned());
        }
    }

    Some(part)
}

/// Value of `param` in a Content-Disposition header value, quoted or bare.
fn disposition_param(value: &str, param: &str) -> Option<String> {
    value.split(';').skip(1).find_map(|item| {
        let (key, val) = item.trim().split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case(param)
            .then(|| val.trim().trim_matches('"').to_owned())
    })
}

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn leading_crlf(data: &[u8]) -> usize {
    if data.starts_with(b"\r\n") { 2 } else { 0 }
}

fn trailing_crlf(data: &[u8]) -> usize {
    if data.ends_with(b"\r\n") { 2 } else { 0 }
}
