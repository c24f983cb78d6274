//! `multipart/form-data` body encoding for single-file uploads.
//!
//! # Design
//! A form is a list of text fields followed by exactly one file part named
//! `file`. Fields are written in the order the caller yields them. Lines end
//! with CRLF and the body closes with `--{boundary}--`.

use bytes::{BufMut, Bytes, BytesMut};
use uuid::Uuid;

/// The file payload of a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub name: String,
    pub mime_type: String,
    pub data: Bytes,
}

impl FilePart {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }
}

/// Generate a fresh boundary token.
pub fn new_boundary() -> String {
    format!("Boundary-{}", Uuid::new_v4().simple())
}

/// `Content-Type` header value for a body delimited by `boundary`.
pub fn content_type(boundary: &str) -> String {
    format!("multipart/form-data; boundary={boundary}")
}

/// Encode `fields` and `file` as a `multipart/form-data` body.
pub fn encode_form<I, K, V>(boundary: &str, fields: I, file: &FilePart) -> Bytes
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut body = BytesMut::with_capacity(file.data.len() + 256);

    for (name, value) in fields {
        put_str(&mut body, &format!("--{boundary}\r\n"));
        put_str(
            &mut body,
            &format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                escape_quoted(name.as_ref())
            ),
        );
        put_str(&mut body, value.as_ref());
        put_str(&mut body, "\r\n");
    }

    put_str(&mut body, &format!("--{boundary}\r\n"));
    put_str(
        &mut body,
        &format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            escape_quoted(&file.name)
        ),
    );
    put_str(&mut body, &format!("Content-Type: {}\r\n\r\n", file.mime_type));
    body.put_slice(&file.data);
    put_str(&mut body, "\r\n");
    put_str(&mut body, &format!("--{boundary}--\r\n"));

    body.freeze()
}

fn put_str(buf: &mut BytesMut, s: &str) {
    buf.put_slice(s.as_bytes());
}

// Quotes and line breaks would terminate the quoted-string early.
fn escape_quoted(s: &str) -> String {
    s.replace('"', "%22").replace('\r', "%0D").replace('\n', "%0A")
}
