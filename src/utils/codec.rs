//! Base64 transport codec for translation file content
//!
//! Providers ship file blobs base64-encoded. Encoding goes over the UTF-8
//! bytes, so the full Unicode range round-trips: `decode(encode(s)) == s`.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::error::Result;

pub fn encode_base64_unicode(text: &str) -> String {
    BASE64.encode(text.as_bytes())
}

/// Decode base64 into a Unicode string.
///
/// GitHub line-wraps blob content, so ASCII whitespace is stripped before
/// decoding.
pub fn decode_base64_unicode(encoded: &str) -> Result<String> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = BASE64.decode(compact.as_bytes())?;
    Ok(String::from_utf8(bytes)?)
}
