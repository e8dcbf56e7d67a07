use crate::{Body, ConversionError, HeaderMap};

use backtrace::Backtrace;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use headers::{ContentType, HeaderMapExt};
use http::header::CONTENT_ENCODING;
use mime::Mime;

/// Non-`text/*` media types whose bodies are sent to the gateway as plain text.
const TEXT_MEDIA_TYPES: &[&str] = &[
  "image/svg+xml",
  "application/json",
  "application/xml",
  "application/javascript",
  "application/vnd.api+json",
];

/// Whether a response body must be base64-encoded before handing it to the gateway.
///
/// Bodies are binary unless `Content-Type` parses as a known textual media type. A gzip
/// `Content-Encoding` always makes the body binary.
pub(crate) fn is_binary(headers: &HeaderMap) -> bool {
  let is_text = headers
    .typed_get::<ContentType>()
    .map(|content_type| is_text_mime(&Mime::from(content_type)))
    .unwrap_or(false);
  let is_gzip = headers
    .get(CONTENT_ENCODING)
    .map(|encoding| encoding == "gzip")
    .unwrap_or(false);

  !is_text || is_gzip
}

pub(crate) fn is_text_mime(mime: &Mime) -> bool {
  mime.type_() == mime::TEXT || TEXT_MEDIA_TYPES.contains(&mime.essence_str())
}

/// Decode a request body delivered by the gateway.
pub(crate) fn decode_body(
  body: Option<&str>,
  is_base64_encoded: bool,
) -> Result<Vec<u8>, ConversionError> {
  let body = body.unwrap_or_default();
  if is_base64_encoded {
    STANDARD
      .decode(body)
      .map_err(|err| ConversionError::InvalidBodyBase64(Box::new(err), Backtrace::new()))
  } else {
    Ok(body.as_bytes().to_vec())
  }
}

/// Encode a captured response body, returning the body and whether it is base64-encoded.
///
/// Empty bodies are always sent as empty text.
pub(crate) fn encode_body(headers: &HeaderMap, body: Vec<u8>) -> (Body, bool) {
  if !body.is_empty() && is_binary(headers) {
    (Body::Text(STANDARD.encode(body)), true)
  } else {
    let text = String::from_utf8(body)
      .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned());
    (Body::Text(text), false)
  }
}
