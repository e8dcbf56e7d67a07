use crate::convert::body::{decode_body, encode_body};
use crate::convert::{build_request, split_headers, RequestParts};
use crate::{
  ApiGatewayV2httpRequest, ApiGatewayV2httpResponse, ConversionError, HeaderMap, HeaderValue,
  HttpRequest, HttpResponse, LambdaContext,
};

use backtrace::Backtrace;
use http::header::{Entry, COOKIE, SET_COOKIE};

/// Convert an HTTP API (payload format 2.0) event into an [`HttpRequest`].
///
/// HTTP APIs join repeated headers into a single comma-separated value, so each header value is
/// split on commas and every trimmed segment is appended as its own value. Cookies, which HTTP
/// APIs deliver separately, become one `Cookie` header per cookie. The raw query string is used
/// verbatim.
///
/// The returned request carries `X-Request-Id` and `X-Stage` headers from the event's request
/// context (replacing any sent by the client), plus `X-Amzn-Trace-Id` when the invocation is
/// traced. The original event is available through
/// [`RequestExt::http_api_request_context`](crate::RequestExt::http_api_request_context).
///
/// # Errors
///
/// Fails if the body is flagged as base64-encoded but does not decode, or if the raw path and
/// query string do not form a valid URI path.
pub fn http_api_request(
  event: ApiGatewayV2httpRequest,
  lambda_context: &LambdaContext,
) -> Result<HttpRequest, ConversionError> {
  let path = event.raw_path.clone().unwrap_or_default();
  let query = event.raw_query_string.clone().unwrap_or_default();
  let body = decode_body(event.body.as_deref(), event.is_base64_encoded)?;

  let mut headers = HeaderMap::new();
  for (name, value) in &event.headers {
    for segment in value.as_bytes().split(|byte| *byte == b',') {
      let segment = HeaderValue::from_bytes(trim_whitespace(segment)).map_err(|err| {
        ConversionError::InvalidHeaderValue(name.to_owned(), Box::new(err), Backtrace::new())
      })?;
      headers.append(name.to_owned(), segment);
    }
  }
  for cookie in event.cookies.iter().flatten() {
    let cookie = HeaderValue::try_from(cookie.as_str()).map_err(|err| {
      ConversionError::InvalidHeaderValue(COOKIE, Box::new(err), Backtrace::new())
    })?;
    headers.append(COOKIE, cookie);
  }

  let parts = RequestParts {
    method: event.request_context.http.method.clone(),
    path,
    query,
    headers,
    body,
    is_base64_encoded: event.is_base64_encoded,
    source_ip: event.request_context.http.source_ip.clone(),
    request_id: event.request_context.request_id.clone(),
    stage: event.request_context.stage.clone(),
  };

  build_request(parts, event, lambda_context)
}

/// Convert a captured [`HttpResponse`] into an HTTP API (payload format 2.0) result.
///
/// `Set-Cookie` headers are moved into the result's `cookies` list (one entry per header value,
/// in order) and never appear in the header maps. Bodies with a textual `Content-Type` are
/// returned as text. All other non-empty bodies are base64-encoded.
///
/// # Errors
///
/// Fails if a `Set-Cookie` value is not valid UTF-8.
pub fn http_api_response(
  response: HttpResponse,
) -> Result<ApiGatewayV2httpResponse, ConversionError> {
  let (mut parts, body) = response.into_parts();

  let cookies = match parts.headers.entry(SET_COOKIE) {
    Entry::Occupied(entry) => entry
      .remove_entry_mult()
      .1
      .map(|value| {
        value
          .to_str()
          .map(str::to_owned)
          .map_err(|err| {
            ConversionError::InvalidHeaderUtf8(SET_COOKIE, Box::new(err), Backtrace::new())
          })
      })
      .collect::<Result<Vec<_>, _>>()?,
    Entry::Vacant(_) => Vec::new(),
  };

  let (headers, multi_value_headers) = split_headers(&parts.headers);
  let (body, is_base64_encoded) = encode_body(&parts.headers, body);

  Ok(ApiGatewayV2httpResponse {
    status_code: i64::from(parts.status.as_u16()),
    headers,
    multi_value_headers,
    body: Some(body),
    is_base64_encoded,
    cookies,
  })
}

fn trim_whitespace(bytes: &[u8]) -> &[u8] {
  let start = bytes
    .iter()
    .position(|byte| !byte.is_ascii_whitespace())
    .unwrap_or(bytes.len());
  let end = bytes
    .iter()
    .rposition(|byte| !byte.is_ascii_whitespace())
    .map_or(start, |last| last + 1);
  &bytes[start..end]
}
