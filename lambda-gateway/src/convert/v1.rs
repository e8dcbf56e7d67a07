use crate::convert::body::{decode_body, encode_body};
use crate::convert::{build_request, split_headers, RequestParts};
use crate::{
  ApiGatewayProxyRequest, ApiGatewayProxyResponse, ConversionError, HeaderMap, HttpRequest,
  HttpResponse, LambdaContext,
};

use itertools::Itertools;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use std::collections::BTreeMap;

/// Convert a REST API (payload format 1.0) proxy event into an [`HttpRequest`].
///
/// The single-value and multi-value query parameter maps are merged into one query string, with
/// multi-value entries replacing single-value entries of the same name. Headers from the
/// single-value map are inserted first, and multi-value headers are appended after them.
///
/// The returned request carries `X-Request-Id` and `X-Stage` headers from the event's request
/// context (replacing any sent by the client), plus `X-Amzn-Trace-Id` when the invocation is
/// traced. The original event is available through
/// [`RequestExt::proxy_request_context`](crate::RequestExt::proxy_request_context).
///
/// # Errors
///
/// Fails if the body is flagged as base64-encoded but does not decode, or if the path does not
/// form a valid URI path.
pub fn proxy_request(
  event: ApiGatewayProxyRequest,
  lambda_context: &LambdaContext,
) -> Result<HttpRequest, ConversionError> {
  let path = encode_path(event.path.as_deref().unwrap_or_default());
  let query = query_string(&event);
  let body = decode_body(event.body.as_deref(), event.is_base64_encoded)?;

  let mut headers = HeaderMap::new();
  for (name, value) in &event.headers {
    headers.insert(name.to_owned(), value.to_owned());
  }
  for (name, value) in &event.multi_value_headers {
    headers.append(name.to_owned(), value.to_owned());
  }

  let parts = RequestParts {
    method: event.http_method.clone(),
    path,
    query,
    headers,
    body,
    is_base64_encoded: event.is_base64_encoded,
    source_ip: event.request_context.identity.source_ip.clone(),
    request_id: event.request_context.request_id.clone(),
    stage: event.request_context.stage.clone(),
  };

  build_request(parts, event, lambda_context)
}

/// Convert a captured [`HttpResponse`] into a REST API (payload format 1.0) proxy result.
///
/// Bodies with a textual `Content-Type` are returned as text. All other non-empty bodies are
/// base64-encoded.
///
/// # Errors
///
/// This conversion currently always succeeds.
pub fn proxy_response(response: HttpResponse) -> Result<ApiGatewayProxyResponse, ConversionError> {
  let (parts, body) = response.into_parts();
  let (headers, multi_value_headers) = split_headers(&parts.headers);
  let (body, is_base64_encoded) = encode_body(&parts.headers, body);

  Ok(ApiGatewayProxyResponse {
    status_code: i64::from(parts.status.as_u16()),
    headers,
    multi_value_headers,
    body: Some(body),
    is_base64_encoded,
  })
}

/// Bytes escaped when re-encoding a decoded path: everything outside the RFC 3986 `pchar` set
/// except the `/` segment separator.
const PATH_ESCAPE: &AsciiSet = &CONTROLS
  .add(b' ')
  .add(b'"')
  .add(b'#')
  .add(b'%')
  .add(b'<')
  .add(b'>')
  .add(b'?')
  .add(b'[')
  .add(b'\\')
  .add(b']')
  .add(b'^')
  .add(b'`')
  .add(b'{')
  .add(b'|')
  .add(b'}');

// The REST API delivers the path percent-decoded.
fn encode_path(path: &str) -> String {
  utf8_percent_encode(path, PATH_ESCAPE).to_string()
}

fn query_string(event: &ApiGatewayProxyRequest) -> String {
  let mut params = BTreeMap::<&str, Vec<&str>>::new();
  for (key, value) in event.query_string_parameters.iter() {
    params.insert(key, vec![value]);
  }

  let mut multi_value_params = BTreeMap::<&str, Vec<&str>>::new();
  for (key, value) in event.multi_value_query_string_parameters.iter() {
    multi_value_params.entry(key).or_default().push(value);
  }
  params.extend(multi_value_params);

  params
    .iter()
    .flat_map(|(key, values)| {
      values.iter().map(move |value| {
        format!(
          "{}={}",
          urlencoding::encode(key),
          urlencoding::encode(value)
        )
      })
    })
    .join("&")
}
