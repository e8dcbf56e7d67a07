//! Each supported payload format has a request converter, turning the gateway event into an
//! [`HttpRequest`], and a response converter, turning the captured [`HttpResponse`] into the
//! gateway result. Conversions are pure: they perform no I/O and keep no state between calls.
//!
//! | Payload format           | Request converter     | Response converter     |
//! |--------------------------|-----------------------|------------------------|
//! | REST API / 1.0 (legacy)  | [`proxy_request`]     | [`proxy_response`]     |
//! | HTTP API / 2.0           | [`http_api_request`]  | [`http_api_response`]  |

use crate::context::GatewayEvent;
use crate::{
  ConversionError, HeaderMap, HeaderName, HeaderValue, HttpRequest, LambdaContext, Method,
  RequestMetadata,
};

use backtrace::Backtrace;
use http::header::{CONTENT_LENGTH, HOST};
use http::uri::{self, Authority, PathAndQuery, Scheme};
use http::Uri;
use itertools::Itertools;

mod body;
mod v1;
mod v2;


pub use v1::{proxy_request, proxy_response};
pub use v2::{http_api_request, http_api_response};

/// Request header carrying the API Gateway request ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");
/// Request header carrying the API Gateway deployment stage.
pub const X_STAGE: HeaderName = HeaderName::from_static("x-stage");
/// Request header carrying the AWS X-Ray trace ID of the invocation.
pub const X_AMZN_TRACE_ID: HeaderName = HeaderName::from_static("x-amzn-trace-id");

const X_FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");

/// Schema-independent pieces of a request, extracted from a gateway event.
struct RequestParts {
  method: Method,
  path: String,
  query: String,
  headers: HeaderMap,
  body: Vec<u8>,
  is_base64_encoded: bool,
  source_ip: Option<String>,
  request_id: Option<String>,
  stage: Option<String>,
}

/// Assemble the [`HttpRequest`] shared by both payload formats and attach the original event.
fn build_request<E>(
  parts: RequestParts,
  event: E,
  lambda_context: &LambdaContext,
) -> Result<HttpRequest, ConversionError>
where
  E: Clone + Send + Sync + 'static,
{
  let RequestParts {
    method,
    path,
    query,
    mut headers,
    body,
    is_base64_encoded,
    source_ip,
    request_id,
    stage,
  } = parts;

  let path = if path.is_empty() { "/".to_string() } else { path };
  let path_and_query = if query.is_empty() {
    path
  } else {
    format!("{path}?{query}")
  };
  let path_and_query = PathAndQuery::try_from(path_and_query.as_str()).map_err(|err| {
    ConversionError::InvalidPath {
      path_and_query: path_and_query.clone(),
      source: Box::new(err),
      backtrace: Backtrace::new(),
    }
  })?;

  if !headers.contains_key(CONTENT_LENGTH) && !body.is_empty() {
    headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
  }

  let request_id = request_id.unwrap_or_default();
  let stage = stage.unwrap_or_default();
  headers.insert(X_REQUEST_ID, header_value(&X_REQUEST_ID, &request_id)?);
  headers.insert(X_STAGE, header_value(&X_STAGE, &stage)?);

  let trace_id = lambda_context.xray_trace_id.clone();
  if let Some(trace_id) = &trace_id {
    headers.insert(X_AMZN_TRACE_ID, header_value(&X_AMZN_TRACE_ID, trace_id)?);
  }

  let uri = request_uri(path_and_query, &headers)?;

  let mut request = HttpRequest::new(body);
  *request.method_mut() = method;
  *request.uri_mut() = uri;
  *request.headers_mut() = headers;

  let extensions = request.extensions_mut();
  extensions.insert(RequestMetadata {
    source_ip,
    request_id,
    stage,
    trace_id,
    is_base64_encoded,
  });
  extensions.insert(lambda_context.clone());
  extensions.insert(GatewayEvent(event));

  Ok(request)
}

/// Make the request URI absolute when the `Host` header names a valid authority, so that the
/// URI and the `Host` header agree on the host the client addressed.
fn request_uri(path_and_query: PathAndQuery, headers: &HeaderMap) -> Result<Uri, ConversionError> {
  let mut uri_parts = uri::Parts::default();
  if let Some(authority) = headers
    .get(HOST)
    .and_then(|host| Authority::try_from(host.as_bytes()).ok())
  {
    uri_parts.scheme = Some(
      headers
        .get(X_FORWARDED_PROTO)
        .and_then(|proto| Scheme::try_from(proto.as_bytes()).ok())
        .unwrap_or(Scheme::HTTPS),
    );
    uri_parts.authority = Some(authority);
  }
  uri_parts.path_and_query = Some(path_and_query);

  Uri::from_parts(uri_parts)
    .map_err(|err| ConversionError::InvalidUri(Box::new(err), Backtrace::new()))
}

fn header_value(name: &HeaderName, value: &str) -> Result<HeaderValue, ConversionError> {
  HeaderValue::try_from(value).map_err(|err| {
    ConversionError::InvalidHeaderValue(name.to_owned(), Box::new(err), Backtrace::new())
  })
}

/// Split response headers into the `headers` and `multiValueHeaders` maps of a gateway result.
///
/// Names with exactly one value appear in both maps. Names with several values appear only in
/// the multi-value map.
fn split_headers(headers: &HeaderMap) -> (HeaderMap, HeaderMap) {
  let mut single_value_headers = HeaderMap::new();
  let mut multi_value_headers = HeaderMap::new();

  for name in headers.keys() {
    let values = headers.get_all(name).iter().collect_vec();
    if let [value] = values.as_slice() {
      single_value_headers.insert(name.to_owned(), (*value).to_owned());
    }
    for value in values {
      multi_value_headers.append(name.to_owned(), value.to_owned());
    }
  }

  (single_value_headers, multi_value_headers)
}
