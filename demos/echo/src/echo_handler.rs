use crate::EchoError;

use headers::{ContentType, HeaderMapExt};
use http::header::SET_COOKIE;
use lambda_gateway::{HeaderValue, HttpRequest, RequestExt, ResponseWriter, StatusCode};
use mime::Mime;
use serde_json::{json, Map, Value};

/// Echo the request back to the client.
///
///  * `/binary` returns the request body verbatim as `application/octet-stream`.
///  * `/cookies` sets two cookies and returns no body.
///  * Any other path returns a JSON description of the request. JSON request bodies are parsed
///    and embedded as JSON. Other bodies are embedded as (lossy) UTF-8 text.
pub fn echo(request: HttpRequest, response: &mut ResponseWriter) {
  match request.uri().path() {
    "/binary" => {
      response
        .headers_mut()
        .typed_insert(ContentType::octet_stream());
      response.write_body(request.body());
    }
    "/cookies" => {
      let headers = response.headers_mut();
      headers.append(SET_COOKIE, HeaderValue::from_static("flavor=oatmeal"));
      headers.append(
        SET_COOKIE,
        HeaderValue::from_static("session=abc123; HttpOnly"),
      );
      response.write_header(StatusCode::NO_CONTENT);
    }
    _ => match describe_request(&request) {
      Ok(description) => {
        response.headers_mut().typed_insert(ContentType::json());
        response.write_header(StatusCode::OK);
        response.write_body(description.to_string().as_bytes());
      }
      Err(err) => err.write_response(response),
    },
  }
}

fn describe_request(request: &HttpRequest) -> Result<Value, EchoError> {
  let mut headers = Map::new();
  for name in request.headers().keys() {
    let values = request
      .headers()
      .get_all(name)
      .iter()
      .map(|value| {
        value
          .to_str()
          .map(|value| Value::String(value.to_owned()))
          .map_err(|err| EchoError::InvalidHeaderUtf8(name.to_owned(), err))
      })
      .collect::<Result<Vec<_>, _>>()?;
    headers.insert(name.to_string(), Value::Array(values));
  }

  let is_json = request
    .headers()
    .typed_get::<ContentType>()
    .map(|content_type| {
      Mime::from(content_type).essence_str() == mime::APPLICATION_JSON.essence_str()
    })
    .unwrap_or(false);
  let body = if request.body().is_empty() {
    Value::Null
  } else if is_json {
    serde_json::from_slice(request.body()).map_err(EchoError::InvalidJsonBody)?
  } else {
    Value::String(String::from_utf8_lossy(request.body()).into_owned())
  };

  let metadata = request.request_metadata();
  let account_id = request
    .proxy_request_context()
    .and_then(|context| context.account_id.as_deref())
    .or_else(|| {
      request
        .http_api_request_context()
        .and_then(|context| context.account_id.as_deref())
    });

  Ok(json!({
    "method": request.method().as_str(),
    "path": request.uri().path(),
    "query": request.uri().query(),
    "host": request.uri().host(),
    "headers": headers,
    "body": body,
    "requestId": metadata.map(|metadata| metadata.request_id.as_str()),
    "stage": metadata.map(|metadata| metadata.stage.as_str()),
    "sourceIp": metadata.and_then(|metadata| metadata.source_ip.as_deref()),
    "traceId": metadata.and_then(|metadata| metadata.trace_id.as_deref()),
    "accountId": account_id,
  }))
}
