use crate::{HeaderMap, HeaderValue, HttpResponse, StatusCode};

use http::header::CONTENT_TYPE;

use std::io;

/// `Content-Type` assumed for responses whose handler never set one.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain; charset=utf8";

/// In-memory response sink passed to a [`Handler`](crate::Handler).
///
/// Nothing is sent anywhere while the handler runs: the status, headers, and body are buffered
/// and converted into the gateway's result format once the handler returns.
///
/// The status is written at most once. Writing body bytes before calling
/// [`write_header`](ResponseWriter::write_header) implicitly writes `200 OK`.
#[derive(Debug)]
pub struct ResponseWriter {
  headers: HeaderMap,
  status: StatusCode,
  wrote_header: bool,
  body: Vec<u8>,
}

impl ResponseWriter {
  /// Create an empty `200 OK` response without headers or body.
  pub fn new() -> Self {
    Self {
      headers: HeaderMap::new(),
      status: StatusCode::OK,
      wrote_header: false,
      body: Vec::new(),
    }
  }

  /// Response headers.
  pub fn headers(&self) -> &HeaderMap {
    &self.headers
  }

  /// Mutable response headers.
  ///
  /// Headers remain mutable after the status has been written.
  pub fn headers_mut(&mut self) -> &mut HeaderMap {
    &mut self.headers
  }

  /// Write the response status.
  ///
  /// Only the first call has any effect. That first call also sets `Content-Type` to
  /// [`DEFAULT_CONTENT_TYPE`] if the handler has not set one.
  pub fn write_header(&mut self, status: StatusCode) {
    if self.wrote_header {
      return;
    }
    if !self.headers.contains_key(CONTENT_TYPE) {
      self
        .headers
        .insert(CONTENT_TYPE, HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    }
    self.status = status;
    self.wrote_header = true;
  }

  /// Append bytes to the response body, writing a `200 OK` status first if none was written.
  pub fn write_body(&mut self, bytes: &[u8]) {
    if !self.wrote_header {
      self.write_header(StatusCode::OK);
    }
    self.body.extend_from_slice(bytes);
  }

  /// Status that will be returned to the client.
  pub fn status(&self) -> StatusCode {
    self.status
  }

  /// Body bytes written so far.
  pub fn body(&self) -> &[u8] {
    &self.body
  }

  /// Finalize the captured response.
  pub fn into_response(self) -> HttpResponse {
    let mut response = HttpResponse::new(self.body);
    *response.status_mut() = self.status;
    *response.headers_mut() = self.headers;
    response
  }
}

impl Default for ResponseWriter {
  fn default() -> Self {
    Self::new()
  }
}

impl io::Write for ResponseWriter {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    self.write_body(buf);
    Ok(buf.len())
  }

  fn flush(&mut self) -> io::Result<()> {
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::{ResponseWriter, DEFAULT_CONTENT_TYPE};
  use crate::{HeaderValue, StatusCode};

  use http::header::CONTENT_TYPE;
  use pretty_assertions::assert_eq;

  use std::io::Write;

  #[test]
  fn test_no_writes() {
    let response = ResponseWriter::new().into_response();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().is_empty());
    assert!(response.body().is_empty());
  }

  #[test]
  fn test_explicit_status_then_body() {
    let mut writer = ResponseWriter::new();
    writer.write_header(StatusCode::NOT_FOUND);
    writer.write_body(b"test body");

    assert_eq!(writer.status(), StatusCode::NOT_FOUND);
    assert_eq!(writer.body(), b"test body");
  }

  #[test]
  fn test_first_status_wins() {
    let mut writer = ResponseWriter::new();
    writer.write_header(StatusCode::CREATED);
    writer.write_header(StatusCode::INTERNAL_SERVER_ERROR);

    assert_eq!(writer.into_response().status(), StatusCode::CREATED);
  }

  #[test]
  fn test_implicit_status_on_body_write() {
    let mut writer = ResponseWriter::new();
    write!(writer, "Hello, {}!", "World").unwrap();
    writer.write_header(StatusCode::BAD_REQUEST);

    let response = writer.into_response();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.body(), b"Hello, World!");
    assert_eq!(
      response.headers().get(CONTENT_TYPE).unwrap(),
      DEFAULT_CONTENT_TYPE
    );
  }

  #[test]
  fn test_handler_content_type_preserved() {
    let mut writer = ResponseWriter::new();
    writer
      .headers_mut()
      .insert(CONTENT_TYPE, HeaderValue::from_static("image/png"));
    writer.write_body(&[0x89, 0x50, 0x4e, 0x47]);

    assert_eq!(writer.headers().get(CONTENT_TYPE).unwrap(), "image/png");
    assert_eq!(writer.headers().get_all(CONTENT_TYPE).iter().count(), 1);
  }
}
