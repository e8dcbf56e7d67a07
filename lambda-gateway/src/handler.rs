use crate::{HttpRequest, ResponseWriter};

/// Synchronous HTTP request handler.
///
/// A handler reads the request and produces its response purely through side effects on the
/// [`ResponseWriter`]. It has no way to return an error: failures should be written to the
/// response as an appropriate status and body, exactly as they would be sent to the client.
///
/// Gateway-specific metadata (e.g., authorizer claims) is available through the
/// [`RequestExt`](crate::RequestExt) methods on the request.
///
/// Any `Fn(HttpRequest, &mut ResponseWriter)` closure is a handler:
/// ```rust
/// use lambda_gateway::{Gateway, HttpRequest, ResponseWriter, StatusCode};
///
/// let gateway = Gateway::v2(|request: HttpRequest, response: &mut ResponseWriter| {
///   response.write_header(StatusCode::OK);
///   response.write_body(request.uri().path().as_bytes());
/// });
/// # let _ = gateway;
/// ```
pub trait Handler {
  /// Handle a single request.
  ///
  /// # Arguments
  ///
  /// * `request` - Request converted from the incoming gateway event.
  /// * `response` - Sink capturing the response status, headers, and body.
  fn serve(&self, request: HttpRequest, response: &mut ResponseWriter);
}

impl<F> Handler for F
where
  F: Fn(HttpRequest, &mut ResponseWriter),
{
  fn serve(&self, request: HttpRequest, response: &mut ResponseWriter) {
    self(request, response)
  }
}
