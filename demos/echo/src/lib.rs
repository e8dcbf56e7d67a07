use lambda_gateway::{HeaderName, ResponseWriter, StatusCode};
use thiserror::Error;

/// Runtime configuration read from the environment.
pub mod config;

/// Echo handler implementation.
pub mod echo_handler;

/// Error returned by the echo handler for requests it cannot echo.
#[derive(Debug, Error)]
pub enum EchoError {
  #[error("invalid JSON request body")]
  InvalidJsonBody(#[source] serde_json::Error),
  #[error("invalid UTF-8 encoding for request header `{0}`")]
  InvalidHeaderUtf8(HeaderName, #[source] http::header::ToStrError),
}

impl EchoError {
  /// Write a `400 Bad Request` response describing the error.
  pub fn write_response(&self, response: &mut ResponseWriter) {
    log::debug!("Rejecting request: {self}");

    response.write_header(StatusCode::BAD_REQUEST);
    response.write_body(self.to_string().as_bytes());
  }
}
