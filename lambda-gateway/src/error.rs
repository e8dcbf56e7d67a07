use crate::HeaderName;

// Until std::error::Backtrace is fully stabilized, we can't embed a type named `Backtrace` within
// a thiserror::Error (see https://github.com/dtolnay/thiserror/issues/204).
use backtrace::Backtrace as _Backtrace;
use itertools::Itertools;
use thiserror::Error;

/// Error that occurred while converting between an Amazon API Gateway event/result and its
/// [`http`] representation.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConversionError {
  /// Invalid base64 encoding for request body.
  // The base64 encoding comes from AWS, so this is almost certainly an internal error.
  #[error("invalid base64 encoding for request body")]
  InvalidBodyBase64(#[source] Box<base64::DecodeError>, _Backtrace),
  /// Header value contains bytes that are not valid UTF-8.
  #[error("invalid UTF-8 encoding for header `{0}`")]
  InvalidHeaderUtf8(
    HeaderName,
    #[source] Box<http::header::ToStrError>,
    _Backtrace,
  ),
  /// Header value contains characters that HTTP does not permit.
  #[error("invalid value for header `{0}`")]
  InvalidHeaderValue(
    HeaderName,
    #[source] Box<http::header::InvalidHeaderValue>,
    _Backtrace,
  ),
  /// Request path (including its query string) is not a valid URI path.
  #[error("failed to parse request path `{path_and_query}`")]
  InvalidPath {
    /// Path and query string that failed to parse.
    path_and_query: String,
    /// Underlying error that occurred while parsing the path.
    #[source]
    source: Box<http::uri::InvalidUri>,
    /// Stack trace indicating where the error occurred.
    backtrace: _Backtrace,
  },
  /// Failed to assemble the request URI from its parts.
  #[error("failed to assemble request URI")]
  InvalidUri(#[source] Box<http::uri::InvalidUriParts>, _Backtrace),
}

impl ConversionError {
  /// Return the backtrace associated with the error, if known.
  pub fn backtrace(&self) -> Option<&_Backtrace> {
    match self {
      ConversionError::InvalidBodyBase64(_, backtrace)
      | ConversionError::InvalidHeaderUtf8(_, _, backtrace)
      | ConversionError::InvalidHeaderValue(_, _, backtrace)
      | ConversionError::InvalidPath { backtrace, .. }
      | ConversionError::InvalidUri(_, backtrace) => Some(backtrace),
    }
  }

  /// Return the name of the error variant (e.g., `InvalidBodyBase64`).
  pub fn name(&self) -> &str {
    match self {
      ConversionError::InvalidBodyBase64(_, _) => "InvalidBodyBase64",
      ConversionError::InvalidHeaderUtf8(_, _, _) => "InvalidHeaderUtf8",
      ConversionError::InvalidHeaderValue(_, _, _) => "InvalidHeaderValue",
      ConversionError::InvalidPath { .. } => "InvalidPath",
      ConversionError::InvalidUri(_, _) => "InvalidUri",
    }
  }
}

/// Error that aborted a Lambda invocation.
///
/// Every variant except [`Panic`](GatewayError::Panic) is returned to the Lambda runtime, which
/// reports it as the invocation error. The user handler never runs if the incoming event fails to
/// decode or convert.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum GatewayError {
  /// Failed to deserialize the incoming event payload.
  #[error("failed to unmarshal payload")]
  DecodePayload(
    #[source] Box<serde_path_to_error::Error<serde_json::Error>>,
    _Backtrace,
  ),
  /// Failed to convert the gateway event into an HTTP request.
  #[error("failed to convert event to request")]
  ConvertRequest(#[source] ConversionError),
  /// Failed to convert the captured HTTP response into a gateway result.
  #[error("failed to convert response")]
  ConvertResponse(#[source] ConversionError),
  /// Failed to serialize the gateway result.
  #[error("failed to marshal response")]
  EncodePayload(
    #[source] Box<serde_path_to_error::Error<serde_json::Error>>,
    _Backtrace,
  ),
  /// Request handler panicked.
  ///
  /// This error is only logged. The invocation itself completes with a
  /// `500 Internal Server Error` response.
  #[error("request handler panicked: {0}")]
  Panic(String, _Backtrace),
}

impl GatewayError {
  /// Return the backtrace associated with the error, if known.
  ///
  /// Conversion failures return the backtrace captured where the underlying
  /// [`ConversionError`] occurred.
  pub fn backtrace(&self) -> Option<&_Backtrace> {
    match self {
      GatewayError::DecodePayload(_, backtrace)
      | GatewayError::EncodePayload(_, backtrace)
      | GatewayError::Panic(_, backtrace) => Some(backtrace),
      GatewayError::ConvertRequest(err) | GatewayError::ConvertResponse(err) => err.backtrace(),
    }
  }

  /// Return the name of the error variant (e.g., `ConvertRequest`).
  pub fn name(&self) -> &str {
    match self {
      GatewayError::DecodePayload(_, _) => "DecodePayload",
      GatewayError::ConvertRequest(_) => "ConvertRequest",
      GatewayError::ConvertResponse(_) => "ConvertResponse",
      GatewayError::EncodePayload(_, _) => "EncodePayload",
      GatewayError::Panic(_, _) => "Panic",
    }
  }
}

/// Helper function for formatting an error as a string containing a human-readable chain of causes.
///
/// This function will walk over the chain of causes returned by
/// [`Error::source`](std::error::Error::source) and append each underlying error (using the
/// [`Display`](std::fmt::Display) trait).
///
/// # Arguments
///
/// * `err` - Error to format.
/// * `name` - Optional name of the error type/variant (e.g., `GatewayError::ConvertRequest`).
/// * `backtrace` - Optional [`Backtrace`](backtrace::Backtrace) indicating where the top-level
///   error occurred.
pub fn format_error(
  err: &dyn std::error::Error,
  name: Option<&str>,
  backtrace: Option<&_Backtrace>,
) -> String {
  let err_line = name
    .map(|n| format!("{}: {}", n, err))
    .unwrap_or_else(|| err.to_string());

  let top_error = if let Some(bt) = backtrace {
    format!("{err_line}\n  stack trace:\n{}", format_backtrace(bt, 4))
  } else {
    err_line
  };

  let cause_str = ErrorCauseIterator(err.source())
    .map(|cause| format!("  caused by: {cause}"))
    .join("\n");

  if !cause_str.is_empty() {
    format!("{top_error}\n{cause_str}")
  } else {
    top_error
  }
}

pub(crate) fn format_gateway_error(err: &GatewayError) -> String {
  format_error(
    err,
    Some(&format!("GatewayError::{}", err.name())),
    err.backtrace(),
  )
}

struct ErrorCauseIterator<'a>(Option<&'a (dyn std::error::Error + 'static)>);

impl<'a> Iterator for ErrorCauseIterator<'a> {
  type Item = &'a (dyn std::error::Error + 'static);

  fn next(&mut self) -> Option<Self::Item> {
    let current = self.0;
    self.0 = current.and_then(|err| err.source());
    current
  }
}

fn format_backtrace(backtrace: &_Backtrace, indent: usize) -> String {
  let indent_str = " ".repeat(indent);
  format!("{backtrace:?}")
    .lines()
    .map(|line| format!("{indent_str}{line}"))
    .join("\n")
}
