use crate::convert::{http_api_request, http_api_response, proxy_request, proxy_response};
use crate::error::format_gateway_error;
use crate::{
  ApiGatewayProxyRequest, ApiGatewayProxyResponse, ApiGatewayV2httpRequest,
  ApiGatewayV2httpResponse, ConversionError, GatewayError, Handler, HttpRequest, HttpResponse,
  LambdaContext, ResponseWriter, StatusCode,
};

use backtrace::Backtrace;
use serde::de::DeserializeOwned;
use serde::Serialize;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Function converting a gateway event of type `E` into an [`HttpRequest`].
pub type RequestConverter<E> = fn(E, &LambdaContext) -> Result<HttpRequest, ConversionError>;

/// Function converting a captured [`HttpResponse`] into a gateway result of type `R`.
pub type ResponseConverter<R> = fn(HttpResponse) -> Result<R, ConversionError>;

/// Adapter that runs a [`Handler`] for each Lambda invocation.
///
/// Every invocation is independent: the event is decoded, converted into an [`HttpRequest`],
/// dispatched to the handler along with a fresh [`ResponseWriter`], and the captured response is
/// converted back into the gateway's result format. The first step that fails aborts the
/// invocation.
///
/// Use [`Gateway::v1`] for REST APIs (and HTTP APIs configured with payload format 1.0) or
/// [`Gateway::v2`] for HTTP APIs using payload format 2.0.
pub struct Gateway<H, E, R> {
  handler: H,
  request_converter: RequestConverter<E>,
  response_converter: ResponseConverter<R>,
}

impl<H> Gateway<H, ApiGatewayProxyRequest, ApiGatewayProxyResponse>
where
  H: Handler,
{
  /// Gateway for REST API proxy integrations (payload format 1.0).
  pub fn v1(handler: H) -> Self {
    Self::new(handler, proxy_request, proxy_response)
  }
}

impl<H> Gateway<H, ApiGatewayV2httpRequest, ApiGatewayV2httpResponse>
where
  H: Handler,
{
  /// Gateway for HTTP API integrations (payload format 2.0).
  pub fn v2(handler: H) -> Self {
    Self::new(handler, http_api_request, http_api_response)
  }
}

impl<H, E, R> Gateway<H, E, R>
where
  H: Handler,
  E: DeserializeOwned,
  R: Serialize,
{
  /// Gateway using a custom pair of converters.
  pub fn new(
    handler: H,
    request_converter: RequestConverter<E>,
    response_converter: ResponseConverter<R>,
  ) -> Self {
    Self {
      handler,
      request_converter,
      response_converter,
    }
  }

  /// Handle a single Lambda invocation.
  ///
  /// # Arguments
  ///
  /// * `payload` - JSON event sent by the gateway.
  /// * `lambda_context` - Lambda execution context of the invocation.
  ///
  /// # Errors
  ///
  /// Fails if the payload is not a valid event, the event cannot be converted into a request,
  /// the response cannot be converted into a result, or the result cannot be serialized. The
  /// handler does not run if the event fails to decode or convert.
  pub fn invoke(
    &self,
    payload: serde_json::Value,
    lambda_context: LambdaContext,
  ) -> Result<serde_json::Value, GatewayError> {
    let event = serde_path_to_error::deserialize::<_, E>(payload)
      .map_err(|err| GatewayError::DecodePayload(Box::new(err), Backtrace::new()))?;

    let request =
      (self.request_converter)(event, &lambda_context).map_err(GatewayError::ConvertRequest)?;
    log::debug!("Dispatching {} {}", request.method(), request.uri());

    let response = self.dispatch(request);
    log::debug!("Handler responded with status {}", response.status());

    let result = (self.response_converter)(response).map_err(GatewayError::ConvertResponse)?;

    serde_path_to_error::serialize(&result, serde_json::value::Serializer)
      .map_err(|err| GatewayError::EncodePayload(Box::new(err), Backtrace::new()))
  }

  fn dispatch(&self, request: HttpRequest) -> HttpResponse {
    log::trace!("Request: {request:#?}");

    let mut writer = ResponseWriter::new();
    match panic::catch_unwind(AssertUnwindSafe(|| {
      self.handler.serve(request, &mut writer)
    })) {
      Ok(()) => writer.into_response(),
      Err(panic) => {
        let err = GatewayError::Panic(
          // If the panic value isn't a String or &str, don't catch it since we can't print it and
          // it's unclear what we should do instead.
          panic_string(panic).unwrap_or_else(|panic| panic::resume_unwind(panic)),
          // The panic doesn't give us a stack trace unless we set a panic hook, which might
          // interfere with the user's own error handling. Instead, we capture a backtrace
          // indicating where we caught the panic.
          Backtrace::new(),
        );
        log::error!("{}", format_gateway_error(&err));

        let mut response = HttpResponse::new(Vec::new());
        *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        response
      }
    }
  }
}

/// Extract the panic string after catching a panic.
fn panic_string(panic: Box<dyn Any + Send>) -> Result<String, Box<dyn Any + Send>> {
  panic
    .downcast::<String>()
    .map(|panic| *panic)
    .or_else(|panic| panic.downcast::<&str>().map(|msg| msg.to_string()))
}
