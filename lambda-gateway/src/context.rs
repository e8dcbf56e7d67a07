use crate::{
  ApiGatewayProxyRequest, ApiGatewayProxyRequestContext, ApiGatewayV2httpRequest,
  ApiGatewayV2httpRequestContext, LambdaContext, Request,
};

/// Request details from the gateway event that have no place in an [`http::Request`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestMetadata {
  /// IP address of the client that sent the request, if the gateway provided one.
  pub source_ip: Option<String>,
  /// API Gateway request ID (also sent in the `X-Request-Id` header).
  pub request_id: String,
  /// API Gateway deployment stage (also sent in the `X-Stage` header).
  pub stage: String,
  /// AWS X-Ray trace ID of the Lambda invocation, if tracing is enabled.
  pub trace_id: Option<String>,
  /// Whether the gateway delivered the request body base64-encoded.
  pub is_base64_encoded: bool,
}

/// Original gateway event, stored in the request extensions.
#[derive(Clone)]
pub(crate) struct GatewayEvent<E>(pub E);

/// Accessors for the gateway-specific state attached to each converted request.
///
/// This state is scoped to a single request: it lives in the request's
/// [extensions](http::Request::extensions) and is dropped along with it.
///
/// # Example
///
/// ```rust
/// use lambda_gateway::{HttpRequest, RequestExt, ResponseWriter, StatusCode};
///
/// fn handler(request: HttpRequest, response: &mut ResponseWriter) {
///   let account_id = request
///     .proxy_request_context()
///     .and_then(|context| context.account_id.as_deref());
///
///   match account_id {
///     Some(account_id) => response.write_body(account_id.as_bytes()),
///     None => response.write_header(StatusCode::FORBIDDEN),
///   }
/// }
/// # let _ = handler;
/// ```
pub trait RequestExt {
  /// Original gateway event of type `E`, or `None` if the request came from a different schema.
  fn gateway_event<E>(&self) -> Option<&E>
  where
    E: Clone + Send + Sync + 'static;

  /// Request context of a legacy (REST API / payload format 1.0) event.
  fn proxy_request_context(&self) -> Option<&ApiGatewayProxyRequestContext>;

  /// Request context of an HTTP API (payload format 2.0) event.
  fn http_api_request_context(&self) -> Option<&ApiGatewayV2httpRequestContext>;

  /// Lambda execution context of the current invocation (deadline, function ARN, etc.).
  fn lambda_context(&self) -> Option<&LambdaContext>;

  /// Gateway request details that are not part of the HTTP request itself.
  fn request_metadata(&self) -> Option<&RequestMetadata>;
}

impl<B> RequestExt for Request<B> {
  fn gateway_event<E>(&self) -> Option<&E>
  where
    E: Clone + Send + Sync + 'static,
  {
    self
      .extensions()
      .get::<GatewayEvent<E>>()
      .map(|GatewayEvent(event)| event)
  }

  fn proxy_request_context(&self) -> Option<&ApiGatewayProxyRequestContext> {
    self
      .gateway_event::<ApiGatewayProxyRequest>()
      .map(|event| &event.request_context)
  }

  fn http_api_request_context(&self) -> Option<&ApiGatewayV2httpRequestContext> {
    self
      .gateway_event::<ApiGatewayV2httpRequest>()
      .map(|event| &event.request_context)
  }

  fn lambda_context(&self) -> Option<&LambdaContext> {
    self.extensions().get::<LambdaContext>()
  }

  fn request_metadata(&self) -> Option<&RequestMetadata> {
    self.extensions().get::<RequestMetadata>()
  }
}
