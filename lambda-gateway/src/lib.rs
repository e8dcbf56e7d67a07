#![doc = include_str!("../../README.md")]
#![warn(missing_docs)]

// These are documented public exports since handlers, converters, or the `Gateway` signatures
// depend on them.
pub use aws_lambda_events::apigw::{
  ApiGatewayProxyRequest, ApiGatewayProxyRequestContext, ApiGatewayProxyResponse,
  ApiGatewayV2httpRequest, ApiGatewayV2httpRequestContext, ApiGatewayV2httpResponse,
};
pub use aws_lambda_events::encodings::Body;
pub use http::{HeaderMap, HeaderName, HeaderValue, Method, Request, Response, StatusCode};
pub use lambda_runtime::{Context as LambdaContext, LambdaEvent};

/// Request context retrieval.
pub mod context;

pub use context::{RequestExt, RequestMetadata};

/// Conversions between Amazon API Gateway events/results and [`http`] types.
pub mod convert;

/// Error handling.
pub mod error;

pub use error::{ConversionError, GatewayError};

mod gateway;

pub use gateway::{Gateway, RequestConverter, ResponseConverter};

mod handler;

pub use handler::Handler;

mod response;

pub use response::{ResponseWriter, DEFAULT_CONTENT_TYPE};

mod runtime;

pub use runtime::{listen_and_serve_v1, listen_and_serve_v2};

/// HTTP request passed to a [`Handler`].
pub type HttpRequest = Request<Vec<u8>>;

/// HTTP response captured from a [`Handler`].
pub type HttpResponse = Response<Vec<u8>>;
