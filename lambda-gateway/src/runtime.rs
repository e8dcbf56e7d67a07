use crate::error::format_gateway_error;
use crate::{Gateway, Handler};

use futures::future;
use lambda_runtime::{service_fn, LambdaEvent};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Start the Lambda runtime and serve REST API proxy events (payload format 1.0) with the
/// specified handler.
///
/// This function only returns if the Lambda runtime loop exits.
///
/// # Example
///
/// ```rust,ignore
/// use lambda_gateway::{listen_and_serve_v1, HttpRequest, ResponseWriter};
///
/// #[tokio::main]
/// pub async fn main() -> Result<(), lambda_runtime::Error> {
///   env_logger::init();
///
///   listen_and_serve_v1(|_request: HttpRequest, response: &mut ResponseWriter| {
///     response.write_body(b"Hello, World!");
///   })
///   .await
/// }
/// ```
pub async fn listen_and_serve_v1<H>(handler: H) -> Result<(), lambda_runtime::Error>
where
  H: Handler,
{
  run_gateway(Gateway::v1(handler)).await
}

/// Start the Lambda runtime and serve HTTP API events (payload format 2.0) with the specified
/// handler.
///
/// This function only returns if the Lambda runtime loop exits.
pub async fn listen_and_serve_v2<H>(handler: H) -> Result<(), lambda_runtime::Error>
where
  H: Handler,
{
  run_gateway(Gateway::v2(handler)).await
}

async fn run_gateway<H, E, R>(gateway: Gateway<H, E, R>) -> Result<(), lambda_runtime::Error>
where
  H: Handler,
  E: DeserializeOwned,
  R: Serialize,
{
  lambda_runtime::run(service_fn(|event: LambdaEvent<serde_json::Value>| {
    log::trace!("Lambda context: {:#?}", event.context);

    future::ready(
      gateway
        .invoke(event.payload, event.context)
        .map_err(|err| {
          log::error!("{}", format_gateway_error(&err));
          err
        }),
    )
  }))
  .await
}
