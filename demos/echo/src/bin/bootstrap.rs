use echo::config::PayloadVersion;
use echo::echo_handler::echo;
use lambda_gateway::{listen_and_serve_v1, listen_and_serve_v2};

#[tokio::main]
pub async fn main() -> Result<(), lambda_runtime::Error> {
  // TIP: Use the `log4rs` crate for more fine-grained control over logging.
  env_logger::init();

  match PayloadVersion::from_env()? {
    PayloadVersion::V1 => listen_and_serve_v1(echo).await,
    PayloadVersion::V2 => listen_and_serve_v2(echo).await,
  }
}
