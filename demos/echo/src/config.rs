use thiserror::Error;

use std::env::{self, VarError};
use std::str::FromStr;

/// Environment variable selecting the API Gateway payload format.
pub const PAYLOAD_VERSION_VAR: &str = "GATEWAY_PAYLOAD_VERSION";

/// Error reading the runtime configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("unsupported payload version `{0}` (expected `1.0` or `2.0`)")]
  UnsupportedPayloadVersion(String),
  #[error("environment variable `{0}` is not valid Unicode")]
  NotUnicode(&'static str),
}

/// API Gateway payload format version.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadVersion {
  /// REST APIs and HTTP APIs configured with payload format 1.0.
  V1,
  /// HTTP APIs using payload format 2.0.
  V2,
}

impl PayloadVersion {
  /// Read the payload version from [`PAYLOAD_VERSION_VAR`], defaulting to
  /// [`V2`](PayloadVersion::V2) when unset.
  pub fn from_env() -> Result<Self, ConfigError> {
    match env::var(PAYLOAD_VERSION_VAR) {
      Ok(version) => version.parse(),
      Err(VarError::NotPresent) => Ok(PayloadVersion::V2),
      Err(VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode(PAYLOAD_VERSION_VAR)),
    }
  }
}

impl FromStr for PayloadVersion {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim() {
      "1.0" => Ok(PayloadVersion::V1),
      "2.0" => Ok(PayloadVersion::V2),
      other => Err(ConfigError::UnsupportedPayloadVersion(other.to_string())),
    }
  }
}
