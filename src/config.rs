//! Environment-backed runtime settings.
//!
//! Two settings gate startup: the compute endpoint URL (with a documented
//! default) and its API credential (required, non-empty). Validation
//! failures abort startup before anything is served.

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

use crate::server::DEFAULT_PORT;

/// Env var naming the compute endpoint URL.
pub const COMPUTE_URL_ENV: &str = "PARLEY_COMPUTE_URL";
/// Env var naming the compute API credential.
pub const COMPUTE_API_KEY_ENV: &str = "PARLEY_COMPUTE_API_KEY";
/// Env var overriding the HTTP listen port.
pub const PORT_ENV: &str = "PARLEY_PORT";
/// Env var overriding the data directory holding the conversation slot.
pub const DATA_DIR_ENV: &str = "PARLEY_DATA_DIR";

/// Compute endpoint used when [`COMPUTE_URL_ENV`] is unset.
pub const DEFAULT_COMPUTE_URL: &str = "http://localhost:8000/execute";
/// Data directory used when [`DATA_DIR_ENV`] is unset.
const DEFAULT_DATA_DIR: &str = "data";

/// Configuration error type.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required credential is unset or empty.
    #[error("{0} must be set to a non-empty value")]
    MissingCredential(&'static str),
    /// Endpoint value is not a valid URL.
    #[error("invalid url in {name}: {source}")]
    InvalidUrl {
        /// Name of the offending env var.
        name: &'static str,
        /// Underlying parse failure.
        #[source]
        source: url::ParseError,
    },
}

/// Validated runtime settings.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Compute backend endpoint.
    pub compute_url: Url,
    /// Bearer credential for the compute backend.
    pub compute_api_key: String,
    /// HTTP listen port.
    pub port: u16,
    /// Directory holding the conversation slot.
    pub data_dir: PathBuf,
}

impl Settings {
    /// Load and validate settings from the environment.
    ///
    /// # Errors
    /// Fails when the credential is missing or empty, or when the endpoint
    /// URL is malformed. Callers are expected to abort startup.
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = std::env::var(COMPUTE_URL_ENV)
            .unwrap_or_else(|_| DEFAULT_COMPUTE_URL.to_string());
        let key = std::env::var(COMPUTE_API_KEY_ENV).unwrap_or_default();
        let port = std::env::var(PORT_ENV)
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let data_dir = std::env::var(DATA_DIR_ENV)
            .unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());

        Self::build(&url, &key, port, &data_dir)
    }

    /// Validate raw setting values.
    fn build(url: &str, key: &str, port: u16, data_dir: &str) -> Result<Self, ConfigError> {
        let compute_url = Url::parse(url).map_err(|source| ConfigError::InvalidUrl {
            name: COMPUTE_URL_ENV,
            source,
        })?;

        if key.trim().is_empty() {
            return Err(ConfigError::MissingCredential(COMPUTE_API_KEY_ENV));
        }

        Ok(Self {
            compute_url,
            compute_api_key: key.to_string(),
            port,
            data_dir: PathBuf::from(data_dir),
        })
    }
}
