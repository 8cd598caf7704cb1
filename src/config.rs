//! Licensor configuration.

use std::time::Duration;
use url::Url;

/// Default signer address (local Vault dev server).
pub const DEFAULT_SIGNER_ADDR: &str = "http://127.0.0.1:8200";

/// Default transit engine mount path.
pub const DEFAULT_TRANSIT_MOUNT: &str = "transit";

/// Default name of the key used to sign licenses.
pub const DEFAULT_SIGNING_KEY: &str = "license-signing-key";

/// Default bound on each signer call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the key-management signer used by the license authority.
///
/// Custom `Debug` implementation redacts the `signer_token` field.
#[derive(Clone)]
pub struct LicensorConfig {
    /// Base address of the key-management service (e.g. `https://vault.internal:8200`).
    pub signer_addr: Url,

    /// Bearer credential for the signer. Supplied by the deployment.
    pub signer_token: String,

    /// Mount path of the transit secrets engine.
    pub transit_mount: String,

    /// Name of the signing key associated with licenses.
    pub signing_key: String,

    /// Upper bound on every sign/verify call.
    pub timeout: Duration,
}

impl std::fmt::Debug for LicensorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LicensorConfig")
            .field("signer_addr", &self.signer_addr)
            .field("signer_token", &"[REDACTED]")
            .field("transit_mount", &self.transit_mount)
            .field("signing_key", &self.signing_key)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl LicensorConfig {
    /// Configuration with defaults for everything but the address and credential.
    pub fn new(signer_addr: Url, signer_token: impl Into<String>) -> Self {
        Self {
            signer_addr,
            signer_token: signer_token.into(),
            transit_mount: DEFAULT_TRANSIT_MOUNT.to_string(),
            signing_key: DEFAULT_SIGNING_KEY.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `LICENSOR_SIGNER_ADDR` (default: `http://127.0.0.1:8200`)
    /// - `LICENSOR_SIGNER_TOKEN` (required)
    /// - `LICENSOR_TRANSIT_MOUNT` (default: `transit`)
    /// - `LICENSOR_SIGNING_KEY` (default: `license-signing-key`)
    /// - `LICENSOR_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, crate::LicensorError> {
        let signer_token = std::env::var("LICENSOR_SIGNER_TOKEN").map_err(|_| {
            crate::LicensorError::ConfigError(
                "LICENSOR_SIGNER_TOKEN environment variable is required".to_string(),
            )
        })?;

        let raw_addr =
            std::env::var("LICENSOR_SIGNER_ADDR").unwrap_or_else(|_| DEFAULT_SIGNER_ADDR.into());
        let signer_addr = Url::parse(&raw_addr).map_err(|e| {
            crate::LicensorError::ConfigError(format!("invalid LICENSOR_SIGNER_ADDR: {}", e))
        })?;

        let timeout = match std::env::var("LICENSOR_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(raw.parse().map_err(|_| {
                crate::LicensorError::ConfigError(format!(
                    "LICENSOR_TIMEOUT_SECS must be a whole number of seconds, got {:?}",
                    raw
                ))
            })?),
            Err(_) => DEFAULT_TIMEOUT,
        };

        let config = Self {
            signer_addr,
            signer_token,
            transit_mount: std::env::var("LICENSOR_TRANSIT_MOUNT")
                .unwrap_or_else(|_| DEFAULT_TRANSIT_MOUNT.into()),
            signing_key: std::env::var("LICENSOR_SIGNING_KEY")
                .unwrap_or_else(|_| DEFAULT_SIGNING_KEY.into()),
            timeout,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for obvious errors.
    pub fn validate(&self) -> Result<(), crate::LicensorError> {
        if self.signer_token.trim().is_empty() {
            return Err(crate::LicensorError::ConfigError(
                "signer_token cannot be empty".to_string(),
            ));
        }
        if self.transit_mount.trim_matches('/').is_empty() {
            return Err(crate::LicensorError::ConfigError(
                "transit_mount cannot be empty".to_string(),
            ));
        }
        if self.signing_key.is_empty() || self.signing_key.contains('/') {
            return Err(crate::LicensorError::ConfigError(format!(
                "signing_key must be a non-empty name without '/', got {:?}",
                self.signing_key
            )));
        }
        if self.timeout.is_zero() {
            return Err(crate::LicensorError::ConfigError(
                "timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
