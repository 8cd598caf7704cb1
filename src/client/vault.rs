//! Reqwest-based client for the Vault transit secrets engine.
//!
//! Sign and verify go through [`SigningBackend`]; listing keys, reading key
//! metadata, and checking signer health are pass-through diagnostics.
//! Errors never carry the signer address or the credential.

use crate::client::backend::SigningBackend;
use crate::config::LicensorConfig;
use crate::errors::SignerFault;
use crate::LicensorError;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Vault response envelope; payloads live under `data`.
#[derive(Debug, Deserialize)]
struct VaultEnvelope<T> {
    data: Option<T>,
}

/// Vault error body.
#[derive(Debug, Default, Deserialize)]
struct VaultErrors {
    #[serde(default)]
    errors: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SignData {
    signature: String,
}

#[derive(Debug, Deserialize)]
struct VerifyData {
    valid: bool,
}

#[derive(Debug, Deserialize)]
struct KeyListData {
    #[serde(default)]
    keys: Vec<String>,
}

#[derive(Debug, Serialize)]
struct SignBody<'a> {
    input: &'a str,
}

#[derive(Debug, Serialize)]
struct VerifyBody<'a> {
    input: &'a str,
    signature: &'a str,
}

/// Health of the key-management service as reported by `sys/health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SignerHealth {
    /// HTTP status of the health endpoint (200 active, 429 standby, 503 sealed, ...).
    #[serde(default)]
    pub status: u16,
    /// Whether the service has been initialized.
    #[serde(default)]
    pub initialized: bool,
    /// Whether the service is sealed.
    #[serde(default)]
    pub sealed: bool,
    /// Whether this node is a standby.
    #[serde(default)]
    pub standby: bool,
    /// Server version, if reported.
    #[serde(default)]
    pub version: Option<String>,
}

impl SignerHealth {
    /// The signer can serve sign/verify requests.
    pub fn is_healthy(&self) -> bool {
        self.status == 200 && self.initialized && !self.sealed
    }
}

/// Vault transit HTTP client.
#[derive(Debug, Clone)]
pub struct VaultTransitClient {
    client: Client,
    base: String,
    mount: String,
    key_name: String,
    timeout: Duration,
}

impl VaultTransitClient {
    /// Create a transit client from config.
    pub fn new(config: &LicensorConfig) -> Result<Self, LicensorError> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.signer_token))
            .map_err(|_| {
                LicensorError::ConfigError("signer_token contains invalid characters".to_string())
            })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(build_user_agent())
            .default_headers(headers)
            .build()
            .map_err(|e| {
                LicensorError::ConfigError(format!(
                    "Failed to build HTTP client: {}",
                    e.without_url()
                ))
            })?;

        Ok(Self {
            client,
            base: config.signer_addr.as_str().trim_end_matches('/').to_string(),
            mount: config.transit_mount.trim_matches('/').to_string(),
            key_name: config.signing_key.clone(),
            timeout: config.timeout,
        })
    }

    /// Name of the key used for licenses.
    pub fn key_name(&self) -> &str {
        &self.key_name
    }

    fn transit_url(&self, action: &str, key: &str) -> String {
        format!("{}/v1/{}/{}/{}", self.base, self.mount, action, key)
    }

    /// List the names of the keys in the transit engine.
    pub async fn list_keys(&self) -> Result<Vec<String>, LicensorError> {
        let url = format!("{}/v1/{}/keys", self.base, self.mount);
        let request = self.client.get(url).query(&[("list", "true")]);

        match self.send_json::<KeyListData>(request, "list keys").await {
            Ok(data) => Ok(data.keys),
            // Vault answers 404 to a LIST with nothing under it.
            Err(SignerFault::Status { status: 404, .. }) => Ok(Vec::new()),
            Err(fault) => Err(LicensorError::KeyManagement(fault)),
        }
    }

    /// Read the metadata of one key (type, versions, exportability, ...).
    pub async fn key_info(&self, key_name: &str) -> Result<serde_json::Value, LicensorError> {
        if key_name.is_empty() || key_name.contains('/') {
            return Err(LicensorError::InvalidRequest(format!(
                "invalid key name {:?}",
                key_name
            )));
        }
        let request = self.client.get(self.transit_url("keys", key_name));
        self.send_json(request, "key info")
            .await
            .map_err(LicensorError::KeyManagement)
    }

    /// Query `sys/health`. Non-200 statuses that carry a health body
    /// (standby, sealed, uninitialized) are reported, not treated as errors.
    pub async fn health(&self) -> Result<SignerHealth, LicensorError> {
        let url = format!("{}/v1/sys/health", self.base);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LicensorError::KeyManagement(self.transport_fault(e)))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| LicensorError::KeyManagement(self.transport_fault(e)))?;

        let mut health: SignerHealth = serde_json::from_slice(&body).map_err(|e| {
            LicensorError::KeyManagement(SignerFault::MalformedResponse(format!(
                "health: {}",
                e
            )))
        })?;
        health.status = status;
        Ok(health)
    }

    /// Send a request and unwrap the `data` member of a success response.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        operation: &str,
    ) -> Result<T, SignerFault> {
        let response = request.send().await.map_err(|e| self.transport_fault(e))?;
        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.transport_fault(e))?;

        if !status.is_success() {
            return Err(SignerFault::Status {
                status: status.as_u16(),
                message: vault_error_message(status, &body),
            });
        }

        let envelope: VaultEnvelope<T> = serde_json::from_slice(&body)
            .map_err(|e| SignerFault::MalformedResponse(format!("{}: {}", operation, e)))?;

        envelope
            .data
            .ok_or_else(|| SignerFault::MalformedResponse(format!("{}: missing data", operation)))
    }

    fn transport_fault(&self, e: reqwest::Error) -> SignerFault {
        if e.is_timeout() {
            SignerFault::Timeout(self.timeout)
        } else {
            SignerFault::Transport(e.without_url().to_string())
        }
    }
}

#[async_trait]
impl SigningBackend for VaultTransitClient {
    async fn sign(&self, payload: &[u8]) -> Result<String, SignerFault> {
        let input = STANDARD.encode(payload);
        let request = self
            .client
            .post(self.transit_url("sign", &self.key_name))
            .json(&SignBody { input: &input });

        let data: SignData = self.send_json(request, "sign").await?;
        if data.signature.trim().is_empty() {
            return Err(SignerFault::MalformedResponse(
                "sign: empty signature".to_string(),
            ));
        }
        Ok(data.signature)
    }

    async fn verify(&self, payload: &[u8], signature: &str) -> Result<bool, SignerFault> {
        let input = STANDARD.encode(payload);
        let request = self
            .client
            .post(self.transit_url("verify", &self.key_name))
            .json(&VerifyBody {
                input: &input,
                signature,
            });

        let data: VerifyData = self.send_json(request, "verify").await?;
        Ok(data.valid)
    }
}

/// First message of a Vault `{"errors": [...]}` body, or the status reason.
fn vault_error_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<VaultErrors>(body)
        .ok()
        .and_then(|e| e.errors.into_iter().find(|m| !m.is_empty()))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string())
}

/// Build the User-Agent string: `licensor/<version>`.
pub fn build_user_agent() -> String {
    format!("licensor/{}", env!("CARGO_PKG_VERSION"))
}
