//! # Licensor
//!
//! **Signed license issuance, validation and renewal for Rust services.**
//!
//! Licensor issues licenses whose authenticity rests on an asymmetric
//! signature produced by an external key-management service (the Vault
//! transit engine in production), and later re-checks those signatures.
//!
//! ## Features
//!
//! - **Canonical encoding** — every license field except the signature is
//!   serialized in one fixed byte layout, so any change to any field breaks
//!   the signature
//! - **Fail-closed verification** — an unreachable verifier means "not
//!   valid", never "trust it anyway"
//! - **Fail-loud signing** — signer failures surface as
//!   [`LicensorError::SigningUnavailable`] with the underlying cause
//! - **Renewal lineage** — a renewal is a new license pointing back at its
//!   predecessor through `renewed_from`, and only authentic licenses renew
//! - **Bounded calls** — every signer call is timeout-bounded and
//!   cancellable by dropping the future
//!
//! ## Quickstart
//!
//! ```no_run
//! use licensor::{LicenseAuthority, LicensorConfig};
//! use chrono::{Duration, Utc};
//!
//! # async fn run() -> Result<(), licensor::LicensorError> {
//! let config = LicensorConfig::from_env()?;
//! let authority = LicenseAuthority::from_config(&config)?;
//!
//! let modules = vec!["core".to_string(), "api".to_string()];
//! let license = authority
//!     .issue("acme", &modules, Utc::now() + Duration::days(365))
//!     .await?;
//!
//! let report = authority.validate(&license).await?;
//! assert!(report.valid);
//!
//! let renewed = authority
//!     .renew(&license, Utc::now() + Duration::days(730))
//!     .await?;
//! assert_eq!(renewed.renewed_from.as_deref(), Some(license.license_id.as_str()));
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! - `signer_addr` — base address of the key-management service
//! - `signer_token` — bearer credential supplied by the deployment
//! - `signing_key` — transit key used for licenses (`license-signing-key`)
//! - `timeout` — bound on every sign/verify call (30 s)
//!
//! See [`LicensorConfig`] for full documentation.

#![warn(missing_docs)]

// Core modules
pub mod clock;
pub mod config;
pub mod errors;

// Crypto layer
pub mod crypto;

// Protocol layer
pub mod protocol;

// Client layer
pub mod client;

// Policy layer
pub mod policy;

// Authority (main public API)
pub mod manager;

// Re-exports for public API
pub use client::backend::SigningBackend;
pub use client::signing::SigningClient;
pub use client::vault::{SignerHealth, VaultTransitClient};
pub use clock::{Clock, SystemClock};
pub use config::LicensorConfig;
pub use crypto::local::LocalEd25519Signer;
pub use errors::{LicensorError, SignerFault};
pub use manager::LicenseAuthority;
pub use protocol::models::{License, LicenseDraft, ValidationReport};
pub use protocol::requests::{IssueRequest, RenewRequest, ValidateRequest};

#[cfg(any(test, feature = "test-seams"))]
pub use clock::MockClock;
