//! Issue, validate and renew a license.
//!
//! # Running
//!
//! Against an in-memory Ed25519 key:
//! ```bash
//! cargo run --example issue_and_renew
//! ```
//!
//! Against a Vault transit engine:
//! ```bash
//! export LICENSOR_SIGNER_ADDR="http://127.0.0.1:8200"
//! export LICENSOR_SIGNER_TOKEN="..."
//! cargo run --example issue_and_renew
//! ```

use chrono::{Duration, Utc};
use licensor::{
    LicenseAuthority, LicensorConfig, LicensorError, LocalEd25519Signer, SigningBackend,
    VaultTransitClient,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("licensor=debug")),
        )
        .init();

    let outcome = if std::env::var("LICENSOR_SIGNER_TOKEN").is_ok() {
        match LicensorConfig::from_env().and_then(|config| LicenseAuthority::from_config(&config)) {
            Ok(authority) => {
                report_signer(authority.signer().backend()).await;
                run(&authority).await
            }
            Err(e) => Err(e),
        }
    } else {
        println!("LICENSOR_SIGNER_TOKEN not set, using an in-memory key");
        run(&LicenseAuthority::new(LocalEd25519Signer::generate())).await
    };

    if let Err(e) = outcome {
        match &e {
            LicensorError::SigningUnavailable { cause } if e.is_retryable() => {
                eprintln!("Signer temporarily unavailable, try again later: {}", cause);
            }
            LicensorError::InvalidLicense => {
                eprintln!("SECURITY: license failed verification and was not renewed");
            }
            _ => eprintln!("Error: {}", e),
        }
        std::process::exit(1);
    }
}

async fn report_signer(vault: &VaultTransitClient) {
    match vault.health().await {
        Ok(health) => println!("Signer healthy: {} ({:?})", health.is_healthy(), health),
        Err(e) => println!("Signer health unknown: {}", e),
    }
    match vault.list_keys().await {
        Ok(keys) => println!("Transit keys: {:?}", keys),
        Err(e) => println!("Could not list keys: {}", e),
    }
}

async fn run<B: SigningBackend>(authority: &LicenseAuthority<B>) -> Result<(), LicensorError> {
    let modules = vec!["core".to_string(), "api".to_string()];
    let license = authority
        .issue("acme", &modules, Utc::now() + Duration::days(365))
        .await?;
    println!(
        "Issued:\n{}",
        serde_json::to_string_pretty(&license).unwrap_or_default()
    );

    let report = authority.validate(&license).await?;
    println!(
        "Validated: valid={} signature_valid={} expired={}",
        report.valid, report.signature_valid, report.expired
    );

    let renewed = authority
        .renew(&license, Utc::now() + Duration::days(730))
        .await?;
    println!(
        "Renewed {} -> {} (expires {})",
        license.license_id, renewed.license_id, renewed.expires_at
    );

    let mut tampered = renewed.clone();
    tampered.modules.push("enterprise".to_string());
    let report = authority.validate(&tampered).await?;
    println!("Tampered copy: signature_valid={}", report.signature_valid);

    Ok(())
}
