//! Input checks performed before any call reaches the signer.
//!
//! Rejecting here keeps malformed requests from costing a network round-trip.

use crate::protocol::models::License;
use crate::LicensorError;

/// Check the caller-supplied fields of an issue request.
///
/// # Returns
/// * `Ok(())` - Inputs are acceptable
/// * `Err(InvalidRequest)` - Blank customer, no modules, or a blank module
pub fn check_issue_inputs(customer: &str, modules: &[String]) -> Result<(), LicensorError> {
    if customer.trim().is_empty() {
        return Err(LicensorError::InvalidRequest(
            "customer cannot be empty".to_string(),
        ));
    }

    if modules.is_empty() {
        return Err(LicensorError::InvalidRequest(
            "modules must list at least one entitlement".to_string(),
        ));
    }

    if let Some(position) = modules.iter().position(|m| m.trim().is_empty()) {
        return Err(LicensorError::InvalidRequest(format!(
            "modules[{}] cannot be empty",
            position
        )));
    }

    Ok(())
}

/// Require that a license carries a non-empty signature.
pub fn require_signature(license: &License) -> Result<&str, LicensorError> {
    license.signature().ok_or_else(|| {
        LicensorError::InvalidRequest(
            "Invalid license format - missing license or signature".to_string(),
        )
    })
}
