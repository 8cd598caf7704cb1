//! Basic smoke test to verify the public API surface.

#[test]
fn crate_compiles() {
    let _ = std::any::type_name::<licensor::LicensorConfig>();
    let _ = std::any::type_name::<licensor::LicensorError>();
    let _ = std::any::type_name::<licensor::LicenseAuthority<licensor::VaultTransitClient>>();
    let _ = std::any::type_name::<licensor::LicenseAuthority<licensor::LocalEd25519Signer>>();
}
