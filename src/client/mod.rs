//! Signer/verifier clients.

pub mod backend;
pub mod signing;
pub mod vault;
