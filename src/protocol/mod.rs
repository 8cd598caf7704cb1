//! License data model and request bodies.

pub mod models;
pub mod requests;
