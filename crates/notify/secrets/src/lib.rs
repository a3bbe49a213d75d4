//! Notify Secrets
//!
//! Loads provider credentials from inline configuration or an OCI Vault secret.

mod oci_config;
mod signer;
mod source;
mod vault;

pub use oci_config::*;
pub use signer::*;
pub use source::*;
pub use vault::*;
