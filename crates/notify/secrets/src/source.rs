//! Provider credential sources.

use std::path::PathBuf;

use base64::Engine as _;
use color_eyre::eyre::WrapErr as _;

use crate::VaultClient;

/// How the vault client authenticates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultAuth {
    /// API key from a profile of an OCI config file.
    Profile { path: PathBuf, profile: String },
    /// Resource principal of the running function.
    ResourcePrincipal,
}

impl VaultAuth {
    /// Construct a vault client for this authentication mode.
    pub fn client(&self) -> color_eyre::eyre::Result<VaultClient> {
        match self {
            Self::Profile { path, profile } => VaultClient::from_profile(path, profile),
            Self::ResourcePrincipal => VaultClient::from_resource_principal(),
        }
    }
}

/// Where provider credentials come from.
#[derive(Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Base64 encoded credentials held in configuration.
    Inline(String),
    /// Credentials stored in a vault secret.
    Vault { secret_id: String, auth: VaultAuth },
}

impl std::fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inline(_) => f.write_str("Inline(<redacted>)"),
            Self::Vault { secret_id, auth } => f
                .debug_struct("Vault")
                .field("secret_id", secret_id)
                .field("auth", auth)
                .finish(),
        }
    }
}

impl CredentialSource {
    /// Load the raw credential bytes.
    pub async fn load(&self) -> color_eyre::eyre::Result<Vec<u8>> {
        match self {
            Self::Inline(encoded) => {
                tracing::warn!(
                    "loading credentials from an inline configuration value; \
                     store them in a vault secret instead"
                );
                base64::engine::general_purpose::STANDARD
                    .decode(encoded.trim())
                    .wrap_err("inline credentials are not valid base64")
            }
            Self::Vault { secret_id, auth } => {
                let client = auth.client()?;
                tracing::info!(secret_id = %secret_id, "loading credentials from vault secret");
                client.get_secret(secret_id).await
            }
        }
    }
}
