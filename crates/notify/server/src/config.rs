//! Environment configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use notify_secrets::{CredentialSource, DEFAULT_CONFIG_LOCATION, VaultAuth};
use thiserror::Error;

pub const GOOGLE_APPLICATION_CREDENTIALS: &str = "GOOGLE_APPLICATION_CREDENTIALS";
pub const GOOGLE_APPLICATION_CREDENTIALS_SECRET_ID: &str = "GOOGLE_APPLICATION_CREDENTIALS_SECRET_ID";
pub const OCI_PROFILE: &str = "OCI_PROFILE";
pub const OCI_CONFIG_LOCATION: &str = "OCI_CONFIG_LOCATION";
pub const MAX_RECIPIENTS_COUNT: &str = "MAX_RECIPIENTS_COUNT";
pub const LISTEN_ADDR: &str = "LISTEN_ADDR";
pub const FCM_ENDPOINT: &str = "FCM_ENDPOINT";

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{MAX_RECIPIENTS_COUNT} must be a non-negative integer, got {0:?}")]
    InvalidRecipientCount(String),
    #[error("{LISTEN_ADDR} is not a socket address: {0:?}")]
    InvalidListenAddr(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Where FCM credentials come from, if configured at all.
    pub credentials: Option<CredentialSource>,
    /// Configured recipient cap, 0 meaning none.
    pub max_recipients: usize,
    pub listen_addr: SocketAddr,
    pub fcm_endpoint: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build the config through a variable lookup. Empty values count as unset.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let max_recipients = match var(MAX_RECIPIENTS_COUNT) {
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidRecipientCount(raw))?,
            None => 0,
        };

        let listen_addr = match var(LISTEN_ADDR) {
            Some(raw) => raw
                .parse::<SocketAddr>()
                .map_err(|_| ConfigError::InvalidListenAddr(raw))?,
            None => DEFAULT_LISTEN_ADDR
                .parse::<SocketAddr>()
                .map_err(|_| ConfigError::InvalidListenAddr(DEFAULT_LISTEN_ADDR.to_string()))?,
        };

        let credentials = match (
            var(GOOGLE_APPLICATION_CREDENTIALS_SECRET_ID),
            var(GOOGLE_APPLICATION_CREDENTIALS),
        ) {
            (Some(secret_id), _) => Some(CredentialSource::Vault {
                secret_id,
                auth: match var(OCI_PROFILE) {
                    // No profile: the function runs as its resource principal
                    None => VaultAuth::ResourcePrincipal,
                    Some(profile) => VaultAuth::Profile {
                        path: PathBuf::from(
                            var(OCI_CONFIG_LOCATION)
                                .unwrap_or_else(|| DEFAULT_CONFIG_LOCATION.to_string()),
                        ),
                        profile,
                    },
                },
            }),
            (None, Some(encoded)) => Some(CredentialSource::Inline(encoded)),
            (None, None) => None,
        };

        Ok(Self {
            credentials,
            max_recipients,
            listen_addr,
            fcm_endpoint: var(FCM_ENDPOINT)
                .unwrap_or_else(|| notify_provider::FCM_ENDPOINT.to_string()),
        })
    }
}
