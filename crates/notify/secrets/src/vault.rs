//! OCI Vault secrets client.

use std::path::Path;
use std::time::Duration;

use base64::Engine as _;
use color_eyre::eyre::WrapErr as _;
use serde::Deserialize;

use crate::{ProfileConfig, RequestSigner, ResourcePrincipal, http_date};

const SECRETS_API_VERSION: &str = "20190301";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Reads secret bundles from OCI Vault.
pub struct VaultClient {
    http: reqwest::Client,
    signer: RequestSigner,
    endpoint: String,
}

impl VaultClient {
    /// Create a client for the secrets endpoint of a region.
    pub fn new(signer: RequestSigner, region: &str) -> color_eyre::eyre::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .wrap_err("cannot create the OCI client")?;

        Ok(Self {
            http,
            signer,
            endpoint: format!("https://secrets.vaults.{region}.oci.oraclecloud.com"),
        })
    }

    /// Create a client authenticated by an API key profile.
    pub fn from_profile(path: &Path, profile: &str) -> color_eyre::eyre::Result<Self> {
        let config =
            ProfileConfig::load(path, profile).wrap_err("invalid OCI client configuration")?;

        let key_pem = std::fs::read(&config.key_file).wrap_err_with(|| {
            format!("cannot read OCI signing key {}", config.key_file.display())
        })?;
        let signer =
            RequestSigner::new(config.key_id(), &key_pem, config.pass_phrase.as_deref())?;

        Self::new(signer, &config.region)
    }

    /// Create a client authenticated as the current resource principal.
    pub fn from_resource_principal() -> color_eyre::eyre::Result<Self> {
        let principal =
            ResourcePrincipal::from_env().wrap_err("invalid OCI client configuration")?;

        let signer = RequestSigner::new(
            principal.key_id(),
            principal.private_pem.as_bytes(),
            principal.passphrase.as_deref(),
        )?;

        Self::new(signer, &principal.region)
    }

    /// Point the client at a different secrets endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Fetch the current version of a secret and decode its content.
    pub async fn get_secret(&self, secret_id: &str) -> color_eyre::eyre::Result<Vec<u8>> {
        let url = reqwest::Url::parse(&format!(
            "{}/{SECRETS_API_VERSION}/secretbundles/{secret_id}",
            self.endpoint
        ))
        .wrap_err_with(|| format!("invalid secret id {secret_id}"))?;

        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => color_eyre::eyre::bail!("secrets endpoint has no host"),
        };
        let date = http_date();
        let authorization = self.signer.authorization("GET", url.path(), &host, &date)?;

        let response = self
            .http
            .get(url.clone())
            .header("date", &date)
            .header("authorization", authorization)
            .send()
            .await
            .wrap_err_with(|| format!("cannot load secret {secret_id}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            color_eyre::eyre::bail!("cannot load secret {secret_id}: {status}: {body}");
        }

        let bundle: SecretBundle = response
            .json()
            .await
            .wrap_err_with(|| format!("cannot read secret {secret_id}"))?;

        let content = bundle.secret_bundle_content;
        if !content.content_type.eq_ignore_ascii_case("BASE64") {
            color_eyre::eyre::bail!(
                "cannot read secret {secret_id}: unsupported content type {}",
                content.content_type
            );
        }

        base64::engine::general_purpose::STANDARD
            .decode(content.content.trim())
            .wrap_err_with(|| format!("cannot read secret {secret_id}"))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SecretBundle {
    secret_bundle_content: SecretBundleContent,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SecretBundleContent {
    content_type: String,
    #[serde(default)]
    content: String,
}
