//! Firebase Cloud Messaging provider using the HTTP v1 API.

use std::collections::HashMap;
use std::time::Duration;

use base64::Engine as _;
use color_eyre::eyre::WrapErr as _;
use futures::{StreamExt as _, stream};
use notify_core::{DeliveryOutcome, DeliveryUnit, Message};
use notify_secrets::CredentialSource;
use openssl::hash::MessageDigest;
use openssl::pkey::{PKey, Private};
use openssl::sign::Signer;
use serde::{Deserialize, Serialize};

use crate::{DeliveryProvider, ProviderFactory};

/// Most recipients a single FCM batch may carry.
pub const MAX_ALLOWED_RECIPIENTS: usize = 500;

/// Production FCM base URL.
pub const FCM_ENDPOINT: &str = "https://fcm.googleapis.com";

const FCM_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_S: i64 = 3600;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_IN_FLIGHT: usize = 32;

/// Fields of a Google service account key file the client needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccount {
    pub project_id: String,
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// FCM client authenticated with a service account.
pub struct FcmClient {
    http: reqwest::Client,
    account: ServiceAccount,
    key: PKey<Private>,
    endpoint: String,
}

impl FcmClient {
    /// Create a client from service account JSON bytes.
    pub fn new(credentials: &[u8]) -> color_eyre::eyre::Result<Self> {
        Self::with_endpoint(credentials, FCM_ENDPOINT)
    }

    /// Create a client that talks to a custom FCM base URL.
    pub fn with_endpoint(credentials: &[u8], endpoint: &str) -> color_eyre::eyre::Result<Self> {
        let account: ServiceAccount = serde_json::from_slice(credentials)
            .wrap_err("cannot initialize Firebase application: invalid service account")?;

        let key = PKey::private_key_from_pem(account.private_key.as_bytes())
            .wrap_err("cannot initialize Firebase application: invalid private key")?;

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .wrap_err("cannot create Firebase Cloud Messaging client")?;

        Ok(Self {
            http,
            account,
            key,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Project the client sends messages for.
    pub fn project_id(&self) -> &str {
        &self.account.project_id
    }

    /// Signed RS256 JWT asserting the service account identity.
    fn assertion(&self, issued_at: i64) -> color_eyre::eyre::Result<String> {
        let header = encode_segment(&serde_json::json!({ "alg": "RS256", "typ": "JWT" }))?;
        let claims = encode_segment(&serde_json::json!({
            "iss": self.account.client_email,
            "scope": FCM_SCOPE,
            "aud": self.account.token_uri,
            "iat": issued_at,
            "exp": issued_at + ASSERTION_LIFETIME_S,
        }))?;
        let signing_input = format!("{header}.{claims}");

        let mut signer = Signer::new(MessageDigest::sha256(), &self.key)?;
        signer.update(signing_input.as_bytes())?;
        let signature = signer.sign_to_vec().wrap_err("failed to sign token assertion")?;

        Ok(format!(
            "{signing_input}.{}",
            base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(signature)
        ))
    }

    /// Exchange a fresh assertion for an OAuth2 access token.
    async fn access_token(&self) -> color_eyre::eyre::Result<String> {
        let assertion = self.assertion(chrono::Utc::now().timestamp())?;

        let response = self
            .http
            .post(&self.account.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .wrap_err("token exchange request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            color_eyre::eyre::bail!("token exchange rejected ({status}): {body}");
        }

        let token: TokenResponse = response
            .json()
            .await
            .wrap_err("invalid token exchange response")?;
        Ok(token.access_token)
    }

    async fn send_single(
        &self,
        access_token: &str,
        unit: &DeliveryUnit<'_>,
    ) -> color_eyre::eyre::Result<DeliveryOutcome> {
        let url = format!(
            "{}/v1/projects/{}/messages:send",
            self.endpoint, self.account.project_id
        );
        let body = SendRequest {
            message: FcmMessage {
                token: unit.token,
                data: (!unit.data.is_empty()).then_some(unit.data),
                notification: unit.message,
            },
        };

        let response = self
            .http
            .post(url)
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await
            .wrap_err("FCM send request failed")?;

        let status = response.status();
        if status.is_success() {
            let sent: SendResponse = response
                .json()
                .await
                .wrap_err("invalid FCM send response")?;
            return Ok(DeliveryOutcome::success(sent.name));
        }

        let text = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorResponse>(&text)
            .map(|e| e.error.message)
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("unexpected http response with status: {}", status.as_u16()));

        tracing::debug!(status = %status, error = %detail, "FCM rejected message");
        Ok(DeliveryOutcome::failure(detail))
    }
}

impl DeliveryProvider for FcmClient {
    async fn send_batch(
        &self,
        units: &[DeliveryUnit<'_>],
    ) -> color_eyre::eyre::Result<Vec<DeliveryOutcome>> {
        let access_token = self.access_token().await?;

        tracing::info!(
            project = %self.account.project_id,
            units = units.len(),
            "sending FCM batch"
        );

        let access_token = access_token.as_str();

        // A failed send only fails its own unit: others may already be delivered.
        let sends: Vec<_> = units
            .iter()
            .map(|unit| async move {
                self.send_single(access_token, unit)
                    .await
                    .unwrap_or_else(|e| {
                        tracing::warn!(recipient = unit.token, error = %e, "FCM send failed");
                        DeliveryOutcome::failure(format!("{e:#}"))
                    })
            })
            .collect();
        let outcomes: Vec<DeliveryOutcome> = stream::iter(sends)
            .buffered(MAX_IN_FLIGHT)
            .collect()
            .await;

        Ok(outcomes)
    }
}

/// Builds [`FcmClient`]s from a credential source.
pub struct FcmFactory {
    credentials: Option<CredentialSource>,
    endpoint: String,
}

impl FcmFactory {
    /// Create a factory. `None` credentials fail every build.
    pub fn new(credentials: Option<CredentialSource>, endpoint: impl Into<String>) -> Self {
        Self {
            credentials,
            endpoint: endpoint.into(),
        }
    }
}

impl ProviderFactory for FcmFactory {
    type Provider = FcmClient;

    async fn build(&self) -> color_eyre::eyre::Result<FcmClient> {
        let source = self
            .credentials
            .as_ref()
            .ok_or_else(|| color_eyre::eyre::eyre!("no Firebase credentials configured"))?;

        let credentials = source.load().await?;
        let client = FcmClient::with_endpoint(&credentials, &self.endpoint)?;

        tracing::info!(project = %client.project_id(), "FCM client ready");
        Ok(client)
    }
}

fn encode_segment(value: &serde_json::Value) -> color_eyre::eyre::Result<String> {
    let json = serde_json::to_vec(value).wrap_err("failed to encode token segment")?;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(json))
}

#[derive(Serialize)]
struct SendRequest<'a> {
    message: FcmMessage<'a>,
}

#[derive(Serialize)]
struct FcmMessage<'a> {
    token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notification: Option<&'a Message>,
}

#[derive(Deserialize)]
struct SendResponse {
    name: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}
