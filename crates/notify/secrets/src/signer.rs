//! OCI HTTP request signing (draft-cavage signatures, rsa-sha256).

use base64::Engine as _;
use color_eyre::eyre::WrapErr as _;
use openssl::hash::MessageDigest;
use openssl::pkey::{PKey, Private};
use openssl::sign::Signer;

/// Headers covered by the signature of a body-less request, in signing order.
const SIGNED_HEADERS: &str = "date (request-target) host";

/// Signs OCI API requests with an RSA key.
pub struct RequestSigner {
    key_id: String,
    key: PKey<Private>,
}

impl RequestSigner {
    /// Create a signer from a PEM private key.
    pub fn new(
        key_id: impl Into<String>,
        key_pem: &[u8],
        passphrase: Option<&str>,
    ) -> color_eyre::eyre::Result<Self> {
        let key = match passphrase {
            Some(pass) => PKey::private_key_from_pem_passphrase(key_pem, pass.as_bytes()),
            None => PKey::private_key_from_pem(key_pem),
        }
        .wrap_err("invalid OCI signing key")?;

        Ok(Self {
            key_id: key_id.into(),
            key,
        })
    }

    /// Build the `Authorization` header value for a body-less request.
    pub fn authorization(
        &self,
        method: &str,
        path: &str,
        host: &str,
        date: &str,
    ) -> color_eyre::eyre::Result<String> {
        let input = signing_string(method, path, host, date);

        let mut signer = Signer::new(MessageDigest::sha256(), &self.key)?;
        signer.update(input.as_bytes())?;
        let signature = signer.sign_to_vec().wrap_err("failed to sign OCI request")?;

        Ok(format!(
            r#"Signature version="1",headers="{SIGNED_HEADERS}",keyId="{}",algorithm="rsa-sha256",signature="{}""#,
            self.key_id,
            base64::engine::general_purpose::STANDARD.encode(signature)
        ))
    }
}

/// The string a request signature covers.
pub fn signing_string(method: &str, path: &str, host: &str, date: &str) -> String {
    format!(
        "date: {date}\n(request-target): {} {path}\nhost: {host}",
        method.to_lowercase()
    )
}

/// Current time formatted for the `date` header.
pub fn http_date() -> String {
    chrono::Utc::now()
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}
