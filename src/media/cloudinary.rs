//! Cloudinary media host.
//!
//! Uploads by URL with a SHA-256 request signature: the signed parameters
//! are sorted, joined with `&`, and the API secret is appended before
//! hashing. `file` and `api_key` never enter the signature.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{Instrument, info_span};

use super::{MediaError, MediaHost, RandomPhoto, public_id};

pub struct Cloudinary {
    client: Client,
    cloud_name: String,
    api_key: String,
    api_secret: SecretString,
}

impl Cloudinary {
    /// Build a host client with the crate user agent.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        cloud_name: String,
        api_key: String,
        api_secret: SecretString,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            cloud_name,
            api_key,
            api_secret,
        })
    }

    fn upload_url(&self) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.cloud_name
        )
    }
}

/// Sign the request: parameters sorted by name, `&`-joined, secret appended,
/// SHA-256, hex-encoded.
fn sign(params: &[(&str, &str)], secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_unstable();

    let to_sign = sorted
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

fn now_unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        .unwrap_or_default()
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[async_trait]
impl MediaHost for Cloudinary {
    async fn upload(&self, photo: &RandomPhoto) -> Result<String, MediaError> {
        let public_id = public_id(photo);
        let timestamp = now_unix_seconds().to_string();

        let signature = sign(
            &[
                ("public_id", &public_id),
                ("signature_algorithm", "sha256"),
                ("timestamp", &timestamp),
            ],
            self.api_secret.expose_secret(),
        );

        let form = [
            ("file", photo.url.as_str()),
            ("public_id", &public_id),
            ("timestamp", &timestamp),
            ("api_key", &self.api_key),
            ("signature", &signature),
            ("signature_algorithm", "sha256"),
        ];

        let url = self.upload_url();
        let span = info_span!(
            "media_host.upload",
            http.method = "POST",
            url = %url,
            public_id = %public_id
        );
        let response = async { self.client.post(&url).form(&form).send().await }
            .instrument(span)
            .await
            .map_err(|err| MediaError(format!("media host request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MediaError(format!("media host returned status {status}")));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|err| MediaError(format!("media host returned invalid JSON: {err}")))?;

        Ok(body.secure_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_is_deterministic() {
        let params = [
            ("public_id", "brown_bear_42"),
            ("signature_algorithm", "sha256"),
            ("timestamp", "1700000000"),
        ];
        assert_eq!(sign(&params, "secret"), sign(&params, "secret"));
        assert_ne!(sign(&params, "secret"), sign(&params, "other"));
    }

    #[test]
    fn signature_sorts_parameters() {
        let sorted = [("a", "1"), ("b", "2")];
        let reversed = [("b", "2"), ("a", "1")];
        assert_eq!(sign(&sorted, "secret"), sign(&reversed, "secret"));
    }

    #[test]
    fn upload_url_contains_cloud_name() {
        let host = Cloudinary::new(
            "demo".to_string(),
            "key".to_string(),
            SecretString::from("secret"),
        )
        .unwrap();
        assert_eq!(
            host.upload_url(),
            "https://api.cloudinary.com/v1_1/demo/image/upload"
        );
    }
}
