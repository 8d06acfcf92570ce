//! Pexels photo provider.
//!
//! Fetches one curated photo per call from a random page, which is how the
//! catalog gets a "random" photo out of a paginated feed.

use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{Instrument, info_span};

use super::{MediaError, PhotoProvider, RandomPhoto};

const CURATED_URL: &str = "https://api.pexels.com/v1/curated";
// The curated feed is deep enough that any page in this range has content.
const MAX_RANDOM_PAGE: u32 = 1000;

pub struct Pexels {
    client: Client,
    api_key: SecretString,
}

impl Pexels {
    /// Build a provider with the crate user agent.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: SecretString) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .build()?;
        Ok(Self { client, api_key })
    }
}

#[derive(Deserialize)]
struct CuratedResponse {
    photos: Vec<PexelsPhoto>,
}

#[derive(Deserialize)]
struct PexelsPhoto {
    id: u64,
    #[serde(default)]
    alt: String,
    src: PexelsSrc,
}

#[derive(Deserialize)]
struct PexelsSrc {
    large: String,
}

#[async_trait]
impl PhotoProvider for Pexels {
    async fn random_photo(&self) -> Result<RandomPhoto, MediaError> {
        let page = rand::thread_rng().gen_range(1..=MAX_RANDOM_PAGE);

        let span = info_span!(
            "photo_provider.fetch",
            http.method = "GET",
            url = CURATED_URL,
            page
        );
        let response = async {
            self.client
                .get(CURATED_URL)
                .query(&[("page", page), ("per_page", 1)])
                .header("Authorization", self.api_key.expose_secret())
                .send()
                .await
        }
        .instrument(span)
        .await
        .map_err(|err| MediaError(format!("photo provider request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MediaError(format!(
                "photo provider returned status {status}"
            )));
        }

        let body: CuratedResponse = response
            .json()
            .await
            .map_err(|err| MediaError(format!("photo provider returned invalid JSON: {err}")))?;

        let photo = body
            .photos
            .into_iter()
            .next()
            .ok_or_else(|| MediaError("photo provider returned an empty page".to_string()))?;

        Ok(RandomPhoto {
            id: photo.id,
            alt: photo.alt,
            url: photo.src.large,
        })
    }
}
