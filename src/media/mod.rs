//! Media collaborators: photo provider and media host.
//!
//! Handlers only see the two traits here, so tests can stub them and the
//! concrete Pexels/Cloudinary clients stay swappable. All failures collapse
//! into `MediaError`, which the API surfaces as `502`.

use async_trait::async_trait;
use std::sync::Arc;

pub mod cloudinary;
pub mod pexels;

/// Upstream failure from either collaborator.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct MediaError(pub String);

/// A randomly sourced photo, not yet cached on the media host.
#[derive(Debug, Clone)]
pub struct RandomPhoto {
    pub id: u64,
    pub alt: String,
    pub url: String,
}

/// Source of random photos.
#[async_trait]
pub trait PhotoProvider: Send + Sync {
    async fn random_photo(&self) -> Result<RandomPhoto, MediaError>;
}

/// Caches a photo and returns its hosted URI.
#[async_trait]
pub trait MediaHost: Send + Sync {
    async fn upload(&self, photo: &RandomPhoto) -> Result<String, MediaError>;
}

/// Shared media collaborators injected as an axum `Extension`.
#[derive(Clone)]
pub struct MediaState {
    provider: Arc<dyn PhotoProvider>,
    host: Arc<dyn MediaHost>,
}

impl MediaState {
    #[must_use]
    pub fn new(provider: Arc<dyn PhotoProvider>, host: Arc<dyn MediaHost>) -> Self {
        Self { provider, host }
    }

    #[must_use]
    pub fn provider(&self) -> &dyn PhotoProvider {
        self.provider.as_ref()
    }

    #[must_use]
    pub fn host(&self) -> &dyn MediaHost {
        self.host.as_ref()
    }
}

/// Derive a stable public id from the photo alt text and id:
/// lowercased, whitespace collapsed to underscores.
#[must_use]
pub fn public_id(photo: &RandomPhoto) -> String {
    let slug = photo
        .alt
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    if slug.is_empty() {
        format!("photo_{}", photo.id)
    } else {
        format!("{}_{}", slug, photo.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_id_slugs_alt_text() {
        let photo = RandomPhoto {
            id: 42,
            alt: "Brown Bear in a River".to_string(),
            url: "https://photos.example.com/42.jpg".to_string(),
        };
        assert_eq!(public_id(&photo), "brown_bear_in_a_river_42");
    }

    #[test]
    fn public_id_collapses_whitespace() {
        let photo = RandomPhoto {
            id: 7,
            alt: "  Misty   Forest ".to_string(),
            url: String::new(),
        };
        assert_eq!(public_id(&photo), "misty_forest_7");
    }

    #[test]
    fn public_id_falls_back_without_alt() {
        let photo = RandomPhoto {
            id: 9,
            alt: String::new(),
            url: String::new(),
        };
        assert_eq!(public_id(&photo), "photo_9");
    }
}
