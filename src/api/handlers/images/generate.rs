//! Random image generation.
//!
//! Pulls random photos from the photo provider, caches each on the media
//! host, and stores the hosted URI as a new image owned by the caller.

use axum::{
    Json,
    extract::{Extension, Query},
    http::HeaderMap,
    response::IntoResponse,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::instrument;

use super::{
    IMAGE, storage,
    types::{GenerateParams, GenerateResponse},
};
use crate::api::error::ApiError;
use crate::api::handlers::auth::{
    AuthState,
    policy::{Action, Possession},
    principal::{authorize, require_auth},
};
use crate::media::MediaState;

const DEFAULT_LIMIT: u32 = 5;
const MAX_LIMIT: u32 = 10;

// Only the upper bound is clamped; limit=0 yields an empty batch.
fn clamp_limit(limit: Option<u32>) -> u32 {
    limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT)
}

#[utoipa::path(
    get,
    path = "/v1/images",
    params(GenerateParams),
    responses(
        (status = 200, description = "Generated images", body = GenerateResponse, content_type = "application/json"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Insufficient permissions"),
        (status = 502, description = "Photo provider or media host failure"),
    ),
    security(("bearer" = [])),
    tag = "images"
)]
#[instrument(skip(headers, pool, auth_state, media))]
pub async fn generate(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    media: Extension<Arc<MediaState>>,
    Query(params): Query<GenerateParams>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, &pool, &auth_state).await?;
    authorize(&principal, IMAGE, Action::Create, Possession::Own)?;

    let limit = clamp_limit(params.limit);

    let mut data = Vec::with_capacity(limit as usize);
    for _ in 0..limit {
        let photo = media.provider().random_photo().await?;
        let hosted_uri = media.host().upload(&photo).await?;
        let image = storage::insert_image(&pool, &hosted_uri, principal.id).await?;
        data.push(image.into_response());
    }

    Ok(Json(GenerateResponse { limit, data }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(clamp_limit(None), 5);
        assert_eq!(clamp_limit(Some(3)), 3);
        assert_eq!(clamp_limit(Some(10)), 10);
        assert_eq!(clamp_limit(Some(50)), 10);
    }

    #[test]
    fn zero_limit_generates_nothing() {
        assert_eq!(clamp_limit(Some(0)), 0);
    }
}
