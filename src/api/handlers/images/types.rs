//! Request and response DTOs for the image surface.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(ToSchema, Deserialize, Debug)]
pub struct CreateImageRequest {
    pub uri: String,
    /// Explicit owner, honored only for principals with an `any` grant.
    pub owner: Option<Uuid>,
}

#[derive(ToSchema, Deserialize, Debug)]
pub struct UpdateImageRequest {
    pub uri: Option<String>,
    pub hits: Option<i64>,
}

/// Image payload; the owner relation is intentionally not serialized.
#[derive(ToSchema, Serialize, Debug)]
pub struct ImageResponse {
    pub id: String,
    pub uri: String,
    pub hits: i64,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<String>,
}

#[derive(IntoParams, Deserialize, Debug)]
pub struct GenerateParams {
    /// Number of images to generate, defaults to 5, capped at 10.
    pub limit: Option<u32>,
}

#[derive(ToSchema, Serialize, Debug)]
pub struct GenerateResponse {
    pub limit: u32,
    pub data: Vec<ImageResponse>,
}
