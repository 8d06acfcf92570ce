use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use sqlx::PgPool;
use tracing::instrument;

use super::{
    password,
    policy::Role,
    storage,
    types::{RegisterRequest, UserResponse},
};
use crate::api::error::ApiError;
use crate::api::handlers::{normalize_email, valid_email, valid_password};

#[utoipa::path(
    post,
    path = "/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = UserResponse, content_type = "application/json"),
        (status = 400, description = "Invalid email or password"),
        (status = 409, description = "Email is already registered"),
    ),
    tag = "auth"
)]
#[instrument(skip(pool, payload))]
pub async fn register(
    pool: Extension<PgPool>,
    payload: Option<Json<RegisterRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::Validation("Missing payload".to_string()));
    };

    let email = normalize_email(&request.email);
    if !valid_email(&email) {
        return Err(ApiError::Validation("Invalid email".to_string()));
    }
    if !valid_password(&request.password) {
        return Err(ApiError::Validation(
            "Password must be 8-32 chars with upper, lower, digit and special".to_string(),
        ));
    }

    let salt = password::generate_salt();
    let hash = password::hash_password(&request.password, &salt)?;

    let identity = storage::insert_identity(&pool, &email, &hash, &salt).await?;

    let response = UserResponse {
        id: identity.id.to_string(),
        email: identity.email,
        role: Role::from_stored(&identity.role),
        created_at: identity.created_at,
    };

    Ok((StatusCode::CREATED, Json(response)))
}
