use axum::{Json, extract::Extension, response::IntoResponse};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::instrument;

use super::{
    AuthState, password, storage, token,
    types::{LoginRequest, TokenResponse},
};
use crate::api::error::ApiError;
use crate::api::handlers::normalize_email;

#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse, content_type = "application/json"),
        (status = 401, description = "Invalid credentials"),
    ),
    tag = "auth"
)]
#[instrument(skip(pool, auth, payload))]
pub async fn login(
    pool: Extension<PgPool>,
    auth: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::Validation("Missing payload".to_string()));
    };

    let email = normalize_email(&request.email);

    // Same 401 for unknown email and wrong password, no account probing.
    let identity = storage::find_identity_by_email(&pool, &email)
        .await?
        .ok_or(ApiError::Authentication("Invalid credentials"))?;

    if !password::verify_password(&request.password, &identity.password_hash) {
        return Err(ApiError::Authentication("Invalid credentials"));
    }

    let access_token = token::issue(auth.token(), &identity.email)?;

    Ok(Json(TokenResponse { access_token }))
}
