//! Password reset flow.
//!
//! A reset request stores a single-use random token on the identity and
//! enqueues a `password_reset` email through the outbox. The reset itself
//! re-salts, re-hashes, and clears the token.

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use rand::{Rng, distributions::Alphanumeric};
use sqlx::PgPool;
use tracing::instrument;

use super::{
    password, storage,
    types::{PasswordResetRequest, RequestPasswordResetRequest},
};
use crate::api::error::ApiError;
use crate::api::handlers::{normalize_email, valid_password};

const RESET_TOKEN_LENGTH: usize = 10;

fn generate_reset_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RESET_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

#[utoipa::path(
    post,
    path = "/v1/auth/request-password-reset",
    request_body = RequestPasswordResetRequest,
    responses(
        (status = 204, description = "Reset email queued"),
        (status = 404, description = "Unknown email"),
    ),
    tag = "auth"
)]
#[instrument(skip(pool, payload))]
pub async fn request_password_reset(
    pool: Extension<PgPool>,
    payload: Option<Json<RequestPasswordResetRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::Validation("Missing payload".to_string()));
    };

    let email = normalize_email(&request.email);
    let identity = storage::find_identity_by_email(&pool, &email)
        .await?
        .ok_or(ApiError::NotFound("Unknown email"))?;

    let reset_token = generate_reset_token();
    storage::store_reset_token(&pool, identity.id, &identity.email, &reset_token).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/v1/auth/password-reset",
    request_body = PasswordResetRequest,
    responses(
        (status = 204, description = "Password replaced"),
        (status = 400, description = "Invalid token or password"),
        (status = 404, description = "Unknown email"),
    ),
    tag = "auth"
)]
#[instrument(skip(pool, payload))]
pub async fn password_reset(
    pool: Extension<PgPool>,
    payload: Option<Json<PasswordResetRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::Validation("Missing payload".to_string()));
    };

    let email = normalize_email(&request.email);
    let identity = storage::find_identity_by_email(&pool, &email)
        .await?
        .ok_or(ApiError::NotFound("Unknown email"))?;

    let matches = identity
        .password_reset_token
        .as_deref()
        .is_some_and(|stored| stored == request.password_reset_token);
    if !matches {
        return Err(ApiError::Validation("Invalid reset token".to_string()));
    }

    if !valid_password(&request.password) {
        return Err(ApiError::Validation(
            "Password must be 8-32 chars with upper, lower, digit and special".to_string(),
        ));
    }

    let salt = password::generate_salt();
    let hash = password::hash_password(&request.password, &salt)?;
    storage::apply_password_reset(&pool, identity.id, &hash, &salt).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_token_is_ten_alphanumeric_chars() {
        for _ in 0..50 {
            let token = generate_reset_token();
            assert_eq!(token.len(), RESET_TOKEN_LENGTH);
            assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn reset_tokens_are_random() {
        let first = generate_reset_token();
        let second = generate_reset_token();
        assert_ne!(first, second);
    }
}
