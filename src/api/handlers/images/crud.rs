//! Owner-scoped image CRUD.
//!
//! Every handler runs the same chain: authenticate, check the declared
//! policy triple, load the row, enforce ownership, then act. Principals
//! with an `any` grant skip the owner comparison and see soft-deleted rows.

use axum::{
    Json,
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::instrument;
use url::Url;
use uuid::Uuid;

use super::{
    IMAGE, storage,
    types::{CreateImageRequest, ImageResponse, UpdateImageRequest},
};
use crate::api::error::ApiError;
use crate::api::handlers::auth::{
    self, AuthState,
    policy::{Action, POLICY, Possession},
    principal::{authorize, enforce_ownership, require_auth},
};

fn validate_uri(uri: &str) -> Result<(), ApiError> {
    Url::parse(uri).map_err(|_| ApiError::Validation("Invalid image URI".to_string()))?;
    Ok(())
}

fn can_any(principal: &auth::Principal, action: Action) -> bool {
    POLICY.check(&principal.roles, IMAGE, action, Possession::Any)
}

#[utoipa::path(
    post,
    path = "/v1/images",
    request_body = CreateImageRequest,
    responses(
        (status = 201, description = "Image created", body = ImageResponse, content_type = "application/json"),
        (status = 400, description = "Invalid image URI"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Insufficient permissions"),
        (status = 404, description = "Explicit owner does not exist"),
    ),
    security(("bearer" = [])),
    tag = "images"
)]
#[instrument(skip(headers, pool, auth_state, payload))]
pub async fn create(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<CreateImageRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, &pool, &auth_state).await?;
    authorize(&principal, IMAGE, Action::Create, Possession::Own)?;

    let Some(Json(request)) = payload else {
        return Err(ApiError::Validation("Missing payload".to_string()));
    };
    validate_uri(&request.uri)?;

    // Only principals with an `any` grant may assign ownership elsewhere.
    let owner_id = match request.owner {
        Some(owner) if owner != principal.id && can_any(&principal, Action::Create) => {
            auth::storage::find_identity_by_id(&pool, owner)
                .await?
                .ok_or(ApiError::NotFound("Owner not found"))?
                .id
        }
        _ => principal.id,
    };

    let image = storage::insert_image(&pool, &request.uri, owner_id).await?;

    Ok((StatusCode::CREATED, Json(image.into_response())))
}

#[utoipa::path(
    get,
    path = "/v1/images/{id}",
    params(("id" = Uuid, Path, description = "Image id")),
    responses(
        (status = 200, description = "Image found", body = ImageResponse, content_type = "application/json"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not the resource owner"),
        (status = 404, description = "Image not found"),
    ),
    security(("bearer" = [])),
    tag = "images"
)]
#[instrument(skip(headers, pool, auth_state))]
pub async fn read(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, &pool, &auth_state).await?;
    authorize(&principal, IMAGE, Action::Read, Possession::Own)?;

    let include_deleted = can_any(&principal, Action::Read);
    let mut image = storage::find_image(&pool, id, include_deleted)
        .await?
        .ok_or(ApiError::NotFound("Image not found"))?;

    enforce_ownership(&principal, image.owner_id, IMAGE, Action::Read)?;

    image.hits = storage::increment_hits(&pool, id).await?;

    Ok(Json(image.into_response()))
}

#[utoipa::path(
    patch,
    path = "/v1/images/{id}",
    params(("id" = Uuid, Path, description = "Image id")),
    request_body = UpdateImageRequest,
    responses(
        (status = 200, description = "Image updated", body = ImageResponse, content_type = "application/json"),
        (status = 400, description = "Invalid image URI"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not the resource owner"),
        (status = 404, description = "Image not found"),
    ),
    security(("bearer" = [])),
    tag = "images"
)]
#[instrument(skip(headers, pool, auth_state, payload))]
pub async fn update(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    Path(id): Path<Uuid>,
    payload: Option<Json<UpdateImageRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, &pool, &auth_state).await?;
    authorize(&principal, IMAGE, Action::Update, Possession::Own)?;

    let Some(Json(request)) = payload else {
        return Err(ApiError::Validation("Missing payload".to_string()));
    };
    if let Some(uri) = &request.uri {
        validate_uri(uri)?;
    }

    let include_deleted = can_any(&principal, Action::Update);
    let image = storage::find_image(&pool, id, include_deleted)
        .await?
        .ok_or(ApiError::NotFound("Image not found"))?;

    enforce_ownership(&principal, image.owner_id, IMAGE, Action::Update)?;

    let updated = storage::update_image(&pool, id, request.uri.as_deref(), request.hits).await?;

    Ok(Json(updated.into_response()))
}

#[utoipa::path(
    delete,
    path = "/v1/images/{id}",
    params(("id" = Uuid, Path, description = "Image id")),
    responses(
        (status = 204, description = "Image soft-deleted"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not the resource owner"),
        (status = 404, description = "Image not found"),
    ),
    security(("bearer" = [])),
    tag = "images"
)]
#[instrument(skip(headers, pool, auth_state))]
pub async fn delete(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, &pool, &auth_state).await?;
    authorize(&principal, IMAGE, Action::Delete, Possession::Own)?;

    let include_deleted = can_any(&principal, Action::Delete);
    let image = storage::find_image(&pool, id, include_deleted)
        .await?
        .ok_or(ApiError::NotFound("Image not found"))?;

    enforce_ownership(&principal, image.owner_id, IMAGE, Action::Delete)?;

    storage::soft_delete_image(&pool, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::auth::policy::Role;

    fn principal(role: Role) -> auth::Principal {
        auth::Principal {
            id: Uuid::new_v4(),
            email: "user@example.com".to_string(),
            roles: vec![role],
        }
    }

    #[test]
    fn uri_validation() {
        assert!(validate_uri("https://images.example.com/cat.jpg").is_ok());
        assert!(validate_uri("not a uri").is_err());
    }

    #[test]
    fn only_any_grants_see_deleted_rows() {
        assert!(can_any(&principal(Role::Admin), Action::Read));
        assert!(!can_any(&principal(Role::User), Action::Read));
    }
}
