//! Per-request principal resolution and authorization checks.
//!
//! Every guarded endpoint runs the same chain: extract the bearer token,
//! verify it, re-resolve the identity by the email claim, then check the
//! endpoint's declared policy triple. Any failure is terminal for the
//! request.

use axum::http::{HeaderMap, header::AUTHORIZATION};
use sqlx::PgPool;
use uuid::Uuid;

use super::{AuthState, policy, storage, token};
use crate::api::error::ApiError;

/// Authenticated caller, rebuilt from the database on every request.
#[derive(Debug, Clone)]
pub struct Principal {
    pub id: Uuid,
    pub email: String,
    pub roles: Vec<policy::Role>,
}

/// Pull the bearer token out of the `Authorization` header.
///
/// # Errors
/// Returns `ApiError::Authentication` when the header is missing or not a
/// bearer scheme.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(ApiError::Authentication("Missing authorization header"))?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(ApiError::Authentication("Expected bearer token"))
}

/// Authenticate the request and return the resolved principal.
///
/// # Errors
/// Returns `ApiError::Authentication` for a missing or invalid token, and
/// for a token whose subject no longer exists.
pub async fn require_auth(
    headers: &HeaderMap,
    pool: &PgPool,
    auth: &AuthState,
) -> Result<Principal, ApiError> {
    let bearer = extract_bearer_token(headers)?;
    let claims = token::verify(auth.token(), bearer)?;

    let identity = storage::find_identity_by_email(pool, &claims.sub)
        .await?
        .ok_or(ApiError::Authentication("Unknown identity"))?;

    Ok(Principal {
        id: identity.id,
        email: identity.email,
        roles: vec![policy::Role::from_stored(&identity.role)],
    })
}

/// Check the endpoint's declared policy triple against the principal.
///
/// # Errors
/// Returns `ApiError::Authorization` when no matching grant exists.
pub fn authorize(
    principal: &Principal,
    resource: &str,
    action: policy::Action,
    possession: policy::Possession,
) -> Result<(), ApiError> {
    if policy::POLICY.check(&principal.roles, resource, action, possession) {
        Ok(())
    } else {
        Err(ApiError::Authorization("Insufficient permissions"))
    }
}

/// Enforce ownership of a loaded resource.
///
/// Principals holding an `Any` grant for the triple skip the owner
/// comparison; everyone else must own the row.
///
/// # Errors
/// Returns `ApiError::Authorization` when the caller neither owns the
/// resource nor holds an `Any` grant.
pub fn enforce_ownership(
    principal: &Principal,
    owner_id: Uuid,
    resource: &str,
    action: policy::Action,
) -> Result<(), ApiError> {
    if policy::POLICY.check(
        &principal.roles,
        resource,
        action,
        policy::Possession::Any,
    ) {
        return Ok(());
    }

    if owner_id == principal.id {
        Ok(())
    } else {
        Err(ApiError::Authorization("Not the resource owner"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::images::IMAGE;
    use axum::http::HeaderValue;
    use policy::{Action, Possession, Role};

    fn principal(role: Role) -> Principal {
        Principal {
            id: Uuid::new_v4(),
            email: "user@example.com".to_string(),
            roles: vec![role],
        }
    }

    #[test]
    fn bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert!(extract_bearer_token(&headers).is_err());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(extract_bearer_token(&headers).is_err());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(extract_bearer_token(&headers).is_err());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn authorize_follows_policy() {
        let user = principal(Role::User);
        assert!(authorize(&user, IMAGE, Action::Read, Possession::Own).is_ok());
        assert!(authorize(&user, IMAGE, Action::Read, Possession::Any).is_err());

        let admin = principal(Role::Admin);
        assert!(authorize(&admin, IMAGE, Action::Delete, Possession::Own).is_ok());
    }

    #[test]
    fn owner_passes_ownership_check() {
        let user = principal(Role::User);
        assert!(enforce_ownership(&user, user.id, IMAGE, Action::Update).is_ok());
    }

    #[test]
    fn non_owner_is_denied() {
        let user = principal(Role::User);
        let result = enforce_ownership(&user, Uuid::new_v4(), IMAGE, Action::Update);
        assert!(matches!(result, Err(ApiError::Authorization(_))));
    }

    #[test]
    fn admin_bypasses_ownership() {
        let admin = principal(Role::Admin);
        assert!(enforce_ownership(&admin, Uuid::new_v4(), IMAGE, Action::Delete).is_ok());
    }
}
