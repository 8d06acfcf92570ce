//! Request and response DTOs for the auth surface.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::policy::Role;

#[derive(ToSchema, Deserialize, Debug)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema, Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Debug)]
pub struct TokenResponse {
    pub access_token: String,
}

/// Public identity representation; never carries credential material.
#[derive(ToSchema, Serialize, Debug)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub created_at: String,
}

#[derive(ToSchema, Deserialize, Debug)]
pub struct RequestPasswordResetRequest {
    pub email: String,
}

#[derive(ToSchema, Deserialize, Debug)]
pub struct PasswordResetRequest {
    pub email: String,
    pub password_reset_token: String,
    pub password: String,
}
