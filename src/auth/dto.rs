use serde::{Deserialize, Serialize};

use crate::users::dto::UserResource;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Returned by register, login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub status: bool,
    pub message: String,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub data: UserResource,
}
