//! Request DTOs for the msgdrop API.

use serde::Deserialize;

/// Account registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Account name.
    pub username: String,
    /// Password.
    pub password: String,
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Account name.
    pub username: String,
    /// Password.
    pub password: String,
    /// CAPTCHA token, required once the account is throttled.
    #[serde(default)]
    pub captcha_token: Option<String>,
}

/// CAPTCHA pre-check query.
#[derive(Debug, Deserialize)]
pub struct CaptchaCheckQuery {
    /// Account name to check.
    pub username: String,
}

/// Service creation request.
#[derive(Debug, Deserialize)]
pub struct CreateServiceRequest {
    /// Service name.
    pub name: String,
}

/// Message send request.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    /// Message payload. An empty message clears the pending slot.
    #[serde(default)]
    pub message: String,
}
