//! Response DTOs for the msgdrop API.

use serde::Serialize;

use crate::store::Service;

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Session issued on register/login.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// Bearer token for the service-management endpoints.
    pub token: String,
    /// Session lifetime in seconds.
    pub expires_in: u64,
    /// Authenticated account name.
    pub account: String,
}

/// Answer to the CAPTCHA pre-check.
///
/// Lets a login form decide whether to render the challenge widget before
/// submitting credentials. Unknown accounts read as unthrottled, so the
/// probe reveals nothing about which names exist.
#[derive(Debug, Serialize)]
pub struct CaptchaCheckResponse {
    /// Whether the next login attempt must carry a CAPTCHA token.
    pub captcha_required: bool,
}

/// Service information in responses.
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    /// Service name.
    pub name: String,
    /// Owning account.
    pub owner: String,
    /// Retrieval endpoint for this service.
    pub link: String,
}

impl From<Service> for ServiceInfo {
    fn from(service: Service) -> Self {
        let link = format!("/link/{}/getmsg", service.name);
        Self {
            name: service.name,
            owner: service.owner,
            link,
        }
    }
}
