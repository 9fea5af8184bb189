//! Request and response DTOs for the msgdrop API.

mod request;
mod response;

pub use request::{
    CaptchaCheckQuery, CreateServiceRequest, LoginRequest, RegisterRequest, SendMessageRequest,
};
pub use response::{ApiResponse, CaptchaCheckResponse, ServiceInfo, SessionResponse};
