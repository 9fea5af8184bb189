//! API error handling for the msgdrop HTTP surface.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::auth::{LoginError, RegistrationError};
use crate::MsgdropError;

/// API error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Bad request (400).
    BadRequest,
    /// Unauthorized (401).
    Unauthorized,
    /// Forbidden (403).
    Forbidden,
    /// Not found (404).
    NotFound,
    /// Conflict (409).
    Conflict,
    /// Validation error (422).
    ValidationError,
    /// A CAPTCHA token is required for this attempt (428).
    CaptchaRequired,
    /// The supplied CAPTCHA token failed verification (400).
    CaptchaInvalid,
    /// Internal server error (500).
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::ValidationError => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::CaptchaRequired => StatusCode::PRECONDITION_REQUIRED,
            ErrorCode::CaptchaInvalid => StatusCode::BAD_REQUEST,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Error details.
    pub error: ErrorDetail,
}

/// Error detail.
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    /// Error code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
}

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Create a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Create a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    /// Create an internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status_code();
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<MsgdropError> for ApiError {
    fn from(err: MsgdropError) -> Self {
        match &err {
            MsgdropError::Validation(msg) => ApiError::validation(msg.clone()),
            MsgdropError::Conflict(msg) => ApiError::conflict(msg.clone()),
            MsgdropError::Auth(msg) => ApiError::unauthorized(msg.clone()),
            MsgdropError::CaptchaRequired => {
                ApiError::new(ErrorCode::CaptchaRequired, err.to_string())
            }
            MsgdropError::CaptchaInvalid => {
                ApiError::new(ErrorCode::CaptchaInvalid, err.to_string())
            }
            MsgdropError::NotFound(msg) => ApiError::not_found(format!("{msg} not found")),
            _ => {
                tracing::error!("internal error: {}", err);
                ApiError::internal("An internal error occurred")
            }
        }
    }
}

impl From<RegistrationError> for ApiError {
    fn from(err: RegistrationError) -> Self {
        match &err {
            RegistrationError::Validation(_) | RegistrationError::Password(_) => {
                ApiError::validation(err.to_string())
            }
            RegistrationError::NameTaken => ApiError::conflict(err.to_string()),
            RegistrationError::Store(msg) => {
                tracing::error!("store error during registration: {}", msg);
                ApiError::internal("An internal error occurred")
            }
        }
    }
}

impl From<LoginError> for ApiError {
    fn from(err: LoginError) -> Self {
        match &err {
            // Both credential faults render identically to the caller
            LoginError::UnknownAccount | LoginError::BadPassword => {
                ApiError::unauthorized(err.to_string())
            }
            LoginError::CaptchaRequired => {
                ApiError::new(ErrorCode::CaptchaRequired, err.to_string())
            }
            LoginError::CaptchaInvalid => ApiError::new(ErrorCode::CaptchaInvalid, err.to_string()),
            LoginError::Store(msg) => {
                tracing::error!("store error during login: {}", msg);
                ApiError::internal("An internal error occurred")
            }
        }
    }
}
