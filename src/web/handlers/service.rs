//! Service management and message send handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use super::{AppState, AuthAccount};
use crate::auth::validation::validate_service_name;
use crate::web::dto::{ApiResponse, CreateServiceRequest, SendMessageRequest, ServiceInfo};
use crate::web::error::ApiError;

/// POST /api/services - Create a service for the authenticated account.
pub async fn create_service(
    State(state): State<Arc<AppState>>,
    AuthAccount(account): AuthAccount,
    Json(req): Json<CreateServiceRequest>,
) -> Result<Json<ApiResponse<ServiceInfo>>, ApiError> {
    validate_service_name(&req.name).map_err(|e| ApiError::validation(e.to_string()))?;

    let service = state.store.create_service(&req.name, &account)?;
    state.mailboxes.register(&service.name);

    info!(service = %service.name, owner = %account, "service created");
    Ok(Json(ApiResponse::new(service.into())))
}

/// GET /api/services - List the authenticated account's services.
pub async fn list_services(
    State(state): State<Arc<AppState>>,
    AuthAccount(account): AuthAccount,
) -> Result<Json<ApiResponse<Vec<ServiceInfo>>>, ApiError> {
    let services = state
        .store
        .services_by_owner(&account)?
        .into_iter()
        .map(ServiceInfo::from)
        .collect();

    Ok(Json(ApiResponse::new(services)))
}

/// POST /api/services/{name} - Store a message in the service's mailbox.
///
/// Only the owning account may send; the new message overwrites any unread
/// one.
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    AuthAccount(account): AuthAccount,
    Path(name): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let service = state
        .store
        .find_service(&name)?
        .ok_or_else(|| ApiError::not_found("service not found"))?;

    if service.owner != account {
        return Err(ApiError::forbidden("You do not own this service"));
    }

    state.mailboxes.send(&name, &req.message)?;
    Ok(Json(ApiResponse::new(())))
}
