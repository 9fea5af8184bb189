//! Long-poll retrieval handler.

use std::sync::Arc;

use axum::extract::{Path, State};

use super::AppState;

/// Message envelope prefix, preserved verbatim from the observed wire
/// contract.
const ENVELOPE_PREFIX: &str = "|| MENSAGEM || : ";

/// GET /link/{name}/getmsg - Consume the pending message, waiting up to the
/// configured bound for one to arrive.
///
/// Unauthenticated. The body is empty both for an unknown service and for a
/// timeout; callers who need an existence check use the service endpoints.
pub async fn getmsg(State(state): State<Arc<AppState>>, Path(name): Path<String>) -> String {
    match state.mailboxes.retrieve(&name, state.max_wait).await {
        Some(message) => format!("{ENVELOPE_PREFIX}{message}"),
        None => String::new(),
    }
}
