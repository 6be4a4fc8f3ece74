pub mod api;
pub mod auth;
pub mod settings;

use axum::Json;
use axum::http::{HeaderMap, StatusCode};
use campus_shared::init_data::{self, INIT_DATA_HEADER, InitDataUser};

use crate::state::AppState;

/// Error responses carry `{ "detail": "..." }`.
pub type ApiError = (StatusCode, Json<serde_json::Value>);

pub(crate) fn api_error(status: StatusCode, detail: impl Into<String>) -> ApiError {
    (status, Json(serde_json::json!({ "detail": detail.into() })))
}

/// Resolve the caller from the launch string the client forwards.
pub(crate) fn init_data_user(
    state: &AppState,
    headers: &HeaderMap,
    rejection: StatusCode,
) -> Result<InitDataUser, ApiError> {
    let raw = headers
        .get(INIT_DATA_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    init_data::parse_user(raw).map_err(|e| {
        state.observability.record_rejected_init_data();
        tracing::debug!(error = %e, "rejected init data");
        api_error(rejection, e.to_string())
    })
}
