use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use serde_json::Value;

use super::{ApiError, api_error, init_data_user};
use crate::state::AppState;
use crate::store::SettingsDocument;

/// `{ "settings": {...} }` for the caller; an empty document if they never saved.
pub async fn get_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user = init_data_user(&state, &headers, StatusCode::BAD_REQUEST)?;
    state.observability.record_settings_read();

    let settings = state.store.settings(&user.id).await.map_err(|e| {
        state.observability.record_store_failure();
        tracing::error!(error = %e, user_id = %user.id, "failed to load user settings");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "failed to load settings")
    })?;

    Ok(Json(envelope(settings.unwrap_or_default())))
}

/// Replace the caller's whole document and echo what was stored.
pub async fn save_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let user = init_data_user(&state, &headers, StatusCode::BAD_REQUEST)?;
    let settings = settings_from_body(body)?;

    let stored = state
        .store
        .replace_settings(&user, settings)
        .await
        .map_err(|e| {
            state.observability.record_store_failure();
            tracing::error!(error = %e, user_id = %user.id, "failed to save user settings");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "failed to save settings")
        })?;
    state.observability.record_settings_write();
    tracing::info!(user_id = %user.id, keys = stored.len(), "saved user settings");

    Ok(Json(envelope(stored)))
}

fn envelope(settings: SettingsDocument) -> Value {
    serde_json::json!({ "settings": settings })
}

/// The body must be `{ "settings": <object> }`; a `null` document clears it.
fn settings_from_body(body: Value) -> Result<SettingsDocument, ApiError> {
    let Value::Object(mut body) = body else {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "request body must be a JSON object",
        ));
    };
    match body.remove("settings") {
        Some(Value::Object(settings)) => Ok(settings),
        Some(Value::Null) => Ok(SettingsDocument::new()),
        Some(_) => Err(api_error(
            StatusCode::BAD_REQUEST,
            "settings must be a JSON object",
        )),
        None => Err(api_error(StatusCode::BAD_REQUEST, "settings is required")),
    }
}
