use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use campus_shared::CurrentUser;

use super::{ApiError, api_error, init_data_user};
use crate::state::AppState;

/// The caller's stored profile. A user appears here after their first save.
pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CurrentUser>, ApiError> {
    let user = init_data_user(&state, &headers, StatusCode::UNAUTHORIZED)?;

    let profile = state.store.profile(&user.id).await.map_err(|e| {
        state.observability.record_store_failure();
        tracing::error!(error = %e, user_id = %user.id, "failed to load user profile");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "failed to load profile")
    })?;

    let Some(profile) = profile else {
        return Err(api_error(StatusCode::NOT_FOUND, "profile not found"));
    };
    tracing::debug!(user_id = %profile.user_id, updated_at = %profile.updated_at, "served profile");
    Ok(Json(profile.to_current_user()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::spawn_test_server;
    use campus_shared::init_data::INIT_DATA_HEADER;

    const INIT_DATA: &str = "user=%7B%22id%22%3A42%2C%22first_name%22%3A%22Olga%22%2C%22last_name%22%3A%22Petrova%22%7D";

    #[tokio::test]
    async fn profile_appears_after_first_save() {
        let (addr, server_handle) = spawn_test_server(AppState::new(None)).await;
        let client = reqwest::Client::new();

        let before = client
            .get(format!("http://{addr}/api/v1/auth/me"))
            .header(INIT_DATA_HEADER, INIT_DATA)
            .send()
            .await
            .expect("me request");
        assert_eq!(before.status(), reqwest::StatusCode::NOT_FOUND);

        client
            .post(format!("http://{addr}/api/v1/users/settings"))
            .header(INIT_DATA_HEADER, INIT_DATA)
            .json(&serde_json::json!({ "settings": { "isFirstTime": false } }))
            .send()
            .await
            .expect("save request")
            .error_for_status()
            .expect("save status");

        let me = client
            .get(format!("http://{addr}/api/v1/auth/me"))
            .header(INIT_DATA_HEADER, INIT_DATA)
            .send()
            .await
            .expect("me request")
            .error_for_status()
            .expect("me status")
            .json::<CurrentUser>()
            .await
            .expect("parse me");
        assert_eq!(me.id.as_deref(), Some("42"));
        assert_eq!(me.full_name.as_deref(), Some("Olga Petrova"));
        assert!(!me.is_student_authenticated());

        server_handle.abort();
        let _ = server_handle.await;
    }

    #[tokio::test]
    async fn me_without_init_data_is_unauthorized() {
        let (addr, server_handle) = spawn_test_server(AppState::new(None)).await;

        let response = reqwest::Client::new()
            .get(format!("http://{addr}/api/v1/auth/me"))
            .send()
            .await
            .expect("me request");
        assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);

        server_handle.abort();
        let _ = server_handle.await;
    }
}
