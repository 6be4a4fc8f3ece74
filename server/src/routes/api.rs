use axum::Json;
use axum::extract::State;

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let observability = state.observability.snapshot();
    Json(serde_json::json!({
        "status": "ok",
        "store": state.store.backend_name(),
        "persistent": state.store.is_persistent(),
        "observability": {
            "settings_reads_total": observability.settings_reads_total,
            "settings_writes_total": observability.settings_writes_total,
            "rejected_init_data_total": observability.rejected_init_data_total,
            "store_failures_total": observability.store_failures_total,
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::spawn_test_server;

    #[tokio::test]
    async fn health_reports_store_and_counters() {
        let state = AppState::new(None);
        state.observability.record_settings_read();
        state.observability.record_store_failure();
        let (addr, server_handle) = spawn_test_server(state).await;

        let health = reqwest::Client::new()
            .get(format!("http://{addr}/api/health"))
            .send()
            .await
            .expect("health request")
            .error_for_status()
            .expect("health status")
            .json::<serde_json::Value>()
            .await
            .expect("parse health");

        assert_eq!(health.get("status").and_then(|v| v.as_str()), Some("ok"));
        assert_eq!(health.get("store").and_then(|v| v.as_str()), Some("memory"));
        assert_eq!(
            health.get("persistent").and_then(|v| v.as_bool()),
            Some(false)
        );
        let observability = health.get("observability").expect("observability block");
        assert_eq!(observability["settings_reads_total"], 1);
        assert_eq!(observability["store_failures_total"], 1);
        assert_eq!(observability["settings_writes_total"], 0);

        server_handle.abort();
        let _ = server_handle.await;
    }
}
