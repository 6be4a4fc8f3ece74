//! Backend calls. Every request carries the messenger launch string and, when
//! signed in, the stored bearer token.

use campus_shared::init_data::INIT_DATA_HEADER;
use campus_shared::{CurrentUser, NavButton, SettingsEnvelope, SettingsResponse, UserSettings};
use gloo_net::http::{Request, RequestBuilder, Response};
use gloo_storage::Storage;
use js_sys::Reflect;
use thiserror::Error;
use wasm_bindgen::JsValue;

pub const API_BASE_URL: &str = match option_env!("CAMPUS_API_BASE_URL") {
    Some(url) => url,
    None => "/api/v1",
};

/// Local-storage key of the bearer token issued at sign-in.
pub const ACCESS_TOKEN_KEY: &str = "api_access_token";

const SETTINGS_PATH: &str = "/users/settings";
const CURRENT_USER_PATH: &str = "/auth/me";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP {status} {status_text}")]
    Status { status: u16, status_text: String },
    #[error("decode error: {0}")]
    Decode(String),
}

/// Join the API base and a path without doubling or dropping the slash.
pub fn endpoint(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn access_token() -> Option<String> {
    gloo_storage::LocalStorage::raw()
        .get_item(ACCESS_TOKEN_KEY)
        .ok()
        .flatten()
        .filter(|token| !token.trim().is_empty())
}

/// `window.WebApp.initData`, present only inside the messenger host.
fn host_init_data() -> Option<String> {
    let window = web_sys::window()?;
    let web_app = Reflect::get(window.as_ref(), &JsValue::from_str("WebApp")).ok()?;
    if web_app.is_undefined() || web_app.is_null() {
        return None;
    }
    Reflect::get(&web_app, &JsValue::from_str("initData"))
        .ok()?
        .as_string()
        .filter(|raw| !raw.is_empty())
}

fn with_headers(builder: RequestBuilder) -> RequestBuilder {
    let mut builder = builder.header("Accept", "application/json");
    if let Some(token) = access_token() {
        builder = builder.header("Authorization", &format!("Bearer {token}"));
    }
    if let Some(init_data) = host_init_data() {
        builder = builder.header(INIT_DATA_HEADER, &init_data);
    }
    builder
}

fn check_status(response: Response) -> Result<Response, ApiError> {
    if response.ok() {
        Ok(response)
    } else {
        Err(ApiError::Status {
            status: response.status(),
            status_text: response.status_text(),
        })
    }
}

async fn read_settings(response: Response) -> Result<UserSettings, ApiError> {
    let body = response
        .text()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    SettingsResponse::parse(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

pub async fn try_get_user_settings() -> Result<UserSettings, ApiError> {
    let response = with_headers(Request::get(&endpoint(API_BASE_URL, SETTINGS_PATH)))
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    read_settings(check_status(response)?).await
}

/// A failed read is an empty document: callers fall back to defaults.
pub async fn get_user_settings() -> UserSettings {
    match try_get_user_settings().await {
        Ok(settings) => settings,
        Err(e) => {
            web_sys::console::warn_1(&format!("settings load failed: {e}").into());
            UserSettings::default()
        }
    }
}

/// Write the whole document. Returns what the server stored.
pub async fn save_user_settings(settings: &UserSettings) -> Result<UserSettings, ApiError> {
    let body = SettingsEnvelope {
        settings: Some(settings.clone()),
    };
    let request = with_headers(Request::post(&endpoint(API_BASE_URL, SETTINGS_PATH)))
        .json(&body)
        .map_err(|e| ApiError::Decode(e.to_string()))?;
    let response = request
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    read_settings(check_status(response)?).await
}

/// Read, replace the bottom-nav section, write back. A failed read aborts the
/// write so unrelated keys are never clobbered with an empty document.
pub async fn save_bottom_nav(buttons: Vec<NavButton>) -> Result<(), ApiError> {
    let current = try_get_user_settings().await?;
    save_user_settings(&current.with_bottom_nav(buttons)).await?;
    Ok(())
}

pub async fn is_first_time() -> bool {
    get_user_settings().await.is_first_time()
}

pub async fn set_first_time(is_first_time: bool) -> Result<(), ApiError> {
    let current = try_get_user_settings().await?;
    save_user_settings(&current.with_first_time(is_first_time)).await?;
    Ok(())
}

/// `Ok(None)` when the backend does not know the caller (401/404).
pub async fn fetch_current_user() -> Result<Option<CurrentUser>, ApiError> {
    let response = with_headers(Request::get(&endpoint(API_BASE_URL, CURRENT_USER_PATH)))
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    if matches!(response.status(), 401 | 404) {
        return Ok(None);
    }
    check_status(response)?
        .json::<CurrentUser>()
        .await
        .map(Some)
        .map_err(|e| ApiError::Decode(e.to_string()))
}

/// Forget the bearer token. Launch data from the host is not ours to clear.
pub fn logout() {
    gloo_storage::LocalStorage::delete(ACCESS_TOKEN_KEY);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_with_single_slash() {
        assert_eq!(endpoint("/api/v1", "/users/settings"), "/api/v1/users/settings");
        assert_eq!(endpoint("/api/v1/", "users/settings"), "/api/v1/users/settings");
        assert_eq!(
            endpoint("https://campus.example/api/v1//", "//auth/me"),
            "https://campus.example/api/v1/auth/me"
        );
    }

    #[test]
    fn status_error_reads_like_http() {
        let error = ApiError::Status {
            status: 503,
            status_text: "Service Unavailable".into(),
        };
        assert_eq!(error.to_string(), "HTTP 503 Service Unavailable");
        assert_eq!(
            ApiError::Decode("eof".into()).to_string(),
            "decode error: eof"
        );
    }

    #[test]
    fn default_base_is_relative_api() {
        if option_env!("CAMPUS_API_BASE_URL").is_none() {
            assert_eq!(API_BASE_URL, "/api/v1");
        }
    }
}
