//! Parsing of the messenger host's `initData` launch string
//! (`auth_date=...&hash=...&user=<json>&...`).

use serde::Deserialize;
use thiserror::Error;

/// Header the client uses to forward the launch string.
pub const INIT_DATA_HEADER: &str = "X-Max-Init-Data";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InitDataError {
    #[error("init data is empty")]
    Empty,
    #[error("init data has no user field")]
    MissingUser,
    #[error("init data user field is not valid JSON: {0}")]
    InvalidUser(String),
    #[error("init data user has no id")]
    MissingUserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InitDataUser {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
}

impl InitDataUser {
    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect();
        (!parts.is_empty()).then(|| parts.join(" "))
    }
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::String(s) => Ok(s),
        _ => Ok(String::new()),
    }
}

/// Extract the user from a raw launch string. The signature is not checked.
pub fn parse_user(raw: &str) -> Result<InitDataUser, InitDataError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(InitDataError::Empty);
    }
    let user_json = url::form_urlencoded::parse(raw.as_bytes())
        .find(|(key, _)| key == "user")
        .map(|(_, value)| value.into_owned())
        .ok_or(InitDataError::MissingUser)?;
    let user: InitDataUser = serde_json::from_str(&user_json)
        .map_err(|e| InitDataError::InvalidUser(e.to_string()))?;
    if user.id.trim().is_empty() {
        return Err(InitDataError::MissingUserId);
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "auth_date=1762996354&hash=89cd&chat=%7B%22id%22%3A95373502%7D&user=%7B%22id%22%3A5323614%2C%22first_name%22%3A%22%D0%9C%D0%B0%D0%BA%D1%81%D0%B8%D0%BC%22%2C%22last_name%22%3A%22%22%2C%22username%22%3Anull%2C%22language_code%22%3A%22ru%22%7D&query_id=094a";

    #[test]
    fn parses_numeric_user_id() {
        let user = parse_user(SAMPLE).unwrap();
        assert_eq!(user.id, "5323614");
        assert_eq!(user.first_name.as_deref(), Some("Максим"));
        assert_eq!(user.username, None);
        assert_eq!(user.full_name().as_deref(), Some("Максим"));
    }

    #[test]
    fn accepts_string_user_id() {
        let raw = "user=%7B%22id%22%3A%22abc%22%7D";
        assert_eq!(parse_user(raw).unwrap().id, "abc");
    }

    #[test]
    fn reports_missing_pieces() {
        assert_eq!(parse_user("  "), Err(InitDataError::Empty));
        assert_eq!(parse_user("auth_date=1"), Err(InitDataError::MissingUser));
        assert!(matches!(parse_user("user=notjson"), Err(InitDataError::InvalidUser(_))));
        assert_eq!(
            parse_user("user=%7B%22id%22%3Anull%7D"),
            Err(InitDataError::MissingUserId)
        );
    }
}
