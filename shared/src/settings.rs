use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Accent colour applied to buttons that carry none.
pub const DEFAULT_ACCENT: &str = "#0077FF";

/// A navigation entry. Catalog entries are immutable; slots hold copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavButton {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub route: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl NavButton {
    pub fn new(id: &str, label: &str, icon: &str, route: &str) -> Self {
        Self {
            id: id.to_owned(),
            label: label.to_owned(),
            icon: Some(icon.to_owned()),
            route: route.to_owned(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_owned());
        self
    }

    /// Copy with the accent filled in when missing.
    pub fn with_default_accent(&self) -> Self {
        let mut copy = self.clone();
        if copy.color.as_deref().is_none_or(str::is_empty) {
            copy.color = Some(DEFAULT_ACCENT.to_owned());
        }
        copy
    }

    pub fn accent(&self) -> &str {
        self.color
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_ACCENT)
    }
}

/// Persisted bottom-nav configuration: 0..=3 buttons in slot order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BottomNavSettings {
    #[serde(default)]
    pub buttons: Vec<NavButton>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// The whole per-user settings document. The store only supports whole-document
/// writes, so unrelated keys ride along in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom_nav: Option<BottomNavSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_first_time: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserSettings {
    /// Stored buttons, or empty when nothing was ever saved.
    pub fn nav_buttons(&self) -> &[NavButton] {
        self.bottom_nav
            .as_ref()
            .map(|nav| nav.buttons.as_slice())
            .unwrap_or_default()
    }

    /// Replace the bottom-nav section, keeping every other key.
    /// The shared colour follows the first button.
    pub fn with_bottom_nav(mut self, buttons: Vec<NavButton>) -> Self {
        let color = buttons.first().and_then(|b| b.color.clone());
        self.bottom_nav = Some(BottomNavSettings { buttons, color });
        self
    }

    pub fn with_first_time(mut self, is_first_time: bool) -> Self {
        self.is_first_time = Some(is_first_time);
        self
    }

    /// A missing flag counts as a first visit.
    pub fn is_first_time(&self) -> bool {
        self.is_first_time != Some(false)
    }
}

/// Write body and canonical read shape: `{ "settings": {...} }`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsEnvelope {
    #[serde(default)]
    pub settings: Option<UserSettings>,
}

/// Every shape a settings read has been seen to return.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SettingsResponse {
    /// `{ "settings": {...} }`, `{ "settings": null }` or `{}`.
    Enveloped(SettingsEnvelope),
    /// The document itself without the wrapper.
    Bare(UserSettings),
}

impl SettingsResponse {
    pub fn into_settings(self) -> UserSettings {
        match self {
            Self::Enveloped(envelope) => envelope.settings.unwrap_or_default(),
            Self::Bare(settings) => settings,
        }
    }

    /// Normalize a raw body. An empty body is an empty document.
    pub fn parse(body: &str) -> Result<UserSettings, serde_json::Error> {
        if body.trim().is_empty() {
            return Ok(UserSettings::default());
        }
        let response: Option<SettingsResponse> = serde_json::from_str(body)?;
        Ok(response.map(Self::into_settings).unwrap_or_default())
    }
}

/// The signed-in user as reported by the backend.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CurrentUser {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub roles: Option<Vec<String>>,
}

impl CurrentUser {
    /// Applicants are signed in but still only see the public student sections.
    pub fn is_student_authenticated(&self) -> bool {
        self.role
            .as_deref()
            .is_some_and(|role| !role.is_empty() && role != "applicant")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button(id: &str) -> NavButton {
        NavButton::new(id, id, id, &format!("/dashboard/student/{id}"))
    }

    #[test]
    fn nav_button_omits_absent_optionals() {
        let json = serde_json::to_value(button("schedule")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "schedule",
                "label": "schedule",
                "icon": "schedule",
                "route": "/dashboard/student/schedule",
            })
        );
    }

    #[test]
    fn default_accent_only_fills_missing_colour() {
        assert_eq!(button("a").with_default_accent().color.as_deref(), Some(DEFAULT_ACCENT));
        let red = button("a").with_color("#ff0000");
        assert_eq!(red.with_default_accent().color.as_deref(), Some("#ff0000"));
        assert_eq!(button("a").accent(), DEFAULT_ACCENT);
    }

    #[test]
    fn enveloped_response_is_unwrapped() {
        let body = r##"{"settings":{"bottomNav":{"buttons":[{"id":"schedule","label":"S","route":"/s"}],"color":"#0077FF"},"isFirstTime":false}}"##;
        let settings = SettingsResponse::parse(body).unwrap();
        assert_eq!(settings.nav_buttons().len(), 1);
        assert_eq!(settings.nav_buttons()[0].id, "schedule");
        assert!(!settings.is_first_time());
    }

    #[test]
    fn missing_or_null_settings_mean_no_configuration() {
        for body in ["", "null", "{}", r#"{"settings":null}"#, r#"{"settings":{}}"#] {
            let settings = SettingsResponse::parse(body).unwrap();
            assert!(settings.nav_buttons().is_empty(), "body {body:?}");
            assert!(settings.is_first_time(), "body {body:?}");
        }
    }

    #[test]
    fn bare_document_is_accepted() {
        let body = r#"{"bottomNav":{"buttons":[]},"theme":"dark"}"#;
        let settings = SettingsResponse::parse(body).unwrap();
        assert!(settings.bottom_nav.is_some());
        assert_eq!(settings.extra.get("theme"), Some(&Value::from("dark")));
    }

    #[test]
    fn merge_keeps_unrelated_fields() {
        let body = r#"{"settings":{"isFirstTime":false,"theme":"dark"}}"#;
        let merged = SettingsResponse::parse(body)
            .unwrap()
            .with_bottom_nav(vec![button("events").with_color("#123456")]);

        let json = serde_json::to_value(&merged).unwrap();
        assert_eq!(json["isFirstTime"], Value::from(false));
        assert_eq!(json["theme"], Value::from("dark"));
        assert_eq!(json["bottomNav"]["color"], Value::from("#123456"));
        assert_eq!(json["bottomNav"]["buttons"][0]["id"], Value::from("events"));
    }

    #[test]
    fn empty_button_list_clears_colour() {
        let merged = UserSettings::default().with_bottom_nav(Vec::new());
        let nav = merged.bottom_nav.unwrap();
        assert!(nav.buttons.is_empty());
        assert_eq!(nav.color, None);
    }

    #[test]
    fn student_auth_requires_non_applicant_role() {
        let mut user = CurrentUser::default();
        assert!(!user.is_student_authenticated());
        user.role = Some("applicant".into());
        assert!(!user.is_student_authenticated());
        user.role = Some("student".into());
        assert!(user.is_student_authenticated());
        user.role = Some("staff".into());
        assert!(user.is_student_authenticated());
    }
}
