use std::sync::Arc;

use campus_shared::CurrentUser;
use campus_shared::init_data::InitDataUser;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde_json::{Map, Value};
use sqlx::PgPool;

pub type SettingsDocument = Map<String, Value>;
pub type StoreResult<T> = Result<T, sqlx_core::Error>;

#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub user_id: String,
    pub role: Option<String>,
    pub email: String,
    pub full_name: String,
    pub settings: SettingsDocument,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    fn from_init_data(user: &InitDataUser) -> Self {
        Self {
            user_id: user.id.clone(),
            role: None,
            email: String::new(),
            full_name: user.full_name().unwrap_or_default(),
            settings: SettingsDocument::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn to_current_user(&self) -> CurrentUser {
        let non_empty = |value: &str| (!value.is_empty()).then(|| value.to_owned());
        CurrentUser {
            id: Some(self.user_id.clone()),
            email: non_empty(&self.email),
            full_name: non_empty(&self.full_name),
            role: self.role.clone(),
            roles: self.role.clone().map(|role| vec![role]),
        }
    }
}

type ProfileRow = (
    String,
    Option<String>,
    String,
    String,
    Value,
    DateTime<Utc>,
);

/// Per-user settings documents. A profile row is created on the first save.
#[derive(Clone)]
pub enum SettingsStore {
    Memory(Arc<DashMap<String, UserProfile>>),
    Postgres(PgPool),
}

impl SettingsStore {
    pub fn in_memory() -> Self {
        Self::Memory(Arc::new(DashMap::new()))
    }

    pub fn is_persistent(&self) -> bool {
        matches!(self, Self::Postgres(_))
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Postgres(_) => "postgres",
        }
    }

    /// `None` when the user has never saved anything.
    pub async fn settings(&self, user_id: &str) -> StoreResult<Option<SettingsDocument>> {
        match self {
            Self::Memory(profiles) => Ok(profiles
                .get(user_id)
                .map(|profile| profile.settings.clone())),
            Self::Postgres(pool) => {
                let row: Option<(Value,)> =
                    sqlx::query_as("SELECT settings FROM user_profiles WHERE user_id = $1")
                        .bind(user_id)
                        .fetch_optional(pool)
                        .await?;
                Ok(row.map(|(settings,)| into_document(settings)))
            }
        }
    }

    /// Replace the whole document. Concurrent writers race; the last one wins.
    pub async fn replace_settings(
        &self,
        user: &InitDataUser,
        settings: SettingsDocument,
    ) -> StoreResult<SettingsDocument> {
        match self {
            Self::Memory(profiles) => {
                let mut profile = profiles
                    .entry(user.id.clone())
                    .or_insert_with(|| UserProfile::from_init_data(user));
                profile.settings = settings.clone();
                profile.updated_at = Utc::now();
                Ok(settings)
            }
            Self::Postgres(pool) => {
                let (stored,): (Value,) = sqlx::query_as(
                    "INSERT INTO user_profiles (user_id, full_name, settings, updated_at)
                     VALUES ($1, $2, $3, NOW())
                     ON CONFLICT (user_id) DO UPDATE
                     SET settings = EXCLUDED.settings,
                         full_name = CASE
                             WHEN user_profiles.full_name = '' THEN EXCLUDED.full_name
                             ELSE user_profiles.full_name
                         END,
                         updated_at = NOW()
                     RETURNING settings",
                )
                .bind(&user.id)
                .bind(user.full_name().unwrap_or_default())
                .bind(Value::Object(settings))
                .fetch_one(pool)
                .await?;
                Ok(into_document(stored))
            }
        }
    }

    pub async fn profile(&self, user_id: &str) -> StoreResult<Option<UserProfile>> {
        match self {
            Self::Memory(profiles) => Ok(profiles.get(user_id).map(|profile| profile.clone())),
            Self::Postgres(pool) => {
                let row: Option<ProfileRow> = sqlx::query_as(
                    "SELECT user_id, role, email, full_name, settings, updated_at
                     FROM user_profiles WHERE user_id = $1",
                )
                .bind(user_id)
                .fetch_optional(pool)
                .await?;
                Ok(row.map(
                    |(user_id, role, email, full_name, settings, updated_at)| UserProfile {
                        user_id,
                        role,
                        email,
                        full_name,
                        settings: into_document(settings),
                        updated_at,
                    },
                ))
            }
        }
    }
}

fn into_document(value: Value) -> SettingsDocument {
    match value {
        Value::Object(map) => map,
        _ => SettingsDocument::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(id: &str) -> InitDataUser {
        serde_json::from_value(json!({ "id": id, "first_name": "Анна", "last_name": "Ли" }))
            .unwrap()
    }

    fn document(value: Value) -> SettingsDocument {
        into_document(value)
    }

    #[tokio::test]
    async fn unknown_user_has_no_document() {
        let store = SettingsStore::in_memory();
        assert_eq!(store.settings("42").await.unwrap(), None);
        assert_eq!(store.profile("42").await.unwrap(), None);
        assert!(!store.is_persistent());
        assert_eq!(store.backend_name(), "memory");
    }

    #[tokio::test]
    async fn first_save_creates_profile_from_init_data() {
        let store = SettingsStore::in_memory();
        store
            .replace_settings(&user("7"), document(json!({ "isFirstTime": false })))
            .await
            .unwrap();

        let profile = store.profile("7").await.unwrap().unwrap();
        assert_eq!(profile.full_name, "Анна Ли");
        assert_eq!(profile.role, None);
        assert_eq!(profile.settings.get("isFirstTime"), Some(&json!(false)));
    }

    #[tokio::test]
    async fn save_replaces_the_whole_document() {
        let store = SettingsStore::in_memory();
        let alice = user("1");
        store
            .replace_settings(&alice, document(json!({ "a": 1, "b": 2 })))
            .await
            .unwrap();
        store
            .replace_settings(&alice, document(json!({ "b": 3 })))
            .await
            .unwrap();

        assert_eq!(
            store.settings("1").await.unwrap(),
            Some(document(json!({ "b": 3 })))
        );
    }

    #[test]
    fn non_object_documents_read_as_empty() {
        assert!(into_document(json!([1, 2])).is_empty());
        assert!(into_document(Value::Null).is_empty());
    }

    #[test]
    fn current_user_omits_blank_fields() {
        let mut profile = UserProfile::from_init_data(&user("9"));
        let current = profile.to_current_user();
        assert_eq!(current.id.as_deref(), Some("9"));
        assert_eq!(current.email, None);
        assert_eq!(current.full_name.as_deref(), Some("Анна Ли"));
        assert_eq!(current.roles, None);

        profile.role = Some("student".into());
        let current = profile.to_current_user();
        assert_eq!(current.roles, Some(vec!["student".to_owned()]));
        assert!(current.is_student_authenticated());
    }
}
