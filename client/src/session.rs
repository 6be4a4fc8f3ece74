use campus_shared::Role;
use gloo_storage::Storage;
use leptos::prelude::*;
use serde::{Deserialize, Serialize};

pub const SESSION_STORAGE_KEY: &str = "campus-app-state";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StoredSession {
    role: Option<Role>,
    university: Option<String>,
}

/// Role and university picked on the welcome screen. Lives for the app
/// session and survives reloads through local storage.
#[derive(Clone, Copy)]
pub struct AppSession {
    pub role: RwSignal<Option<Role>>,
    pub university: RwSignal<Option<String>>,
}

impl AppSession {
    /// Restore from local storage. Unreadable or missing state starts empty.
    pub fn hydrate() -> Self {
        let stored: StoredSession = gloo_storage::LocalStorage::get(SESSION_STORAGE_KEY)
            .unwrap_or_default();
        Self {
            role: RwSignal::new(stored.role),
            university: RwSignal::new(stored.university),
        }
    }

    /// Write the current values. Reads are tracked so this can back an effect.
    pub fn persist(&self) {
        let stored = StoredSession {
            role: self.role.get(),
            university: self.university.get(),
        };
        if stored == StoredSession::default() {
            gloo_storage::LocalStorage::delete(SESSION_STORAGE_KEY);
            return;
        }
        if let Err(e) = gloo_storage::LocalStorage::set(SESSION_STORAGE_KEY, &stored) {
            web_sys::console::warn_1(&format!("failed to persist session: {e}").into());
        }
    }

    pub fn select(&self, role: Role, university: Option<String>) {
        self.university
            .set(university.filter(|name| !name.trim().is_empty()));
        self.role.set(Some(role));
    }

    /// Logout teardown: forget the selection everywhere.
    pub fn clear(&self) {
        self.role.set(None);
        self.university.set(None);
        gloo_storage::LocalStorage::delete(SESSION_STORAGE_KEY);
    }
}
