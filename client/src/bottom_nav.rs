use campus_shared::{
    Access, NavButton, Role, UserSettings, default_buttons, filter_buttons_for_role,
};
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::api::{self, ApiError};

/// App-wide copy of the user's bottom-nav buttons. The settings screen edits
/// its own slots and publishes here after each successful save.
#[derive(Clone, Copy)]
pub struct BottomNav {
    pub buttons: RwSignal<Vec<NavButton>>,
    pub loading: RwSignal<bool>,
    pub access: RwSignal<Access>,
    generation: StoredValue<u64>,
}

/// Buttons to show for what the store returned (role defaults when empty), and
/// whether the store needs rewriting because the role filter dropped something.
pub(crate) fn resolve_buttons(
    settings: &UserSettings,
    role: Option<Role>,
    access: Access,
) -> (Vec<NavButton>, bool) {
    let stored = settings.nav_buttons();
    let base = if stored.is_empty() {
        role.map(default_buttons).unwrap_or_default()
    } else {
        stored.to_vec()
    };
    let filtered = filter_buttons_for_role(base, role, access);
    let changed = filtered.changed();
    (filtered.into_buttons(), changed)
}

impl BottomNav {
    pub fn new() -> Self {
        Self {
            buttons: RwSignal::new(Vec::new()),
            loading: RwSignal::new(true),
            access: RwSignal::new(Access::Unknown),
            generation: StoredValue::new(0),
        }
    }

    /// Fetch settings and the current user together and publish the result.
    /// A newer call supersedes one still in flight.
    pub fn load(&self, role: Option<Role>) {
        let this = *self;
        let generation = self.bump_generation();
        self.loading.set(true);

        let Some(role) = role else {
            self.buttons.set(Vec::new());
            self.loading.set(false);
            return;
        };

        spawn_local(async move {
            let (settings, user) =
                futures::join!(api::get_user_settings(), api::fetch_current_user());
            if this.generation.try_get_value() != Some(generation) {
                return;
            }

            // An unresolved user only sees the public student sections.
            let authenticated = match user {
                Ok(user) => user.is_some_and(|user| user.is_student_authenticated()),
                Err(e) => {
                    web_sys::console::warn_1(&format!("current user lookup failed: {e}").into());
                    false
                }
            };
            let access = Access::from_authenticated(Some(authenticated));
            let (buttons, needs_resave) = resolve_buttons(&settings, Some(role), access);

            this.access.set(access);
            this.buttons.set(buttons.clone());
            this.loading.set(false);

            if needs_resave && let Err(e) = api::save_bottom_nav(buttons).await {
                web_sys::console::warn_1(
                    &format!("failed to rewrite filtered bottom nav: {e}").into(),
                );
            }
        });
    }

    /// Sanitize for the role, persist, then publish.
    pub async fn update_buttons(
        &self,
        role: Option<Role>,
        buttons: Vec<NavButton>,
    ) -> Result<(), ApiError> {
        let access = self.access.get_untracked();
        let buttons = filter_buttons_for_role(buttons, role, access).into_buttons();
        api::save_bottom_nav(buttons.clone()).await?;
        self.buttons.try_set(buttons);
        Ok(())
    }

    fn bump_generation(&self) -> u64 {
        self.generation.update_value(|generation| *generation += 1);
        self.generation.get_value()
    }
}
