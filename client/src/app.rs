use campus_shared::catalog::full_catalog;
use campus_shared::nav_bar::{HOME_LABEL, is_section_active};
use campus_shared::role::SETTINGS_ROUTE;
use campus_shared::Role;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::api;
use crate::bottom_nav::BottomNav;
use crate::location::Location;
use crate::nav_bar::BottomNavBar;
use crate::session::AppSession;
use crate::settings_page::SettingsPage;

fn remove_loading_shell() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };
    if let Some(shell) = document.get_element_by_id("app-loading-shell") {
        shell.remove();
    }
}

/// Heading for a path: the role's dashboard, a catalog section, or the path
/// itself when nothing matches.
pub(crate) fn page_title(role: Role, path: &str) -> String {
    if path == "/" || path == role.dashboard_route() {
        return HOME_LABEL.to_owned();
    }
    full_catalog(role)
        .into_iter()
        .find(|button| is_section_active(path, &button.route))
        .map(|button| button.label)
        .unwrap_or_else(|| path.to_owned())
}

#[component]
pub fn App() -> impl IntoView {
    let session = AppSession::hydrate();
    let location = Location::install();
    let bottom_nav = BottomNav::new();
    provide_context(session);
    provide_context(location);
    provide_context(bottom_nav);

    Effect::new(move || session.persist());
    Effect::new(move || bottom_nav.load(session.role.get()));

    let show_onboarding = RwSignal::new(false);
    Effect::new(move || {
        if session.role.get().is_none() {
            show_onboarding.set(false);
            return;
        }
        spawn_local(async move {
            if api::is_first_time().await {
                show_onboarding.try_set(true);
            }
        });
    });
    let dismiss_onboarding = move |_| {
        show_onboarding.set(false);
        spawn_local(async {
            if let Err(e) = api::set_first_time(false).await {
                web_sys::console::warn_1(&format!("failed to store onboarding flag: {e}").into());
            }
        });
    };

    remove_loading_shell();

    view! {
        <div
            class="campus-app"
            style="min-height: 100vh; background: #f3f4f7; color: #1c1d21; font-family: system-ui, -apple-system, sans-serif;"
        >
            {move || {
                let Some(role) = session.role.get() else {
                    return view! { <RolePicker /> }.into_any();
                };
                let path = location.0.get();
                let page = if path == SETTINGS_ROUTE {
                    view! { <SettingsPage /> }.into_any()
                } else {
                    view! { <SectionPage role=role path=path /> }.into_any()
                };
                view! {
                    {move || {
                        show_onboarding.get().then(|| view! {
                            <div style="margin: 12px 16px 0; padding: 12px 14px; border-radius: 12px; background: #e8f1ff; font-size: 0.85rem; display: flex; gap: 8px; align-items: center;">
                                <span style="flex: 1;">
                                    "Нижнюю панель можно настроить: откройте «Настройки» и перетащите нужные разделы."
                                </span>
                                <button
                                    style="border: none; background: #0077FF; color: #ffffff; border-radius: 8px; padding: 6px 10px; cursor: pointer;"
                                    on:click=dismiss_onboarding
                                >
                                    "Понятно"
                                </button>
                            </div>
                        })
                    }}
                    {page}
                }
                .into_any()
            }}
            <BottomNavBar />
        </div>
    }
}

#[component]
fn SectionPage(role: Role, path: String) -> impl IntoView {
    let title = page_title(role, &path);
    view! {
        <div style="padding: 16px 16px 104px;">
            <h1 style="font-size: 1.4rem; margin: 4px 0 8px;">{title}</h1>
            <p style="font-size: 0.85rem; color: #8a8d96; margin: 0;">{role.label()}</p>
        </div>
    }
}

#[component]
fn RolePicker() -> impl IntoView {
    let session: AppSession = expect_context();
    let location: Location = expect_context();
    let university = RwSignal::new(session.university.get_untracked().unwrap_or_default());

    view! {
        <div style="padding: 32px 16px; max-width: 480px; margin: 0 auto;">
            <h1 style="font-size: 1.5rem; margin: 0 0 8px;">"Добро пожаловать"</h1>
            <p style="font-size: 0.9rem; color: #5b5e66; margin: 0 0 20px;">"Выберите, кто вы, чтобы настроить приложение."</p>
            <input
                type="text"
                placeholder="Университет"
                style="width: 100%; box-sizing: border-box; padding: 12px; border-radius: 12px; border: 1px solid #e3e5ea; font-size: 0.95rem; margin-bottom: 16px;"
                prop:value=move || university.get()
                on:input=move |e| university.set(event_target_value(&e))
            />
            <div style="display: grid; gap: 8px;">
                {Role::ALL
                    .into_iter()
                    .map(|role| {
                        view! {
                            <button
                                style="padding: 14px; border-radius: 12px; border: 1px solid #e3e5ea; background: #ffffff; font-size: 1rem; text-align: left; cursor: pointer;"
                                on:click=move |_| {
                                    session.select(role, Some(university.get_untracked()));
                                    location.navigate(role.dashboard_route());
                                }
                            >
                                {role.label()}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_and_root_are_home() {
        assert_eq!(page_title(Role::Student, "/"), HOME_LABEL);
        assert_eq!(page_title(Role::Student, "/dashboard/student"), HOME_LABEL);
    }

    #[test]
    fn catalog_sections_are_titled_by_label() {
        let library = full_catalog(Role::Student)
            .into_iter()
            .find(|b| b.id == "library")
            .unwrap();
        assert_eq!(page_title(Role::Student, &library.route), library.label);
        assert_eq!(
            page_title(Role::Student, &format!("{}/item/7", library.route)),
            library.label
        );
    }

    #[test]
    fn unknown_paths_fall_back_to_the_path() {
        assert_eq!(page_title(Role::Admin, "/nowhere"), "/nowhere");
    }
}
