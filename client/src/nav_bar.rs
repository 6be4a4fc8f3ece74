use campus_shared::nav_bar::{NavBarModel, NavItem};
use leptos::prelude::*;

use crate::bottom_nav::BottomNav;
use crate::icons::Icon;
use crate::location::Location;
use crate::session::AppSession;

const INACTIVE_COLOR: &str = "#8a8d96";

/// Fixed bottom bar: Home, the user's buttons, Settings. Hidden until a role
/// is picked.
#[component]
pub fn BottomNavBar() -> impl IntoView {
    let session: AppSession = expect_context();
    let bottom_nav: BottomNav = expect_context();
    let location: Location = expect_context();

    let model = Memo::new(move |_| {
        let path = location.0.get();
        bottom_nav.buttons.with(|buttons| {
            NavBarModel::build(
                session.role.get(),
                buttons,
                &path,
                bottom_nav.access.get(),
            )
        })
    });

    move || {
        let Some(model) = model.get() else {
            return ().into_any();
        };
        let accent = model.accent.clone();
        view! {
            <nav
                class="bottom-nav"
                style="position: fixed; left: 0; right: 0; bottom: 0; z-index: 20; display: flex; justify-content: space-around; align-items: stretch; background: #ffffff; border-top: 1px solid #e3e5ea; padding: 6px 4px calc(6px + env(safe-area-inset-bottom));"
            >
                {model
                    .items
                    .into_iter()
                    .map(|item| view! { <NavBarItem item=item accent=accent.clone() /> })
                    .collect_view()}
            </nav>
        }
        .into_any()
    }
}

#[component]
fn NavBarItem(item: NavItem, accent: String) -> impl IntoView {
    let location: Location = expect_context();
    let color = if item.active { accent } else { INACTIVE_COLOR.to_owned() };
    let route = item.route.clone();

    view! {
        <button
            data-nav-key=item.key.clone()
            aria-current=if item.active { Some("page") } else { None }
            style=format!(
                "flex: 1; min-width: 0; display: flex; flex-direction: column; align-items: center; gap: 2px; background: none; border: none; cursor: pointer; color: {color}; font-size: 0.68rem; font-weight: {}; padding: 4px 2px;",
                if item.active { 600 } else { 400 },
            )
            on:click=move |_| location.navigate(&route)
        >
            <Icon name=item.icon.clone() />
            <span style="max-width: 100%; overflow: hidden; text-overflow: ellipsis; white-space: nowrap;">
                {item.label.clone()}
            </span>
        </button>
    }
}
