use std::collections::HashSet;

use crate::catalog::filter_buttons_for_role;
use crate::role::{Access, Role, SETTINGS_ROUTE, is_structural_id};
use crate::settings::{DEFAULT_ACCENT, NavButton};
use crate::slots::SLOT_COUNT;

pub const HOME_LABEL: &str = "Главная";
pub const HOME_ICON: &str = "home";
pub const SETTINGS_LABEL: &str = "Настройки";
pub const SETTINGS_ICON: &str = "settings";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavItemKind {
    Home,
    Custom,
    Settings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub kind: NavItemKind,
    pub key: String,
    pub label: String,
    pub icon: Option<String>,
    pub route: String,
    pub active: bool,
}

/// Render model of the bottom bar: Home, up to three custom buttons, Settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavBarModel {
    pub items: Vec<NavItem>,
    pub accent: String,
}

impl NavBarModel {
    /// `None` when no role is selected: the bar is not shown at all.
    pub fn build(
        role: Option<Role>,
        buttons: &[NavButton],
        path: &str,
        access: Access,
    ) -> Option<Self> {
        let role = role?;
        let home = role.dashboard_route();

        let custom = filter_buttons_for_role(
            buttons
                .iter()
                .filter(|button| !is_structural_id(&button.id))
                .cloned()
                .collect(),
            Some(role),
            access,
        )
        .into_buttons();

        let accent = custom
            .first()
            .and_then(|button| button.color.clone())
            .filter(|color| !color.is_empty())
            .unwrap_or_else(|| DEFAULT_ACCENT.to_owned());

        let mut items = Vec::with_capacity(SLOT_COUNT + 2);
        items.push(NavItem {
            kind: NavItemKind::Home,
            key: "dashboard".to_owned(),
            label: HOME_LABEL.to_owned(),
            icon: Some(HOME_ICON.to_owned()),
            route: home.to_owned(),
            active: path == home,
        });
        let mut seen = HashSet::new();
        let custom = custom
            .into_iter()
            .filter(|button| seen.insert(button.id.clone()))
            .take(SLOT_COUNT);
        items.extend(custom.map(|button| NavItem {
            kind: NavItemKind::Custom,
            active: is_section_active(path, &button.route),
            key: button.id,
            label: button.label,
            icon: button.icon,
            route: button.route,
        }));
        items.push(NavItem {
            kind: NavItemKind::Settings,
            key: "settings".to_owned(),
            label: SETTINGS_LABEL.to_owned(),
            icon: Some(SETTINGS_ICON.to_owned()),
            route: SETTINGS_ROUTE.to_owned(),
            active: path == SETTINGS_ROUTE,
        });

        Some(Self { items, accent })
    }

    pub fn custom_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.kind == NavItemKind::Custom)
            .count()
    }
}

/// A section button stays lit on its own sub-routes.
pub fn is_section_active(path: &str, route: &str) -> bool {
    path == route
        || path
            .strip_prefix(route)
            .is_some_and(|rest| rest.starts_with('/'))
}
