//! Static per-role button catalogs and the role filter applied to stored
//! configurations.

use std::collections::HashSet;

use crate::role::{Access, Role};
use crate::settings::{DEFAULT_ACCENT, NavButton};

/// Student sections reachable without signing in.
pub const STUDENT_PUBLIC_SECTION_IDS: [&str; 4] = ["schedule", "task-tracker", "events", "vacancies"];

type Entry = (&'static str, &'static str, &'static str, &'static str);

const ABITURIENT: &[Entry] = &[
    ("programs", "Программы", "programs", "/dashboard/abiturient/programs"),
    (
        "admission-conditions",
        "Условия поступления",
        "admission-conditions",
        "/dashboard/abiturient/admission-conditions",
    ),
    ("open-day", "Дни открытых дверей", "open-day", "/dashboard/abiturient/open-day"),
    ("inquiry", "Вопрос", "admission-inquiry", "/dashboard/abiturient/admission-inquiry"),
];

const STUDENT: &[Entry] = &[
    ("schedule", "Расписание", "schedule", "/dashboard/student/schedule"),
    ("task-tracker", "Таск-трекер", "task-tracker", "/dashboard/student/task-tracker"),
    ("events", "События кампуса", "events", "/dashboard/student/events"),
    ("vacancies", "Вакансии партнеров", "vacancies", "/dashboard/student/vacancies"),
    ("projects", "Проекты", "projects", "/dashboard/student/projects"),
    ("career", "Карьера и консультации", "career", "/dashboard/student/career"),
    ("deanery", "Деканат", "deanery", "/dashboard/student/deanery"),
    ("dormitory", "Общежитие", "dormitory", "/dashboard/student/dormitory"),
    ("library", "Библиотека", "library", "/dashboard/student/library"),
];

const STAFF: &[Entry] = &[
    ("travel", "Командировки", "business-trips", "/dashboard/staff/travel"),
    ("vacations", "Отпуска", "vacations", "/dashboard/staff/vacations"),
    ("office", "Офис и HR", "office", "/dashboard/staff/office"),
];

const ADMIN: &[Entry] = &[
    ("campus", "Управление", "campus-management", "/dashboard/admin"),
    ("metrics", "Метрики", "academic-metrics", "/dashboard/admin"),
    ("news", "Новости", "news-aggregator", "/dashboard/admin"),
];

fn entries(role: Role) -> &'static [Entry] {
    match role {
        Role::Abiturient => ABITURIENT,
        Role::Student => STUDENT,
        Role::Staff => STAFF,
        Role::Admin => ADMIN,
    }
}

fn to_button(&(id, label, icon, route): &Entry) -> NavButton {
    NavButton::new(id, label, icon, route)
}

/// The full, ungated catalog of a role.
pub fn full_catalog(role: Role) -> Vec<NavButton> {
    entries(role).iter().map(to_button).collect()
}

/// Candidate buttons for `role`, in catalog order. `None` (a role string the
/// app does not know) has no catalog.
pub fn available_buttons(role: Option<Role>, access: Access) -> Vec<NavButton> {
    let Some(role) = role else {
        return Vec::new();
    };
    let gate_public = role == Role::Student && access.is_public();
    entries(role)
        .iter()
        .filter(|(id, ..)| !gate_public || STUDENT_PUBLIC_SECTION_IDS.contains(id))
        .map(to_button)
        .collect()
}

/// Outcome of checking a stored button list against a role's catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleFilter {
    /// Ids outside the catalog were dropped; order preserved.
    Filtered { buttons: Vec<NavButton>, dropped: usize },
    /// No catalog to check against (unknown role); input passed through as is.
    Unrestricted(Vec<NavButton>),
}

impl RoleFilter {
    pub fn buttons(&self) -> &[NavButton] {
        match self {
            Self::Filtered { buttons, .. } | Self::Unrestricted(buttons) => buttons,
        }
    }

    pub fn into_buttons(self) -> Vec<NavButton> {
        match self {
            Self::Filtered { buttons, .. } | Self::Unrestricted(buttons) => buttons,
        }
    }

    /// Whether filtering removed anything, i.e. the stored copy is stale.
    pub fn changed(&self) -> bool {
        matches!(self, Self::Filtered { dropped, .. } if *dropped > 0)
    }
}

pub fn filter_buttons_for_role(
    buttons: Vec<NavButton>,
    role: Option<Role>,
    access: Access,
) -> RoleFilter {
    let allowed: HashSet<String> = available_buttons(role, access)
        .into_iter()
        .map(|button| button.id)
        .collect();
    if allowed.is_empty() {
        return RoleFilter::Unrestricted(buttons);
    }

    let before = buttons.len();
    let buttons: Vec<NavButton> = buttons
        .into_iter()
        .filter(|button| allowed.contains(&button.id))
        .collect();
    RoleFilter::Filtered {
        dropped: before - buttons.len(),
        buttons,
    }
}

/// Buttons shown before the user has saved anything. Home and Settings are
/// fixed and never part of this list.
pub fn default_buttons(role: Role) -> Vec<NavButton> {
    let ids: &[&str] = match role {
        Role::Abiturient => &["programs", "open-day"],
        Role::Student => &["schedule", "projects", "library"],
        Role::Staff => &["travel", "vacations", "office"],
        Role::Admin => &["metrics", "news"],
    };
    entries(role)
        .iter()
        .filter(|(id, ..)| ids.contains(id))
        .map(|entry| to_button(entry).with_color(DEFAULT_ACCENT))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(buttons: &[NavButton]) -> Vec<&str> {
        buttons.iter().map(|b| b.id.as_str()).collect()
    }

    #[test]
    fn public_student_catalog_is_exactly_four_sections() {
        let buttons = available_buttons(Some(Role::Student), Access::Public);
        assert_eq!(ids(&buttons), vec!["schedule", "task-tracker", "events", "vacancies"]);
        assert!(full_catalog(Role::Student).len() > buttons.len());
    }

    #[test]
    fn authenticated_or_unknown_student_sees_full_catalog() {
        let full = full_catalog(Role::Student);
        assert_eq!(available_buttons(Some(Role::Student), Access::Authenticated), full);
        assert_eq!(available_buttons(Some(Role::Student), Access::Unknown), full);
    }

    #[test]
    fn access_gate_only_applies_to_students() {
        for role in [Role::Abiturient, Role::Staff, Role::Admin] {
            assert_eq!(available_buttons(Some(role), Access::Public), full_catalog(role));
        }
    }

    #[test]
    fn unknown_role_has_empty_catalog() {
        assert!(available_buttons(None, Access::Authenticated).is_empty());
    }

    #[test]
    fn available_buttons_is_idempotent_subset_of_catalog() {
        for role in Role::ALL {
            let full = ids(&full_catalog(role)).into_iter().map(str::to_owned).collect::<HashSet<_>>();
            for access in [Access::Unknown, Access::Public, Access::Authenticated] {
                let first = available_buttons(Some(role), access);
                let second = available_buttons(Some(role), access);
                assert_eq!(first, second);
                assert!(first.iter().all(|b| full.contains(&b.id)));
            }
        }
    }

    #[test]
    fn catalog_ids_are_unique_per_role() {
        for role in Role::ALL {
            let catalog = full_catalog(role);
            let unique: HashSet<_> = catalog.iter().map(|b| &b.id).collect();
            assert_eq!(unique.len(), catalog.len(), "{role:?}");
        }
    }

    #[test]
    fn filter_preserves_order_and_drops_foreign_ids() {
        let input = vec![
            full_catalog(Role::Student)[8].clone(),
            NavButton::new("travel", "x", "x", "/dashboard/staff/travel"),
            full_catalog(Role::Student)[0].clone(),
        ];
        let result = filter_buttons_for_role(input, Some(Role::Student), Access::Authenticated);
        assert_eq!(ids(result.buttons()), vec!["library", "schedule"]);
        assert!(result.changed());
        assert!(matches!(result, RoleFilter::Filtered { dropped: 1, .. }));
    }

    #[test]
    fn filter_drops_private_sections_for_public_student() {
        let result = filter_buttons_for_role(
            default_buttons(Role::Student),
            Some(Role::Student),
            Access::Public,
        );
        assert_eq!(ids(result.buttons()), vec!["schedule"]);
        assert!(result.changed());
    }

    #[test]
    fn filter_passes_through_for_unknown_role() {
        let input = default_buttons(Role::Staff);
        let result = filter_buttons_for_role(input.clone(), None, Access::Unknown);
        assert_eq!(result, RoleFilter::Unrestricted(input));
        assert!(!result.changed());
    }

    #[test]
    fn defaults_are_coloured_catalog_members() {
        for role in Role::ALL {
            let defaults = default_buttons(role);
            assert!(!defaults.is_empty() && defaults.len() <= 3);
            let result = filter_buttons_for_role(defaults.clone(), Some(role), Access::Unknown);
            assert!(!result.changed());
            assert!(defaults.iter().all(|b| b.color.as_deref() == Some(DEFAULT_ACCENT)));
        }
        assert_eq!(ids(&default_buttons(Role::Student)), vec!["schedule", "projects", "library"]);
    }
}
