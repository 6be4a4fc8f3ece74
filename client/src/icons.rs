use leptos::prelude::*;

/// Glyph for an icon key. Unknown keys have none.
pub fn glyph(key: &str) -> Option<&'static str> {
    let glyph = match key {
        "home" => "\u{1F3E0}",
        "settings" => "\u{2699}\u{FE0F}",
        "schedule" => "\u{1F4C5}",
        "task-tracker" => "\u{2705}",
        "events" => "\u{1F389}",
        "vacancies" => "\u{1F4BC}",
        "projects" => "\u{1F9E9}",
        "career" => "\u{1F9ED}",
        "deanery" => "\u{1F3DB}\u{FE0F}",
        "dormitory" => "\u{1F6CF}\u{FE0F}",
        "library" => "\u{1F4DA}",
        "programs" => "\u{1F393}",
        "admission-conditions" => "\u{1F4CB}",
        "open-day" => "\u{1F6AA}",
        "admission-inquiry" => "\u{2753}",
        "business-trips" => "\u{2708}\u{FE0F}",
        "vacations" => "\u{1F334}",
        "office" => "\u{1F3E2}",
        "campus-management" => "\u{1F3EB}",
        "academic-metrics" => "\u{1F4CA}",
        "news-aggregator" => "\u{1F4F0}",
        _ => return None,
    };
    Some(glyph)
}

#[component]
pub fn Icon(#[prop(into)] name: Option<String>, #[prop(default = 22)] size: u32) -> impl IntoView {
    let glyph = name.as_deref().and_then(glyph);
    glyph.map(|glyph| {
        view! {
            <span
                aria-hidden="true"
                style=format!("font-size: {size}px; line-height: 1; display: inline-block;")
            >
                {glyph}
            </span>
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_shared::Role;
    use campus_shared::catalog::full_catalog;
    use campus_shared::nav_bar::{HOME_ICON, SETTINGS_ICON};

    #[test]
    fn every_catalog_icon_has_a_glyph() {
        for role in Role::ALL {
            for button in full_catalog(role) {
                let icon = button.icon.as_deref().unwrap_or_default();
                assert!(glyph(icon).is_some(), "no glyph for {icon}");
            }
        }
        assert!(glyph(HOME_ICON).is_some());
        assert!(glyph(SETTINGS_ICON).is_some());
    }

    #[test]
    fn unknown_icon_renders_nothing() {
        assert_eq!(glyph("rocket-launcher"), None);
        assert_eq!(glyph(""), None);
    }
}
