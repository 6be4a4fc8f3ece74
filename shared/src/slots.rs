use std::collections::HashSet;

use serde::Serialize;

use crate::role::is_structural_id;
use crate::settings::NavButton;

/// Number of user-customizable positions between Home and Settings.
pub const SLOT_COUNT: usize = 3;

/// Positional slot contents. A button id occupies at most one slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SlotAssignment {
    slots: [Option<NavButton>; SLOT_COUNT],
}

#[derive(Serialize)]
struct SignatureEntry<'a> {
    id: &'a str,
    route: &'a str,
}

impl SlotAssignment {
    /// Load a stored list: structural ids and repeats of an already placed id
    /// are stripped, the rest is packed to the left in stored order, overflow
    /// is dropped.
    pub fn from_persisted(buttons: &[NavButton]) -> Self {
        let mut assignment = Self::default();
        let mut seen = HashSet::new();
        let placeable = buttons
            .iter()
            .filter(|button| !is_structural_id(&button.id))
            .filter(|button| seen.insert(button.id.as_str()));
        for (slot, button) in assignment.slots.iter_mut().zip(placeable) {
            *slot = Some(button.clone());
        }
        assignment
    }

    pub fn get(&self, index: usize) -> Option<&NavButton> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&NavButton>> {
        self.slots.iter().map(Option::as_ref)
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|button| button.id == id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position_of(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Place `button` into `index`. If the same id already sits elsewhere the
    /// two slots trade contents instead of duplicating it.
    ///
    /// Returns `false` when nothing changed.
    pub fn assign(&mut self, index: usize, button: &NavButton) -> bool {
        if index >= SLOT_COUNT {
            return false;
        }
        match self.position_of(&button.id) {
            Some(existing) if existing == index => false,
            Some(existing) => {
                self.slots.swap(existing, index);
                true
            }
            None => {
                self.slots[index] = Some(button.with_default_accent());
                true
            }
        }
    }

    /// Empty a slot. Later slots keep their positions.
    pub fn remove(&mut self, index: usize) -> Option<NavButton> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// Filled slots in order, each with an accent colour.
    pub fn to_persisted(&self) -> Vec<NavButton> {
        self.slots
            .iter()
            .flatten()
            .map(NavButton::with_default_accent)
            .collect()
    }

    /// Canonical form used to decide whether a save is needed: the
    /// `(id, route)` pairs of filled slots in order.
    pub fn signature(&self) -> String {
        let entries: Vec<SignatureEntry<'_>> = self
            .slots
            .iter()
            .flatten()
            .map(|button| SignatureEntry {
                id: &button.id,
                route: &button.route,
            })
            .collect();
        serde_json::to_string(&entries).unwrap_or_default()
    }

    /// Catalog entries not currently placed, in catalog order.
    pub fn available_pool<'a>(&self, catalog: &'a [NavButton]) -> Vec<&'a NavButton> {
        catalog
            .iter()
            .filter(|button| !self.contains(&button.id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::catalog::full_catalog;
    use crate::role::Role;
    use crate::settings::DEFAULT_ACCENT;

    fn student(id: &str) -> NavButton {
        full_catalog(Role::Student)
            .into_iter()
            .find(|b| b.id == id)
            .unwrap()
    }

    fn slot_ids(assignment: &SlotAssignment) -> Vec<Option<String>> {
        assignment.iter().map(|b| b.map(|b| b.id.clone())).collect()
    }

    fn assert_unique(assignment: &SlotAssignment) {
        let ids: Vec<_> = assignment.iter().flatten().map(|b| b.id.clone()).collect();
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(ids.len(), unique.len(), "duplicate ids in {ids:?}");
    }

    #[test]
    fn load_strips_structural_ids_and_packs_left() {
        let stored = vec![
            NavButton::new("dashboard", "Home", "home", "/dashboard/student"),
            student("events"),
            NavButton::new("settings", "Settings", "settings", "/settings"),
            student("library"),
        ];
        let assignment = SlotAssignment::from_persisted(&stored);
        assert_eq!(
            slot_ids(&assignment),
            vec![Some("events".into()), Some("library".into()), None]
        );
    }

    #[test]
    fn load_keeps_first_copy_of_repeated_id() {
        let stored = vec![student("events"), student("events"), student("library")];
        let assignment = SlotAssignment::from_persisted(&stored);
        assert_eq!(
            slot_ids(&assignment),
            vec![Some("events".into()), Some("library".into()), None]
        );
        assert_unique(&assignment);
        assert_eq!(assignment.to_persisted().len(), 2);
    }

    #[test]
    fn load_drops_overflow() {
        let stored: Vec<_> = ["schedule", "events", "projects", "library"]
            .into_iter()
            .map(student)
            .collect();
        let assignment = SlotAssignment::from_persisted(&stored);
        assert_eq!(
            slot_ids(&assignment),
            vec![
                Some("schedule".into()),
                Some("events".into()),
                Some("projects".into())
            ]
        );
    }

    #[test]
    fn assign_copies_button_with_accent() {
        let mut assignment = SlotAssignment::default();
        assert!(assignment.assign(1, &student("projects")));
        let placed = assignment.get(1).unwrap();
        assert_eq!(placed.id, "projects");
        assert_eq!(placed.color.as_deref(), Some(DEFAULT_ACCENT));
    }

    #[test]
    fn assigning_over_occupied_slot_returns_old_button_to_pool() {
        let catalog = full_catalog(Role::Student);
        let mut assignment = SlotAssignment::default();
        assignment.assign(1, &student("projects"));
        assignment.assign(1, &student("library"));

        assert_eq!(assignment.get(1).map(|b| b.id.as_str()), Some("library"));
        let pool: Vec<_> = assignment
            .available_pool(&catalog)
            .into_iter()
            .map(|b| b.id.as_str())
            .collect();
        assert!(pool.contains(&"projects"));
        assert!(!pool.contains(&"library"));
    }

    #[test]
    fn assigning_placed_id_swaps_slots() {
        let mut assignment = SlotAssignment::default();
        assignment.assign(0, &student("schedule"));
        assert!(assignment.assign(2, &student("schedule")));
        assert_eq!(slot_ids(&assignment), vec![None, None, Some("schedule".into())]);

        assignment.assign(0, &student("events"));
        assert!(assignment.assign(0, &student("schedule")));
        assert_eq!(
            slot_ids(&assignment),
            vec![Some("schedule".into()), None, Some("events".into())]
        );
    }

    #[test]
    fn assigning_same_slot_is_noop() {
        let mut assignment = SlotAssignment::default();
        assignment.assign(0, &student("schedule"));
        assert!(!assignment.assign(0, &student("schedule")));
        assert!(!assignment.assign(SLOT_COUNT, &student("events")));
    }

    #[test]
    fn remove_keeps_positions() {
        let stored: Vec<_> = ["schedule", "events", "library"].into_iter().map(student).collect();
        let mut assignment = SlotAssignment::from_persisted(&stored);
        assert_eq!(assignment.remove(0).map(|b| b.id), Some("schedule".into()));
        assert_eq!(
            slot_ids(&assignment),
            vec![None, Some("events".into()), Some("library".into())]
        );
        assert_eq!(assignment.remove(0), None);
        assert_eq!(assignment.remove(7), None);
    }

    #[test]
    fn no_duplicates_across_operation_sequences() {
        let catalog = full_catalog(Role::Student);
        let mut assignment = SlotAssignment::default();
        // Deterministic pseudo-random walk over assign/remove.
        let mut seed: u32 = 0x2545_f491;
        for _ in 0..2_000 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let slot = (seed % SLOT_COUNT as u32) as usize;
            let pick = ((seed >> 8) % catalog.len() as u32) as usize;
            if seed % 5 == 0 {
                assignment.remove(slot);
            } else {
                assignment.assign(slot, &catalog[pick]);
            }
            assert_unique(&assignment);
        }
    }

    #[test]
    fn persisted_round_trip_keeps_order() {
        let mut assignment = SlotAssignment::default();
        assignment.assign(0, &student("library"));
        assignment.assign(1, &student("events"));
        assignment.assign(2, &student("schedule"));

        let reloaded = SlotAssignment::from_persisted(&assignment.to_persisted());
        assert_eq!(reloaded, assignment);
    }

    #[test]
    fn persisted_omits_empty_slots() {
        let mut assignment = SlotAssignment::default();
        assignment.assign(2, &student("events"));
        let persisted = assignment.to_persisted();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].id, "events");
    }

    #[test]
    fn signature_ignores_labels_and_gaps() {
        let mut a = SlotAssignment::default();
        a.assign(0, &student("events"));
        let mut b = SlotAssignment::default();
        let mut relabelled = student("events");
        relabelled.label = "Events".into();
        b.assign(2, &relabelled);

        assert_eq!(a.signature(), b.signature());
        assert_eq!(
            a.signature(),
            r#"[{"id":"events","route":"/dashboard/student/events"}]"#
        );
        assert_eq!(SlotAssignment::default().signature(), "[]");
    }
}
