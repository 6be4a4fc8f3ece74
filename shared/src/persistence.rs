//! Debounced save bookkeeping for the slot editor.
//!
//! The scheduler owns no timer. The UI arms a timer of [`SAVE_DEBOUNCE_MS`] for
//! every [`Ticket`] it receives and calls [`SaveScheduler::fire`] when the timer
//! elapses; a newer ticket invalidates older ones, so a burst of edits collapses
//! into a single write of the final state.

use crate::settings::NavButton;
use crate::slots::SlotAssignment;

/// Quiet period after the last edit before the write is sent.
pub const SAVE_DEBOUNCE_MS: u32 = 500;

/// What happens to local edits when the remote write fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFailurePolicy {
    /// Keep the edited slots on screen; the next edit retries the save.
    KeepLocal,
}

pub const SAVE_FAILURE_POLICY: SaveFailurePolicy = SaveFailurePolicy::KeepLocal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    /// Matches the last saved state (or the pending one); nothing to do.
    Unchanged,
    /// A save is due after the quiet period. Earlier tickets are void.
    Scheduled(Ticket),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub buttons: Vec<NavButton>,
    signature: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fire {
    /// Superseded by a later edit, cancelled, or already satisfied.
    Stale,
    /// A save is in flight; the edit is retried when it completes.
    Busy,
    Save(SaveRequest),
}

#[derive(Debug, Clone, Default)]
pub struct SaveScheduler {
    saved: Option<String>,
    latest: Option<(String, Vec<NavButton>)>,
    ticket: u64,
    armed: Option<u64>,
    in_flight: Option<String>,
    deferred: bool,
    last_error: Option<String>,
}

impl SaveScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record freshly loaded slots as the saved baseline. Loading stored data
    /// is not an edit and never schedules a write.
    pub fn hydrate(&mut self, slots: &SlotAssignment) {
        let signature = slots.signature();
        self.saved = Some(signature.clone());
        self.latest = Some((signature, slots.to_persisted()));
        self.armed = None;
        self.deferred = false;
    }

    /// Feed the current slot state after any change.
    pub fn observe(&mut self, slots: &SlotAssignment) -> Observation {
        let signature = slots.signature();
        if self.saved.is_none() {
            // Nothing hydrated yet; treat the first state as the baseline.
            self.hydrate(slots);
            return Observation::Unchanged;
        }

        let unchanged_latest = self
            .latest
            .as_ref()
            .is_some_and(|(latest, _)| *latest == signature);
        self.latest = Some((signature.clone(), slots.to_persisted()));

        // While a write is running the store is about to hold the in-flight
        // state, so that is the reference, not the last confirmed save.
        if let Some(in_flight) = self.in_flight.as_deref() {
            if in_flight == signature {
                self.armed = None;
                self.deferred = false;
                return Observation::Unchanged;
            }
            self.deferred = true;
        } else if self.saved.as_deref() == Some(signature.as_str()) {
            self.armed = None;
            return Observation::Unchanged;
        }
        if unchanged_latest && self.armed.is_some() {
            return Observation::Unchanged;
        }

        self.ticket += 1;
        self.armed = Some(self.ticket);
        Observation::Scheduled(Ticket(self.ticket))
    }

    /// The quiet period for `ticket` elapsed.
    pub fn fire(&mut self, ticket: Ticket) -> Fire {
        if self.armed != Some(ticket.0) {
            return Fire::Stale;
        }
        if self.in_flight.is_some() {
            self.armed = None;
            self.deferred = true;
            return Fire::Busy;
        }
        self.armed = None;
        self.start_save()
    }

    fn start_save(&mut self) -> Fire {
        let Some((signature, buttons)) = self.latest.clone() else {
            return Fire::Stale;
        };
        if self.saved.as_deref() == Some(signature.as_str()) {
            return Fire::Stale;
        }
        self.in_flight = Some(signature.clone());
        Fire::Save(SaveRequest { buttons, signature })
    }

    /// Report the outcome of the write started by the last [`Fire::Save`].
    ///
    /// Returns a ticket when edits arrived during the write and still need
    /// saving; the UI arms a fresh timer for it.
    pub fn complete(&mut self, result: Result<(), String>) -> Option<Ticket> {
        let signature = self.in_flight.take()?;
        match result {
            Ok(()) => {
                self.saved = Some(signature);
                self.last_error = None;
            }
            Err(error) => {
                // Local slots stay as edited; the baseline does not advance.
                self.last_error = Some(error);
            }
        }

        let pending = self
            .latest
            .as_ref()
            .is_some_and(|(latest, _)| self.saved.as_deref() != Some(latest.as_str()));
        if std::mem::take(&mut self.deferred) && pending {
            self.ticket += 1;
            self.armed = Some(self.ticket);
            return Some(Ticket(self.ticket));
        }
        None
    }

    /// Drop any pending save (screen unmounted).
    pub fn cancel(&mut self) {
        self.armed = None;
        self.deferred = false;
    }

    pub fn is_saving(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn has_pending(&self) -> bool {
        self.armed.is_some() || self.deferred
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
