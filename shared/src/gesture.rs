//! Drag/drop gesture state machine shared by mouse (HTML5 drag API) and touch
//! input. The UI feeds it abstract [`PointerInput`]s together with the live
//! slot rectangles and applies the [`DropOutcome`] it returns.

use crate::settings::NavButton;

/// Movement (in CSS pixels, either axis) before a touch counts as a drag.
pub const DRAG_THRESHOLD: f64 = 10.0;

/// Axis-aligned box in client coordinates, as returned by `getBoundingClientRect`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            right: left + width,
            bottom: top + height,
        }
    }

    /// Edges are inclusive. Degenerate or non-finite boxes never contain anything.
    pub fn contains(&self, (x, y): (f64, f64)) -> bool {
        if !(self.left.is_finite() && self.right.is_finite())
            || !(self.top.is_finite() && self.bottom.is_finite())
        {
            return false;
        }
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}

/// First slot whose box contains `point`. Slots without a box (not mounted,
/// detached mid-gesture) are skipped.
pub fn hit_test(slots: &[Option<Rect>], point: (f64, f64)) -> Option<usize> {
    slots
        .iter()
        .position(|rect| rect.is_some_and(|rect| rect.contains(point)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragSource {
    /// The palette of buttons not yet placed.
    Available,
    /// An already placed button; index of its slot.
    Slot(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    pub source: DragSource,
    pub button: NavButton,
    pub origin: (f64, f64),
    pub position: (f64, f64),
    pub hover: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    /// Touch is down on a button but has not travelled past the threshold.
    Armed(DragState),
    Dragging(DragState),
}

/// Input from either modality.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerInput<'a> {
    /// Touch started on a draggable button.
    Press {
        source: DragSource,
        button: &'a NavButton,
        at: (f64, f64),
    },
    /// Touch moved. `slots` are the live slot boxes at this instant.
    Move {
        at: (f64, f64),
        slots: &'a [Option<Rect>],
    },
    /// Touch lifted at `at`.
    Release {
        at: (f64, f64),
        slots: &'a [Option<Rect>],
    },
    /// Touch or native drag cancelled by the platform.
    Cancel,
    /// `dragstart` on a draggable button. The browser applies its own threshold.
    NativeStart {
        source: DragSource,
        button: &'a NavButton,
        at: (f64, f64),
    },
    /// `dragover` on a slot.
    NativeOver { slot: usize },
    /// `dragleave` from a slot.
    NativeLeave,
    /// Pointer position update during a native drag (for the ghost).
    NativeMove { at: (f64, f64) },
    /// `drop` on a slot.
    NativeDrop { slot: usize },
    /// `dragend` without a drop on a slot.
    NativeEnd,
}

/// What the UI should do after an input.
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// Nothing to apply yet; the gesture continues (or was ignored).
    Pending,
    /// Gesture ended on `slot` with a droppable button.
    Assign { slot: usize, button: NavButton },
    /// Gesture ended without an actionable target.
    Discarded,
    /// A new gesture was refused because the controller is locked.
    Rejected,
}

#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: GestureState,
    locked: bool,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// Active drag, if past the threshold.
    pub fn dragging(&self) -> Option<&DragState> {
        match &self.state {
            GestureState::Dragging(drag) => Some(drag),
            _ => None,
        }
    }

    /// Slot currently under the pointer, for highlight.
    pub fn hover_slot(&self) -> Option<usize> {
        self.dragging().and_then(|drag| drag.hover)
    }

    pub fn is_idle(&self) -> bool {
        self.state == GestureState::Idle
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Lock while a save is in flight. Locking also abandons any gesture.
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
        if locked {
            self.state = GestureState::Idle;
        }
    }

    pub fn handle(&mut self, input: PointerInput<'_>) -> DropOutcome {
        match input {
            PointerInput::Press { source, button, at } => {
                self.begin(source, button, at, false)
            }
            PointerInput::NativeStart { source, button, at } => {
                self.begin(source, button, at, true)
            }
            PointerInput::Move { at, slots } => {
                self.state = match std::mem::take(&mut self.state) {
                    GestureState::Armed(mut drag) => {
                        drag.position = at;
                        if exceeds_threshold(drag.origin, at) {
                            drag.hover = hit_test(slots, at);
                            GestureState::Dragging(drag)
                        } else {
                            GestureState::Armed(drag)
                        }
                    }
                    GestureState::Dragging(mut drag) => {
                        drag.position = at;
                        drag.hover = hit_test(slots, at);
                        GestureState::Dragging(drag)
                    }
                    GestureState::Idle => GestureState::Idle,
                };
                DropOutcome::Pending
            }
            PointerInput::Release { at, slots } => match std::mem::take(&mut self.state) {
                GestureState::Dragging(drag) => {
                    // Final position wins; fall back to the last hover when
                    // the release point misses (layout shifted under the finger).
                    let target = hit_test(slots, at).or(drag.hover);
                    resolve(drag, target)
                }
                GestureState::Armed(_) => DropOutcome::Discarded,
                GestureState::Idle => DropOutcome::Pending,
            },
            PointerInput::NativeOver { slot } => {
                if let GestureState::Dragging(drag) = &mut self.state
                    && drag.source == DragSource::Available
                {
                    drag.hover = Some(slot);
                }
                DropOutcome::Pending
            }
            PointerInput::NativeLeave => {
                if let GestureState::Dragging(drag) = &mut self.state {
                    drag.hover = None;
                }
                DropOutcome::Pending
            }
            PointerInput::NativeMove { at } => {
                if let GestureState::Dragging(drag) = &mut self.state {
                    drag.position = at;
                }
                DropOutcome::Pending
            }
            PointerInput::NativeDrop { slot } => match std::mem::take(&mut self.state) {
                GestureState::Dragging(drag) => resolve(drag, Some(slot)),
                GestureState::Armed(_) => DropOutcome::Discarded,
                GestureState::Idle => DropOutcome::Pending,
            },
            PointerInput::Cancel | PointerInput::NativeEnd => {
                if self.is_idle() {
                    DropOutcome::Pending
                } else {
                    self.state = GestureState::Idle;
                    DropOutcome::Discarded
                }
            }
        }
    }

    fn begin(
        &mut self,
        source: DragSource,
        button: &NavButton,
        at: (f64, f64),
        native: bool,
    ) -> DropOutcome {
        if self.locked {
            self.state = GestureState::Idle;
            return DropOutcome::Rejected;
        }
        let drag = DragState {
            source,
            button: button.clone(),
            origin: at,
            position: at,
            hover: None,
        };
        self.state = if native {
            GestureState::Dragging(drag)
        } else {
            GestureState::Armed(drag)
        };
        DropOutcome::Pending
    }
}

fn exceeds_threshold(origin: (f64, f64), at: (f64, f64)) -> bool {
    (at.0 - origin.0).abs() > DRAG_THRESHOLD || (at.1 - origin.1).abs() > DRAG_THRESHOLD
}

fn resolve(drag: DragState, target: Option<usize>) -> DropOutcome {
    // Re-ordering placed buttons by dragging them is not supported; only the
    // palette is a drag source.
    match (drag.source, target) {
        (DragSource::Available, Some(slot)) => DropOutcome::Assign {
            slot,
            button: drag.button,
        },
        _ => DropOutcome::Discarded,
    }
}
