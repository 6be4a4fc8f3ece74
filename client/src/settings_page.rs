//! Bottom-nav editor: three slots filled by dragging buttons out of the role's
//! catalog. Touch input is hit-tested against the live slot boxes; mouse input
//! uses the native drag API. Edits are saved after a quiet period.

use std::cell::RefCell;

use campus_shared::gesture::{DragController, DragSource, DragState, DropOutcome, PointerInput, Rect};
use campus_shared::persistence::{Fire, Observation, SAVE_DEBOUNCE_MS, SaveScheduler, Ticket};
use campus_shared::{NavButton, SLOT_COUNT, SlotAssignment, available_buttons};
use gloo_timers::callback::Timeout;
use leptos::html::Div;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::api;
use crate::bottom_nav::BottomNav;
use crate::icons::Icon;
use crate::location::Location;
use crate::session::AppSession;

thread_local! {
    static SAVE_TIMER: RefCell<Option<Timeout>> = const { RefCell::new(None) };
}

#[derive(Clone, Copy)]
struct Editor {
    slots: RwSignal<SlotAssignment>,
    drag: RwSignal<Option<DragState>>,
    touch_ghost: RwSignal<bool>,
    controller: StoredValue<DragController>,
    scheduler: StoredValue<SaveScheduler>,
    saving: RwSignal<bool>,
    save_error: RwSignal<Option<String>>,
    slot_refs: [NodeRef<Div>; SLOT_COUNT],
}

impl Editor {
    fn new() -> Self {
        Self {
            slots: RwSignal::new(SlotAssignment::default()),
            drag: RwSignal::new(None),
            touch_ghost: RwSignal::new(false),
            controller: StoredValue::new(DragController::new()),
            scheduler: StoredValue::new(SaveScheduler::new()),
            saving: RwSignal::new(false),
            save_error: RwSignal::new(None),
            slot_refs: std::array::from_fn(|_| NodeRef::new()),
        }
    }

    /// Slot boxes as laid out right now. Unmounted slots never match.
    fn live_rects(&self) -> [Option<Rect>; SLOT_COUNT] {
        std::array::from_fn(|index| {
            self.slot_refs[index].get_untracked().map(|el| {
                let bounds = el.get_bounding_client_rect();
                Rect::new(bounds.left(), bounds.top(), bounds.width(), bounds.height())
            })
        })
    }

    fn handle(&self, input: PointerInput<'_>) -> DropOutcome {
        let Some(outcome) = self.controller.try_update_value(|c| c.handle(input)) else {
            return DropOutcome::Pending;
        };
        let dragging = self.controller.with_value(|c| c.dragging().cloned());
        if dragging != self.drag.get_untracked() {
            self.drag.set(dragging);
        }

        match &outcome {
            DropOutcome::Assign { slot, button } => {
                self.slots.update(|slots| {
                    slots.assign(*slot, button);
                });
            }
            DropOutcome::Rejected => {
                web_sys::console::warn_1(&"drag ignored while saving".into());
            }
            DropOutcome::Pending | DropOutcome::Discarded => {}
        }
        outcome
    }

    fn set_saving(&self, saving: bool) {
        self.controller.try_update_value(|c| c.set_locked(saving));
        self.drag.try_set(None);
        self.saving.try_set(saving);
    }
}

#[derive(Clone, Copy)]
struct SaveContext {
    editor: Editor,
    bottom_nav: BottomNav,
    session: AppSession,
}

fn arm_save_timer(ctx: SaveContext, ticket: Ticket) {
    let timeout = Timeout::new(SAVE_DEBOUNCE_MS, move || {
        spawn_local(run_save(ctx, ticket));
    });
    // Replacing the handle drops, and so cancels, the previous timer.
    SAVE_TIMER.with(|slot| *slot.borrow_mut() = Some(timeout));
}

fn cancel_save_timer() {
    SAVE_TIMER.with(|slot| slot.borrow_mut().take());
}

async fn run_save(ctx: SaveContext, ticket: Ticket) {
    let editor = ctx.editor;
    let Some(Fire::Save(request)) = editor.scheduler.try_update_value(|s| s.fire(ticket)) else {
        return;
    };

    editor.set_saving(true);
    let role = ctx.session.role.try_get_untracked().flatten();
    let result = ctx
        .bottom_nav
        .update_buttons(role, request.buttons)
        .await
        .map_err(|e| e.to_string());
    if let Err(error) = &result {
        web_sys::console::error_1(&format!("bottom nav save failed: {error}").into());
    }
    editor.save_error.try_set(result.as_ref().err().cloned());
    editor.set_saving(false);

    if let Some(Some(next)) = editor.scheduler.try_update_value(|s| s.complete(result)) {
        arm_save_timer(ctx, next);
    }
}

fn touch_point(touch: &web_sys::Touch) -> (f64, f64) {
    (touch.client_x() as f64, touch.client_y() as f64)
}

#[component]
pub fn SettingsPage() -> impl IntoView {
    let session: AppSession = expect_context();
    let bottom_nav: BottomNav = expect_context();
    let location: Location = expect_context();
    let editor = Editor::new();
    let hydrated = RwSignal::new(false);
    let ctx = SaveContext {
        editor,
        bottom_nav,
        session,
    };

    // Stored buttons become the baseline once; loading is not an edit.
    Effect::new(move || {
        if hydrated.get_untracked() || bottom_nav.loading.get() {
            return;
        }
        let initial = bottom_nav
            .buttons
            .with_untracked(|buttons| SlotAssignment::from_persisted(buttons));
        editor.scheduler.update_value(|s| s.hydrate(&initial));
        editor.slots.set(initial);
        hydrated.set(true);
    });

    Effect::new(move || {
        let observation = editor.slots.with(|slots| {
            if !hydrated.get_untracked() {
                return None;
            }
            editor.scheduler.try_update_value(|s| s.observe(slots))
        });
        if let Some(Observation::Scheduled(ticket)) = observation {
            arm_save_timer(ctx, ticket);
        }
    });

    on_cleanup(move || {
        cancel_save_timer();
        editor.scheduler.try_update_value(|s| s.cancel());
    });

    let pool = Memo::new(move |_| {
        let catalog = available_buttons(session.role.get(), bottom_nav.access.get());
        editor.slots.with(|slots| {
            slots
                .available_pool(&catalog)
                .into_iter()
                .cloned()
                .collect::<Vec<_>>()
        })
    });

    let on_touch_move = move |e: web_sys::TouchEvent| {
        let Some(touch) = e.touches().get(0) else {
            return;
        };
        let rects = editor.live_rects();
        editor.handle(PointerInput::Move {
            at: touch_point(&touch),
            slots: &rects,
        });
        if editor.drag.with_untracked(Option::is_some) {
            e.prevent_default();
        }
    };
    let on_touch_end = move |e: web_sys::TouchEvent| {
        editor.touch_ghost.set(false);
        let Some(touch) = e.changed_touches().get(0) else {
            editor.handle(PointerInput::Cancel);
            return;
        };
        let rects = editor.live_rects();
        editor.handle(PointerInput::Release {
            at: touch_point(&touch),
            slots: &rects,
        });
    };
    let on_touch_cancel = move |_: web_sys::TouchEvent| {
        editor.touch_ghost.set(false);
        editor.handle(PointerInput::Cancel);
    };

    let logout = move |_| {
        cancel_save_timer();
        api::logout();
        session.clear();
        location.navigate("/");
    };

    view! {
        <div
            class="settings-page"
            style="position: relative; padding: 16px 16px 104px; min-height: 100%; box-sizing: border-box;"
            on:touchmove=on_touch_move
            on:touchend=on_touch_end
            on:touchcancel=on_touch_cancel
        >
            <h1 style="font-size: 1.4rem; margin: 4px 0 16px;">"Настройки"</h1>
            <section style="position: relative; background: #ffffff; border-radius: 14px; padding: 14px; box-shadow: 0 1px 3px rgba(0,0,0,0.06);">
                <h2 style="font-size: 1rem; margin: 0 0 4px;">"Нижняя панель"</h2>
                <p style="font-size: 0.8rem; color: #8a8d96; margin: 0 0 12px;">
                    "Перетащите раздел в одну из трёх ячеек между «Главной» и «Настройками»."
                </p>
                {move || {
                    if !hydrated.get() {
                        return view! { <EditorSkeleton /> }.into_any();
                    }
                    view! {
                        <div style="display: grid; grid-template-columns: repeat(3, 1fr); gap: 8px;">
                            {(0..SLOT_COUNT)
                                .map(|index| view! { <SlotCell index=index editor=editor /> })
                                .collect_view()}
                        </div>
                        <h3 style="font-size: 0.85rem; margin: 16px 0 8px; color: #5b5e66;">"Доступные разделы"</h3>
                        <div style="display: flex; flex-wrap: wrap; gap: 8px;">
                            <For
                                each=move || pool.get()
                                key=|button| button.id.clone()
                                children=move |button| {
                                    view! {
                                        <DraggableChip button=button source=DragSource::Available editor=editor />
                                    }
                                }
                            />
                            {move || {
                                pool.with(Vec::is_empty)
                                    .then(|| view! {
                                        <span style="font-size: 0.8rem; color: #8a8d96;">"Все разделы уже на панели"</span>
                                    })
                            }}
                        </div>
                    }
                    .into_any()
                }}
                {move || {
                    editor.saving.get().then(|| view! {
                        <div
                            class="saving-overlay"
                            style="position: absolute; inset: 0; border-radius: 14px; background: rgba(255,255,255,0.7); display: flex; align-items: center; justify-content: center; font-size: 0.85rem; color: #5b5e66;"
                        >
                            "Сохраняем…"
                        </div>
                    })
                }}
            </section>
            {move || {
                editor.save_error.get().map(|error| view! {
                    <div
                        role="status"
                        title=error
                        style="margin-top: 12px; display: flex; align-items: center; gap: 8px; background: #fff4e5; color: #8a5300; border-radius: 10px; padding: 8px 12px; font-size: 0.8rem;"
                    >
                        <span style="flex: 1;">"Не удалось сохранить панель. Изменения останутся на экране и сохранятся при следующей правке."</span>
                        <button
                            aria-label="Скрыть"
                            style="background: none; border: none; font-size: 1rem; cursor: pointer; color: inherit;"
                            on:click=move |_| editor.save_error.set(None)
                        >
                            "×"
                        </button>
                    </div>
                })
            }}
            <button
                style="margin-top: 24px; width: 100%; padding: 12px; border-radius: 12px; border: 1px solid #e3e5ea; background: #ffffff; color: #d64545; font-size: 0.9rem; cursor: pointer;"
                on:click=logout
            >
                "Выйти"
            </button>
            <DragGhost editor=editor />
        </div>
    }
}

#[component]
fn SlotCell(index: usize, editor: Editor) -> impl IntoView {
    let hovered = move || editor.drag.with(|drag| drag.as_ref().and_then(|d| d.hover) == Some(index));
    let content = move || editor.slots.with(|slots| slots.get(index).cloned());

    view! {
        <div
            node_ref=editor.slot_refs[index]
            data-slot=index.to_string()
            style=move || format!(
                "min-height: 76px; border-radius: 12px; border: 2px dashed {}; background: {}; display: flex; flex-direction: column; align-items: center; justify-content: center; gap: 4px; padding: 6px; box-sizing: border-box; transition: border-color 0.12s, background 0.12s;",
                if hovered() { "#0077FF" } else { "#d5d8de" },
                if hovered() { "rgba(0,119,255,0.06)" } else { "#fafbfc" },
            )
            on:dragover=move |e: web_sys::DragEvent| {
                e.prevent_default();
                editor.handle(PointerInput::NativeOver { slot: index });
            }
            on:dragleave=move |_: web_sys::DragEvent| {
                editor.handle(PointerInput::NativeLeave);
            }
            on:drop=move |e: web_sys::DragEvent| {
                e.prevent_default();
                editor.handle(PointerInput::NativeDrop { slot: index });
            }
        >
            {move || match content() {
                Some(button) => view! {
                    <DraggableChip button=button source=DragSource::Slot(index) editor=editor />
                    <button
                        aria-label="Убрать"
                        disabled=move || editor.saving.get()
                        style="background: none; border: none; color: #8a8d96; font-size: 0.7rem; cursor: pointer; padding: 2px 6px;"
                        on:click=move |_| {
                            if !editor.saving.get_untracked() {
                                editor.slots.update(|slots| {
                                    slots.remove(index);
                                });
                            }
                        }
                    >
                        "Убрать"
                    </button>
                }
                .into_any(),
                None => view! {
                    <span style="font-size: 0.75rem; color: #b0b3ba;">"Пусто"</span>
                }
                .into_any(),
            }}
        </div>
    }
}

#[component]
fn DraggableChip(button: NavButton, source: DragSource, editor: Editor) -> impl IntoView {
    let pressed = button.clone();
    let dragged = button.clone();
    let id = button.id.clone();
    let is_dragged = move || {
        editor
            .drag
            .with(|drag| drag.as_ref().is_some_and(|d| d.button.id == id))
    };

    view! {
        <div
            draggable="true"
            style=move || format!(
                "display: inline-flex; align-items: center; gap: 6px; padding: 6px 10px; border-radius: 999px; background: #eef4ff; color: #1c1d21; font-size: 0.8rem; cursor: grab; user-select: none; -webkit-user-select: none; touch-action: none; opacity: {};",
                if is_dragged() { 0.4 } else { 1.0 },
            )
            on:touchstart=move |e: web_sys::TouchEvent| {
                let Some(touch) = e.touches().get(0) else {
                    return;
                };
                if editor.handle(PointerInput::Press {
                    source,
                    button: &pressed,
                    at: touch_point(&touch),
                }) != DropOutcome::Rejected
                {
                    editor.touch_ghost.set(true);
                }
            }
            on:dragstart=move |e: web_sys::DragEvent| {
                let outcome = editor.handle(PointerInput::NativeStart {
                    source,
                    button: &dragged,
                    at: (e.client_x() as f64, e.client_y() as f64),
                });
                if outcome == DropOutcome::Rejected {
                    e.prevent_default();
                    return;
                }
                if let Some(transfer) = e.data_transfer() {
                    let _ = transfer.set_data("text/plain", &dragged.id);
                    transfer.set_effect_allowed("move");
                }
            }
            on:drag=move |e: web_sys::DragEvent| {
                // The final `drag` event reports (0, 0).
                if e.client_x() != 0 || e.client_y() != 0 {
                    editor.handle(PointerInput::NativeMove {
                        at: (e.client_x() as f64, e.client_y() as f64),
                    });
                }
            }
            on:dragend=move |_: web_sys::DragEvent| {
                editor.handle(PointerInput::NativeEnd);
            }
        >
            <Icon name=button.icon.clone() size=16 />
            <span>{button.label.clone()}</span>
        </div>
    }
}

/// Floating copy of the button under the finger during a touch drag. Native
/// drags get the browser's own drag image.
#[component]
fn DragGhost(editor: Editor) -> impl IntoView {
    move || {
        if !editor.touch_ghost.get() {
            return None;
        }
        let drag = editor.drag.get()?;
        let (x, y) = drag.position;
        Some(view! {
            <div
                style=format!(
                    "position: fixed; left: {x}px; top: {y}px; transform: translate(-50%, -50%); pointer-events: none; z-index: 50; display: inline-flex; align-items: center; gap: 6px; padding: 6px 10px; border-radius: 999px; background: #0077FF; color: #ffffff; font-size: 0.8rem; box-shadow: 0 6px 18px rgba(0,0,0,0.2);"
                )
            >
                <Icon name=drag.button.icon.clone() size=16 />
                <span>{drag.button.label.clone()}</span>
            </div>
        })
    }
}

#[component]
fn EditorSkeleton() -> impl IntoView {
    const BONE: &str = "background: linear-gradient(90deg, #eceef1 0%, #f5f6f8 50%, #eceef1 100%); border-radius: 12px;";
    view! {
        <div aria-busy="true">
            <div style="display: grid; grid-template-columns: repeat(3, 1fr); gap: 8px;">
                {(0..SLOT_COUNT)
                    .map(|_| view! { <div style=format!("{BONE} height: 76px;") /> })
                    .collect_view()}
            </div>
            <div style="display: flex; flex-wrap: wrap; gap: 8px; margin-top: 16px;">
                {(0..4)
                    .map(|_| view! { <div style=format!("{BONE} width: 96px; height: 30px; border-radius: 999px;") /> })
                    .collect_view()}
            </div>
        </div>
    }
}
