use std::cell::RefCell;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

struct PopStateBinding {
    window: web_sys::Window,
    handler: Closure<dyn Fn(web_sys::PopStateEvent)>,
}

thread_local! {
    static POPSTATE_BINDING: RefCell<Option<PopStateBinding>> = const { RefCell::new(None) };
}

/// Current client-side path, kept in step with the History API.
#[derive(Clone, Copy)]
pub struct Location(pub RwSignal<String>);

fn browser_path() -> String {
    web_sys::window()
        .and_then(|window| window.location().pathname().ok())
        .filter(|path| !path.is_empty())
        .unwrap_or_else(|| "/".to_owned())
}

impl Location {
    /// Create the path signal and follow back/forward navigation.
    pub fn install() -> Self {
        let path = RwSignal::new(browser_path());
        let Some(window) = web_sys::window() else {
            return Self(path);
        };

        POPSTATE_BINDING.with(|slot| {
            if let Some(old) = slot.borrow_mut().take()
                && let Err(e) = old.window.remove_event_listener_with_callback(
                    "popstate",
                    old.handler.as_ref().unchecked_ref(),
                )
            {
                web_sys::console::warn_1(&e);
            }
        });

        let handler = Closure::<dyn Fn(web_sys::PopStateEvent)>::new(move |_| {
            path.set(browser_path());
        });
        if window
            .add_event_listener_with_callback("popstate", handler.as_ref().unchecked_ref())
            .is_ok()
        {
            POPSTATE_BINDING.with(|slot| {
                *slot.borrow_mut() = Some(PopStateBinding {
                    window: window.clone(),
                    handler,
                });
            });
        }
        Self(path)
    }

    pub fn navigate(&self, to: &str) {
        if self.0.get_untracked() == to {
            return;
        }
        if let Some(history) = web_sys::window().and_then(|window| window.history().ok())
            && let Err(e) = history.push_state_with_url(&JsValue::NULL, "", Some(to))
        {
            web_sys::console::warn_1(&e);
        }
        self.0.set(to.to_owned());
    }
}
