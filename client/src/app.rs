use std::cell::RefCell;

use campus_map_shared::render::svg_filter_defs;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

use crate::canvas::MapCanvas;
use crate::info_panel::{BuildingPanel, InfoButton};
use crate::session::Session;

pub(crate) fn canvas_dimensions() -> (f64, f64) {
    let Some(window) = web_sys::window() else {
        return (1200.0, 800.0);
    };
    let w = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1200.0);
    let h = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(800.0);
    (w, h)
}

struct KeydownBinding {
    window: web_sys::Window,
    _handler: Closure<dyn Fn(web_sys::KeyboardEvent)>,
}

thread_local! {
    static KEYDOWN_BINDING: RefCell<Option<KeydownBinding>> = const { RefCell::new(None) };
}

fn bind_escape(session: Session) {
    let Some(window) = web_sys::window() else {
        return;
    };

    KEYDOWN_BINDING.with(|slot| {
        if let Some(old) = slot.borrow_mut().take() {
            let _ = old.window.remove_event_listener_with_callback(
                "keydown",
                old._handler.as_ref().unchecked_ref(),
            );
        }
    });

    let handler = Closure::<dyn Fn(web_sys::KeyboardEvent)>::new(move |e: web_sys::KeyboardEvent| {
        session.handle_key(&e.key());
    });

    if window
        .add_event_listener_with_callback("keydown", handler.as_ref().unchecked_ref())
        .is_ok()
    {
        KEYDOWN_BINDING.with(|slot| {
            *slot.borrow_mut() = Some(KeydownBinding {
                window: window.clone(),
                _handler: handler,
            });
        });
    }
}

#[component]
pub fn App() -> impl IntoView {
    let session = Session::new();
    provide_context(session);

    Effect::new(move || bind_escape(session));

    view! {
        <div style="width: 100%; height: 100%; position: relative; overflow: hidden; background: #121211;">
            <div inner_html=svg_filter_defs() style="position: absolute; width: 0; height: 0; overflow: hidden;" />
            <MapCanvas />
            <InfoButton />
            <BuildingPanel />
        </div>
    }
}
