use std::cell::{Cell, RefCell};
use std::rc::Rc;

use campus_map_shared::FrameGate;
use wasm_bindgen::prelude::*;

/// Batches render requests via `requestAnimationFrame`.
///
/// Call `mark_dirty()` whenever state changes. The render function fires at
/// most once per frame, coalescing all dirty marks in between.
pub struct RenderScheduler {
    inner: Rc<Inner>,
}

struct Inner {
    window: Option<web_sys::Window>,
    gate: Cell<FrameGate>,
    raf_id: Cell<Option<i32>>,
    callback: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl Inner {
    fn with_gate<R>(&self, f: impl FnOnce(&mut FrameGate) -> R) -> R {
        let mut gate = self.gate.get();
        let out = f(&mut gate);
        self.gate.set(gate);
        out
    }

    fn request_frame(&self) {
        let cb_ref = self.callback.borrow();
        let Some(cb) = cb_ref.as_ref() else {
            self.with_gate(FrameGate::abandon_frame);
            return;
        };
        let Some(window) = self.window.as_ref() else {
            self.with_gate(FrameGate::abandon_frame);
            return;
        };
        match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(id) => self.raf_id.set(Some(id)),
            Err(_) => self.with_gate(FrameGate::abandon_frame),
        }
    }
}

impl RenderScheduler {
    pub fn new(render_fn: impl Fn() + 'static) -> Self {
        let inner = Rc::new(Inner {
            window: web_sys::window(),
            gate: Cell::new(FrameGate::default()),
            raf_id: Cell::new(None),
            callback: RefCell::new(None),
        });

        let inner_cb = inner.clone();
        let cb = Closure::<dyn FnMut()>::new(move || {
            inner_cb.raf_id.set(None);
            if inner_cb.with_gate(FrameGate::begin_frame) {
                render_fn();
            }
        });
        *inner.callback.borrow_mut() = Some(cb);

        Self { inner }
    }

    /// Mark the scene as needing a repaint. Schedules one frame if none is pending.
    pub fn mark_dirty(&self) {
        if self.inner.with_gate(FrameGate::mark_dirty) {
            self.inner.request_frame();
        }
    }
}

impl Drop for RenderScheduler {
    fn drop(&mut self) {
        if let Some(raf_id) = self.inner.raf_id.replace(None)
            && let Some(window) = self.inner.window.as_ref()
        {
            let _ = window.cancel_animation_frame(raf_id);
        }
        self.inner.gate.set(FrameGate::default());
        // Break the callback->inner reference cycle on teardown.
        self.inner.callback.borrow_mut().take();
    }
}
