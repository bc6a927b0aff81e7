use std::cell::RefCell;
use std::rc::Rc;

use campus_map_shared::Debounce;
use gloo_timers::callback::Timeout;

/// Trailing-edge debouncer on top of a browser timer.
///
/// Only the last `schedule` within the delay window runs its continuation.
/// Superseded timers still fire, but their ticket is stale and they do nothing.
pub struct Debouncer<T: 'static> {
    inner: Rc<Inner<T>>,
}

struct Inner<T> {
    delay_ms: u32,
    state: RefCell<Debounce<T>>,
}

impl<T: 'static> Clone for Debouncer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: 'static> Debouncer<T> {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            inner: Rc::new(Inner {
                delay_ms,
                state: RefCell::new(Debounce::new()),
            }),
        }
    }

    pub fn schedule(&self, value: T, run: impl FnOnce(T) + 'static) {
        let ticket = self.inner.state.borrow_mut().schedule(value);
        let inner = Rc::downgrade(&self.inner);
        Timeout::new(self.inner.delay_ms, move || {
            let Some(inner) = inner.upgrade() else {
                return;
            };
            let fired = inner.state.borrow_mut().fire(ticket);
            if let Some(value) = fired {
                run(value);
            }
        })
        .forget();
    }

    pub fn cancel(&self) {
        self.inner.state.borrow_mut().cancel();
    }
}
