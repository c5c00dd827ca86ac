//! Browser-backed [`FrameScheduler`].
//!
//! Zero-delay requests go to `requestAnimationFrame`; delayed ones (the
//! reveal warm-up) go to `setTimeout`. Both JS callbacks are created once and
//! live as long as the scheduler, so a callback is never freed while the
//! browser may still invoke it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use motes_core::{FrameHandle, FrameScheduler, SimError};
use tracing::trace;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

/// Slot for the function run when a scheduled frame fires.
pub(crate) type FrameCallback = Rc<RefCell<Option<Box<dyn FnMut(FrameHandle)>>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timer {
    Animation,
    Timeout,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    handle: FrameHandle,
    browser_id: i32,
    timer: Timer,
}

pub struct RafScheduler {
    window: Window,
    pending: Rc<Cell<Option<Pending>>>,
    on_frame: FrameCallback,
    raf: Closure<dyn FnMut(f64)>,
    timeout: Closure<dyn FnMut()>,
    next_id: u64,
}

impl RafScheduler {
    pub fn new() -> Result<Self, SimError> {
        let window =
            web_sys::window().ok_or_else(|| SimError::Scheduler("no global window".into()))?;
        let pending: Rc<Cell<Option<Pending>>> = Rc::new(Cell::new(None));
        let on_frame: FrameCallback = Rc::new(RefCell::new(None));

        let fire: Rc<dyn Fn()> = {
            let pending = Rc::clone(&pending);
            let on_frame = Rc::clone(&on_frame);
            Rc::new(move || {
                let Some(fired) = pending.take() else {
                    return;
                };
                trace!(handle = fired.handle.0, "frame fired");
                if let Ok(mut slot) = on_frame.try_borrow_mut() {
                    if let Some(callback) = slot.as_mut() {
                        callback(fired.handle);
                    }
                }
            })
        };
        let raf = {
            let fire = Rc::clone(&fire);
            Closure::<dyn FnMut(f64)>::new(move |_timestamp: f64| fire())
        };
        let timeout = Closure::<dyn FnMut()>::new(move || fire());

        Ok(Self {
            window,
            pending,
            on_frame,
            raf,
            timeout,
            next_id: 0,
        })
    }

    /// The slot the owner fills with its per-frame callback.
    pub(crate) fn on_frame(&self) -> FrameCallback {
        Rc::clone(&self.on_frame)
    }
}

/// `setTimeout` takes a signed 32-bit millisecond count.
pub(crate) fn timeout_millis(delay: Duration) -> i32 {
    i32::try_from(delay.as_millis()).unwrap_or(i32::MAX)
}

fn js_message(err: JsValue) -> SimError {
    SimError::Scheduler(format!("{err:?}"))
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self, delay: Duration) -> Result<FrameHandle, SimError> {
        let (browser_id, timer) = if delay.is_zero() {
            let id = self
                .window
                .request_animation_frame(self.raf.as_ref().unchecked_ref())
                .map_err(js_message)?;
            (id, Timer::Animation)
        } else {
            let id = self
                .window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    self.timeout.as_ref().unchecked_ref(),
                    timeout_millis(delay),
                )
                .map_err(js_message)?;
            (id, Timer::Timeout)
        };
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.set(Some(Pending {
            handle,
            browser_id,
            timer,
        }));
        Ok(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        match self.pending.take() {
            Some(p) if p.handle == handle => match p.timer {
                Timer::Animation => {
                    let _ = self.window.cancel_animation_frame(p.browser_id);
                }
                Timer::Timeout => self.window.clear_timeout_with_handle(p.browser_id),
            },
            other => self.pending.set(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_millis_passes_small_delays() {
        assert_eq!(timeout_millis(Duration::from_millis(7000)), 7000);
        assert_eq!(timeout_millis(Duration::ZERO), 0);
    }

    #[test]
    fn timeout_millis_saturates() {
        assert_eq!(timeout_millis(Duration::from_secs(u64::MAX / 4)), i32::MAX);
    }
}
