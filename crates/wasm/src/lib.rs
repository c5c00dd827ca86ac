#![deny(unsafe_code)]
//! Browser bindings: drives the motes effects on an HTML canvas.
//!
//! [`AmbientField`] is the page-wide drifting background (or loading screen
//! with the `loading` preset); [`ParticleReveal`] assembles an image from
//! particles after a warm-up delay. Both own an [`Animator`] clocked by
//! `requestAnimationFrame`, and both must be disposed (or dropped) when the
//! host element goes away so no frame callback outlives it.

mod painter;
mod scheduler;

use std::cell::RefCell;
use std::rc::Rc;

use motes_core::{Animator, DeviceClass, RasterImage, SimError, Simulation};
use motes_field::FieldSim;
use motes_reveal::Reveal;
use serde_json::Value;
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub use painter::CanvasPainter;
pub use scheduler::RafScheduler;

type SharedAnimator<S> = Rc<RefCell<Animator<S, RafScheduler>>>;

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Parses optional JSON parameters; absent means an empty object.
fn parse_params(json: Option<&str>) -> Result<Value, String> {
    match json {
        None => Ok(Value::Object(serde_json::Map::new())),
        Some(text) => serde_json::from_str(text).map_err(|e| format!("invalid params: {e}")),
    }
}

/// Seed from the wall clock when the page does not supply one.
fn seed_or_now(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| js_sys::Date::now() as u64)
}

/// An animator bound to one canvas.
struct Mounted<S: Simulation + 'static> {
    animator: SharedAnimator<S>,
    canvas: HtmlCanvasElement,
}

impl<S: Simulation + 'static> Mounted<S> {
    fn new(sim: S, canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| js_error("missing 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let scheduler = RafScheduler::new().map_err(js_error)?;
        let slot = scheduler.on_frame();
        let animator = Rc::new(RefCell::new(Animator::new(sim, scheduler)));

        let weak = Rc::downgrade(&animator);
        let mut painter = CanvasPainter::new(canvas.clone(), ctx);
        *slot.borrow_mut() = Some(Box::new(move |handle| {
            let Some(cell) = weak.upgrade() else {
                return;
            };
            let Ok(mut anim) = cell.try_borrow_mut() else {
                return;
            };
            match anim.tick(handle) {
                Ok(true) => anim.paint(&mut painter),
                Ok(false) => {}
                Err(e) => warn!(error = %e, "frame dropped"),
            }
        }));

        Ok(Self { animator, canvas })
    }

    fn with<T>(
        &self,
        f: impl FnOnce(&mut Animator<S, RafScheduler>) -> Result<T, SimError>,
    ) -> Result<T, JsValue> {
        let mut anim = self
            .animator
            .try_borrow_mut()
            .map_err(|_| js_error("animator is busy"))?;
        f(&mut anim).map_err(js_error)
    }

    fn set_canvas_size(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn state(&self) -> String {
        self.animator
            .try_borrow()
            .map(|a| a.state().to_string())
            .unwrap_or_default()
    }
}

/// Ambient drifting particle field sized to the viewport.
#[wasm_bindgen]
pub struct AmbientField {
    inner: Mounted<FieldSim>,
}

#[wasm_bindgen]
impl AmbientField {
    /// Sizes `canvas` to the window and builds the field.
    ///
    /// `params` is a JSON object (`preset`, counts, speeds, `color`,
    /// `trail_alpha`); `seed` defaults to the current time.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        params: Option<String>,
        seed: Option<u64>,
    ) -> Result<AmbientField, JsValue> {
        let window = web_sys::window().ok_or_else(|| js_error("no global window"))?;
        let width = window.inner_width()?.as_f64().unwrap_or(0.0);
        let height = window.inner_height()?.as_f64().unwrap_or(0.0);
        let params = parse_params(params.as_deref()).map_err(js_error)?;

        let device = DeviceClass::from_viewport_width(width);
        let sim = FieldSim::from_json(width, height, device, seed_or_now(seed), &params);
        let inner = Mounted::new(sim, canvas)?;
        inner.set_canvas_size(width as u32, height as u32);
        Ok(Self { inner })
    }

    pub fn start(&self) -> Result<(), JsValue> {
        self.inner.with(|a| a.start())
    }

    pub fn pause(&self) -> Result<(), JsValue> {
        self.inner.with(|a| a.pause())
    }

    pub fn resume(&self) -> Result<(), JsValue> {
        self.inner.with(|a| a.resume())
    }

    /// Cancels the pending frame; later calls are no-ops.
    pub fn dispose(&self) -> Result<(), JsValue> {
        self.inner.with(|a| {
            a.dispose();
            Ok(())
        })
    }

    /// Follows a window resize. Particles keep their positions and wrap
    /// against the new bounds from the next frame.
    pub fn resize(&self, width: f64, height: f64) -> Result<(), JsValue> {
        self.inner.set_canvas_size(width as u32, height as u32);
        self.inner.with(|a| {
            a.simulation_mut().resize(width, height);
            Ok(())
        })
    }

    /// One of `uninitialized`, `running`, `paused`, `disposed`.
    pub fn state(&self) -> String {
        self.inner.state()
    }

    #[wasm_bindgen(js_name = particleCount)]
    pub fn particle_count(&self) -> Result<usize, JsValue> {
        self.inner.with(|a| Ok(a.simulation().particle_count()))
    }
}

/// Image reconstruction: particles fly from random spots to the pixels of a
/// loaded image and fade in.
#[wasm_bindgen]
pub struct ParticleReveal {
    inner: Mounted<Reveal>,
}

#[wasm_bindgen]
impl ParticleReveal {
    /// `params` may set `warmup_ms`; `seed` defaults to the current time.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        params: Option<String>,
        seed: Option<u64>,
    ) -> Result<ParticleReveal, JsValue> {
        let params = parse_params(params.as_deref()).map_err(js_error)?;
        let sim = Reveal::from_json(seed_or_now(seed), &params);
        Ok(Self {
            inner: Mounted::new(sim, canvas)?,
        })
    }

    /// Loads straight RGBA pixels (e.g. from `getImageData`) and sizes the
    /// canvas to match. Replaces any previous particle set.
    #[wasm_bindgen(js_name = loadRgba)]
    pub fn load_rgba(&self, width: u32, height: u32, rgba: &[u8]) -> Result<usize, JsValue> {
        let image = RasterImage::new(width as usize, height as usize, rgba.to_vec())
            .map_err(js_error)?;
        self.inner.set_canvas_size(width, height);
        self.inner.with(|a| {
            let reveal = a.simulation_mut();
            reveal.load(&image);
            Ok(reveal.particle_count())
        })
    }

    /// Starts animating once the warm-up delay has passed. Fails until an
    /// image is loaded.
    pub fn start(&self) -> Result<(), JsValue> {
        self.inner.with(|a| {
            let warmup = a.simulation().warmup();
            a.start_after(warmup)
        })
    }

    pub fn pause(&self) -> Result<(), JsValue> {
        self.inner.with(|a| a.pause())
    }

    pub fn resume(&self) -> Result<(), JsValue> {
        self.inner.with(|a| a.resume())
    }

    /// Cancels the pending frame or warm-up timer; later calls are no-ops.
    pub fn dispose(&self) -> Result<(), JsValue> {
        self.inner.with(|a| {
            a.dispose();
            Ok(())
        })
    }

    pub fn state(&self) -> String {
        self.inner.state()
    }

    /// True once every particle sits within `tolerance` pixels of its target
    /// at full opacity.
    #[wasm_bindgen(js_name = isSettled)]
    pub fn is_settled(&self, tolerance: f64) -> Result<bool, JsValue> {
        self.inner.with(|a| Ok(a.simulation().is_settled(tolerance)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_params_defaults_to_empty_object() {
        assert_eq!(parse_params(None).unwrap(), serde_json::json!({}));
    }

    #[test]
    fn parse_params_reads_json() {
        let v = parse_params(Some(r#"{"preset":"loading","warmup_ms":0}"#)).unwrap();
        assert_eq!(v["preset"], "loading");
        assert_eq!(v["warmup_ms"], 0);
    }

    #[test]
    fn parse_params_rejects_garbage() {
        let err = parse_params(Some("{oops")).unwrap_err();
        assert!(err.starts_with("invalid params"));
    }

    #[test]
    fn explicit_seed_is_kept() {
        assert_eq!(seed_or_now(Some(99)), 99);
    }
}
