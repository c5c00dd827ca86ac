//! The `Simulation` trait every particle effect implements.
//!
//! The trait is object-safe so effects can be driven as `dyn Simulation`
//! by the registry, the CLI and the web bindings.

use crate::frame::Frame;
use serde_json::Value;

/// A frame-stepped particle effect.
///
/// `step` is the only state transition; it advances every particle exactly
/// once and never fails. `frame` describes the current state for painting
/// and has no side effects.
pub trait Simulation {
    /// Advance every particle by one frame.
    fn step(&mut self);

    /// Draw instructions for the current state.
    fn frame(&self) -> Frame;

    /// Number of live particle slots.
    fn particle_count(&self) -> usize;

    /// Whether the simulation has the source data it needs to animate.
    ///
    /// Defaults to `true`. Effects that wait on external input (an image)
    /// override this so the animator refuses to start without it.
    fn is_ready(&self) -> bool {
        true
    }

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing all available parameters, their types, ranges, and defaults.
    fn param_schema(&self) -> Value;
}
