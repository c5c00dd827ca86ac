//! Error types for the motes core.

use thiserror::Error;

/// Errors produced by simulation setup and frame-loop control.
#[derive(Debug, Error)]
pub enum SimError {
    /// Width or height was zero (or overflowed) where a real surface is required.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A decoded pixel buffer did not match its declared dimensions.
    #[error("image buffer mismatch: expected {expected} bytes, got {got}")]
    ImageBufferMismatch { expected: usize, got: usize },

    /// The simulation has no source data yet and cannot be started.
    #[error("simulation not ready: {0}")]
    NotReady(String),

    /// A lifecycle control was called from a state that does not allow it.
    #[error("cannot {action} while {from}")]
    InvalidTransition { from: String, action: String },

    /// A control was called after the animator was disposed.
    #[error("animator has been disposed")]
    Disposed,

    /// The host refused to schedule a frame.
    #[error("frame scheduling failed: {0}")]
    Scheduler(String),

    /// A requested effect name is not registered.
    #[error("unknown effect: {0}")]
    UnknownEffect(String),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Reading or writing an image file failed.
    #[error("i/o error: {0}")]
    Io(String),
}
