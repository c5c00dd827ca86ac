//! Frame-loop lifecycle for a [`Simulation`].
//!
//! An [`Animator`] owns one simulation and asks a [`FrameScheduler`] for one
//! frame at a time. The host calls [`Animator::tick`] with the handle it was
//! given when that frame fires; the animator steps the simulation to
//! completion and only then requests the next frame. At most one frame
//! request is outstanding at any moment.
//!
//! ```text
//! Uninitialized --start--> Running --pause--> Paused
//!                             ^                  |
//!                             +-----resume-------+
//! any state --dispose--> Disposed
//! ```
//!
//! Disposing (or dropping) the animator cancels the outstanding request, so
//! no tick can reach a torn-down view.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::SimError;
use crate::frame::{Frame, Painter};
use crate::simulation::Simulation;

/// Identifies one outstanding frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FrameHandle(pub u64);

/// Host-side frame source (display refresh, timers, or a test double).
pub trait FrameScheduler {
    /// Ask for one callback after `delay`, then at the next display refresh.
    ///
    /// A zero delay means "next refresh".
    fn request_frame(&mut self, delay: Duration) -> Result<FrameHandle, SimError>;

    /// Withdraw a request that has not fired yet.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Lifecycle state of an [`Animator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    Uninitialized,
    Running,
    Paused,
    Disposed,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Lifecycle::Uninitialized => "uninitialized",
            Lifecycle::Running => "running",
            Lifecycle::Paused => "paused",
            Lifecycle::Disposed => "disposed",
        };
        f.write_str(name)
    }
}

/// Drives a simulation through its lifecycle, one scheduled frame at a time.
pub struct Animator<S: Simulation, F: FrameScheduler> {
    sim: S,
    scheduler: F,
    state: Lifecycle,
    pending: Option<FrameHandle>,
    frames: u64,
}

impl<S: Simulation, F: FrameScheduler> Animator<S, F> {
    /// Wraps a simulation. Nothing is scheduled until [`start`](Self::start).
    pub fn new(sim: S, scheduler: F) -> Self {
        Self {
            sim,
            scheduler,
            state: Lifecycle::Uninitialized,
            pending: None,
            frames: 0,
        }
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    /// Number of frames advanced since construction.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// The frame request currently outstanding, if any.
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn simulation(&self) -> &S {
        &self.sim
    }

    /// Mutable access for between-frame updates (resize, image reload).
    pub fn simulation_mut(&mut self) -> &mut S {
        &mut self.sim
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    /// Starts the frame loop on the next refresh.
    pub fn start(&mut self) -> Result<(), SimError> {
        self.start_after(Duration::ZERO)
    }

    /// Starts the frame loop after a warm-up delay.
    ///
    /// Refuses with `SimError::NotReady` and stays `Uninitialized` if the
    /// simulation has no source data yet.
    pub fn start_after(&mut self, delay: Duration) -> Result<(), SimError> {
        match self.state {
            Lifecycle::Uninitialized => {}
            Lifecycle::Disposed => return Err(SimError::Disposed),
            from => return Err(self.invalid(from, "start")),
        }
        if !self.sim.is_ready() {
            warn!("refusing to start: simulation has no source data");
            return Err(SimError::NotReady(
                "simulation has no source data".to_string(),
            ));
        }
        self.pending = Some(self.scheduler.request_frame(delay)?);
        self.transition(Lifecycle::Running);
        Ok(())
    }

    /// Stops scheduling frames while keeping all particle state.
    pub fn pause(&mut self) -> Result<(), SimError> {
        match self.state {
            Lifecycle::Running => {
                self.cancel_pending();
                self.transition(Lifecycle::Paused);
                Ok(())
            }
            Lifecycle::Paused => Ok(()),
            Lifecycle::Disposed => Err(SimError::Disposed),
            from => Err(self.invalid(from, "pause")),
        }
    }

    /// Continues a paused loop from where it stopped.
    pub fn resume(&mut self) -> Result<(), SimError> {
        match self.state {
            Lifecycle::Paused => {
                self.pending = Some(self.scheduler.request_frame(Duration::ZERO)?);
                self.transition(Lifecycle::Running);
                Ok(())
            }
            Lifecycle::Running => Ok(()),
            Lifecycle::Disposed => Err(SimError::Disposed),
            from => Err(self.invalid(from, "resume")),
        }
    }

    /// Cancels any outstanding frame and stops the loop for good.
    ///
    /// Idempotent: disposing twice touches the scheduler at most once.
    pub fn dispose(&mut self) {
        if self.state == Lifecycle::Disposed {
            return;
        }
        self.cancel_pending();
        self.transition(Lifecycle::Disposed);
    }

    /// Handles a fired frame.
    ///
    /// Steps the simulation once and requests the next frame. Returns
    /// `Ok(false)` without touching anything for stale handles and for any
    /// state other than `Running`. If the next request fails the animator
    /// drops to `Paused` and returns the error.
    pub fn tick(&mut self, handle: FrameHandle) -> Result<bool, SimError> {
        if self.state != Lifecycle::Running || self.pending != Some(handle) {
            return Ok(false);
        }
        self.pending = None;
        self.sim.step();
        self.frames += 1;
        match self.scheduler.request_frame(Duration::ZERO) {
            Ok(next) => {
                self.pending = Some(next);
                Ok(true)
            }
            Err(e) => {
                // Paused with nothing pending, so `resume` retries the request.
                warn!(error = %e, "could not schedule next frame, pausing");
                self.transition(Lifecycle::Paused);
                Err(e)
            }
        }
    }

    /// Draw instructions for the current simulation state.
    pub fn frame(&self) -> Frame {
        self.sim.frame()
    }

    /// Paints the current state onto `painter`.
    pub fn paint(&self, painter: &mut dyn Painter) {
        painter.paint(&self.sim.frame());
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
    }

    fn transition(&mut self, to: Lifecycle) {
        debug!(from = %self.state, to = %to, frames = self.frames, "lifecycle transition");
        self.state = to;
    }

    fn invalid(&self, from: Lifecycle, action: &str) -> SimError {
        SimError::InvalidTransition {
            from: from.to_string(),
            action: action.to_string(),
        }
    }
}

impl<S: Simulation, F: FrameScheduler> Drop for Animator<S, F> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

/// Bookkeeping shared between a [`ManualScheduler`] and its clones.
#[derive(Debug, Default)]
struct SchedulerLog {
    next_id: u64,
    queue: Vec<(FrameHandle, Duration)>,
    requests: usize,
    cancels: usize,
}

/// A scheduler that only records requests; frames fire when the owner says so.
///
/// Clones share one log, so a test can keep a clone after handing the
/// original to an [`Animator`]. Offline renderers use it as their clock.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    log: Rc<RefCell<SchedulerLog>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total `request_frame` calls seen.
    pub fn request_count(&self) -> usize {
        self.log.borrow().requests
    }

    /// Total `cancel_frame` calls seen.
    pub fn cancel_count(&self) -> usize {
        self.log.borrow().cancels
    }

    /// Requests plus cancellations.
    pub fn call_count(&self) -> usize {
        let log = self.log.borrow();
        log.requests + log.cancels
    }

    /// Handles that were requested and neither fired nor cancelled.
    pub fn pending(&self) -> Vec<FrameHandle> {
        self.log.borrow().queue.iter().map(|(h, _)| *h).collect()
    }

    /// Delay attached to the oldest outstanding request.
    pub fn next_delay(&self) -> Option<Duration> {
        self.log.borrow().queue.first().map(|(_, d)| *d)
    }

    /// Removes and returns the oldest outstanding request, as if it fired.
    pub fn fire_next(&self) -> Option<FrameHandle> {
        let mut log = self.log.borrow_mut();
        if log.queue.is_empty() {
            return None;
        }
        Some(log.queue.remove(0).0)
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self, delay: Duration) -> Result<FrameHandle, SimError> {
        let mut log = self.log.borrow_mut();
        log.requests += 1;
        log.next_id += 1;
        let handle = FrameHandle(log.next_id);
        log.queue.push((handle, delay));
        Ok(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let mut log = self.log.borrow_mut();
        log.cancels += 1;
        log.queue.retain(|(h, _)| *h != handle);
    }
}
