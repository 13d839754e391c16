//! Frame loop lifecycle
//!
//! The host owns the refresh signal (`requestAnimationFrame` in the browser, a
//! plain loop natively). Each time it fires, the host calls
//! [`FrameScheduler::run_frame`] and re-arms only while that returns true.
//! [`StopHandle`] is the cancellation token: stopping (or dropping) it ends the
//! loop and runs every registered teardown, such as removing event listeners.
//! Starting again supersedes the previous token: from then on only the newest
//! token can stop the loop.

use std::cell::Cell;
use std::rc::Rc;

use crate::field::StarField;
use crate::renderer::DrawingSurface;
use crate::sim::RandomSource;

#[derive(Debug, Default)]
struct LoopState {
    running: Cell<bool>,
    frames: Cell<u64>,
    /// Bumped on every start; a handle only controls the loop while it matches
    epoch: Cell<u64>,
}

/// Drives simulate-then-render once per refresh
#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    state: Rc<LoopState>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the loop running and hand back its cancellation token
    #[must_use = "dropping the handle stops the loop"]
    pub fn start(&self) -> StopHandle {
        if self.state.running.replace(true) {
            log::warn!("Frame scheduler restarted; the earlier handle no longer controls the loop");
        }
        let epoch = self.state.epoch.get() + 1;
        self.state.epoch.set(epoch);
        log::info!("Frame loop started");
        StopHandle {
            state: self.state.clone(),
            epoch,
            teardown: Vec::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.running.get()
    }

    /// Frames run since creation
    pub fn frames(&self) -> u64 {
        self.state.frames.get()
    }

    /// Run one iteration if the loop is live.
    ///
    /// Returns true when the host should re-arm for the next refresh.
    pub fn run_frame<R: RandomSource>(
        &self,
        field: &mut StarField<R>,
        surface: Option<&mut dyn DrawingSurface>,
    ) -> bool {
        if !self.is_running() {
            return false;
        }
        field.frame(surface);
        self.state.frames.set(self.state.frames.get() + 1);
        true
    }

    /// Run up to `frames` iterations back to back, stopping early if cancelled.
    ///
    /// Returns the number of frames actually run.
    pub fn run_headless<R: RandomSource>(
        &self,
        field: &mut StarField<R>,
        surface: &mut dyn DrawingSurface,
        frames: u64,
    ) -> u64 {
        let mut ran = 0;
        while ran < frames && self.run_frame(field, Some(&mut *surface)) {
            ran += 1;
        }
        ran
    }
}

/// Cancellation token for a running frame loop
pub struct StopHandle {
    state: Rc<LoopState>,
    epoch: u64,
    teardown: Vec<Box<dyn FnOnce()>>,
}

impl StopHandle {
    /// Register cleanup to run when the loop stops
    pub fn on_stop(&mut self, teardown: impl FnOnce() + 'static) {
        self.teardown.push(Box::new(teardown));
    }

    /// True while the loop runs and this is its newest handle
    pub fn is_running(&self) -> bool {
        self.owns_loop() && self.state.running.get()
    }

    fn owns_loop(&self) -> bool {
        self.state.epoch.get() == self.epoch
    }

    /// Stop the loop and run every teardown, newest first
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for StopHandle {
    fn drop(&mut self) {
        let owned = self.owns_loop();
        if owned {
            self.state.running.set(false);
        }
        while let Some(teardown) = self.teardown.pop() {
            teardown();
        }
        if owned {
            log::info!("Frame loop stopped after {} frames", self.state.frames.get());
        }
    }
}
