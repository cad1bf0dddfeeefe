use tracing::debug;

use crate::frame::{Frame, FrameClock};

/// Cancellable handle around the host's per-frame callback.
///
/// Once cancelled, `tick` never invokes the frame body again, so no work leaks
/// after the visualization is torn down.
#[derive(Debug, Default)]
pub struct AnimationLoop {
    clock: FrameClock,
    running: bool,
    cancelled: bool,
}

impl AnimationLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the loop. A cancelled loop cannot be restarted.
    pub fn start(&mut self) -> bool {
        if self.cancelled {
            return false;
        }
        self.running = true;
        true
    }

    pub fn cancel(&mut self) {
        if self.running {
            debug!(frames = self.clock.frames_emitted(), "animation loop cancelled");
        }
        self.running = false;
        self.cancelled = true;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Run `body` for the frame at `now_ms`; returns whether the loop should
    /// schedule another frame.
    pub fn tick<F>(&mut self, now_ms: f64, body: F) -> bool
    where
        F: FnOnce(Frame),
    {
        if !self.running {
            return false;
        }
        let frame = self.clock.tick(now_ms);
        body(frame);
        self.running
    }
}
