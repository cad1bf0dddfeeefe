use foundation::time::Time;

/// Per-frame timing handed to every stage of the update.
///
/// `dt_ms` is wall-clock based so simulated motion is independent of the
/// host's frame rate.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Wall-clock time at the start of the frame.
    pub now: Time,
    /// Milliseconds since the previous frame (0 on the first frame).
    pub dt_ms: f64,
}

impl Frame {
    pub fn new(index: u64, now: Time, dt_ms: f64) -> Self {
        Self { index, now, dt_ms }
    }
}

/// Turns host timestamps into [`Frame`]s.
#[derive(Debug, Default, Clone)]
pub struct FrameClock {
    next_index: u64,
    last: Option<Time>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the frame for timestamp `now_ms`.
    ///
    /// Timestamps that go backwards or are not finite yield `dt_ms == 0`.
    pub fn tick(&mut self, now_ms: f64) -> Frame {
        let now = Time(if now_ms.is_finite() {
            now_ms
        } else {
            self.last.map(|t| t.ms()).unwrap_or(0.0)
        });
        let dt_ms = match self.last {
            Some(prev) => now.since(prev).max(0.0),
            None => 0.0,
        };
        if self.last.is_none_or(|prev| now.ms() >= prev.ms()) {
            self.last = Some(now);
        }
        let frame = Frame::new(self.next_index, now, dt_ms);
        self.next_index += 1;
        frame
    }

    pub fn frames_emitted(&self) -> u64 {
        self.next_index
    }
}

#[cfg(test)]
mod tests {
    use super::FrameClock;

    #[test]
    fn first_frame_has_zero_dt() {
        let mut clock = FrameClock::new();
        let f = clock.tick(1000.0);
        assert_eq!(f.index, 0);
        assert_eq!(f.dt_ms, 0.0);
    }

    #[test]
    fn dt_tracks_wall_clock() {
        let mut clock = FrameClock::new();
        clock.tick(1000.0);
        let f = clock.tick(1016.5);
        assert_eq!(f.index, 1);
        assert_eq!(f.dt_ms, 16.5);
    }

    #[test]
    fn backwards_time_is_ignored() {
        let mut clock = FrameClock::new();
        clock.tick(1000.0);
        assert_eq!(clock.tick(900.0).dt_ms, 0.0);
        assert_eq!(clock.tick(1010.0).dt_ms, 10.0);
        assert_eq!(clock.tick(f64::NAN).dt_ms, 0.0);
        assert_eq!(clock.frames_emitted(), 4);
    }
}
