/// Wall-clock timestamp in milliseconds, as handed over by the host's frame callback.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Default)]
pub struct Time(pub f64);

impl Time {
    pub fn ms(self) -> f64 {
        self.0
    }

    pub fn since(self, earlier: Time) -> f64 {
        self.0 - earlier.0
    }

    pub fn after(self, delay_ms: f64) -> Time {
        Time(self.0 + delay_ms)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimeSpan {
    pub start: Time,
    pub end: Time,
}

impl TimeSpan {
    pub fn new(start: Time, duration_ms: f64) -> Self {
        Self {
            start,
            end: start.after(duration_ms.max(0.0)),
        }
    }

    pub fn instant(t: Time) -> Self {
        Self { start: t, end: t }
    }

    pub fn duration(&self) -> f64 {
        (self.end.0 - self.start.0).max(0.0)
    }

    /// Normalized progress of `t` through the span, clamped to `[0, 1]`.
    ///
    /// A zero-length span reports 1.0 once `t` reaches its start.
    pub fn progress(&self, t: Time) -> f64 {
        let d = self.duration();
        if d <= 0.0 {
            return if t.0 >= self.start.0 { 1.0 } else { 0.0 };
        }
        ((t.0 - self.start.0) / d).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self, t: Time) -> bool {
        t.0 >= self.end.0
    }
}
