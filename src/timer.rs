/// Millisecond interval timer driven by the frame loop.
///
/// The timer only accumulates time; the interval is passed in on every
/// `try_fire` call, so a caller that reads it from live state picks up a
/// changed interval on the very next cycle.

#[derive(Clone, Debug, Default, PartialEq)]
pub struct IntervalTimer {
    elapsed_ms: f64,
}

impl IntervalTimer {
    pub fn new() -> Self {
        IntervalTimer::default()
    }

    /// Build a timer that fires on the first `try_fire`, like a loop that
    /// runs its body once before scheduling itself.
    pub fn primed() -> Self {
        IntervalTimer {
            elapsed_ms: f64::INFINITY,
        }
    }

    pub fn advance(&mut self, dt_ms: f64) {
        self.elapsed_ms += dt_ms;
    }

    /// Consume one interval if enough time has built up.
    pub fn try_fire(&mut self, interval_ms: f64) -> bool {
        if self.elapsed_ms < interval_ms {
            return false;
        }
        if self.elapsed_ms.is_infinite() {
            self.elapsed_ms = 0.0;
        } else {
            self.elapsed_ms -= interval_ms.max(0.0);
        }
        true
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }
}
