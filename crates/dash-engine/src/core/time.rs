/// Fixed timestep accumulator.
/// Game logic advances in whole steps of `dt`; leftover frame time carries over.
pub struct FixedTimestep {
    dt: f32,
    accumulator: f32,
    max_steps: u32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            max_steps: 10,
        }
    }

    /// Add frame time and return how many fixed steps to run.
    /// A long stall (tab in background) is capped at `max_steps` instead of
    /// replaying every missed step.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        let cap = self.dt * self.max_steps as f32;
        self.accumulator = (self.accumulator + frame_dt.max(0.0)).min(cap);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }
}

/// Repeating timer polled once per step.
///
/// Replaces callback-style engine timers: the owner calls [`Countdown::tick`]
/// each step and acts when it reports that the timer fired. The interval can
/// be re-armed after each firing, which is how per-enemy decision timers pick
/// a fresh random delay.
#[derive(Debug, Clone, PartialEq)]
pub struct Countdown {
    interval_ms: f32,
    remaining_ms: f32,
}

impl Countdown {
    pub fn new(interval_ms: f32) -> Self {
        Self {
            interval_ms,
            remaining_ms: interval_ms,
        }
    }

    /// Advance by `elapsed_ms`. Returns true when the timer fired this step.
    /// Fires at most once per call; the remainder rolls into the next period.
    pub fn tick(&mut self, elapsed_ms: f32) -> bool {
        self.remaining_ms -= elapsed_ms;
        if self.remaining_ms > 0.0 {
            return false;
        }
        self.remaining_ms = (self.remaining_ms + self.interval_ms).max(0.0);
        true
    }

    /// Restart the current period from the top with a new interval.
    pub fn rearm(&mut self, interval_ms: f32) {
        self.interval_ms = interval_ms;
        self.remaining_ms = interval_ms;
    }

    pub fn interval_ms(&self) -> f32 {
        self.interval_ms
    }

    pub fn remaining_ms(&self) -> f32 {
        self.remaining_ms
    }
}
