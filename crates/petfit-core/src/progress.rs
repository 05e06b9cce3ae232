use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const START_VALUE: u8 = 6;
pub const RUNNING_CEILING: u8 = 90;
pub const DONE_VALUE: u8 = 100;
const MAX_STEP: u8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressState {
    pub value: u8,
    pub running: bool,
}

#[derive(Debug)]
struct ProgressTimer {
    next_due: Instant,
}

/// Cosmetic progress indicator. It never reflects real request progress:
/// it creeps toward the ceiling while running and jumps to done on stop.
#[derive(Debug)]
pub struct ProgressSimulator {
    value: u8,
    period: Duration,
    timer: Option<ProgressTimer>,
    rng: StdRng,
}

impl ProgressSimulator {
    pub fn new(period: Duration) -> Self {
        Self::with_rng(period, StdRng::from_entropy())
    }

    pub fn with_rng(period: Duration, rng: StdRng) -> Self {
        Self {
            value: 0,
            period: period.max(Duration::from_millis(1)),
            timer: None,
            rng,
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.timer = None;
        self.value = START_VALUE;
        self.timer = Some(ProgressTimer {
            next_due: now + self.period,
        });
    }

    /// Applies one increment per elapsed period. Returns whether the value moved.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        let Some(timer) = &mut self.timer else {
            return false;
        };

        let before = self.value;
        while now >= timer.next_due {
            let step = self.rng.gen_range(1..=MAX_STEP);
            self.value = self.value.saturating_add(step).min(RUNNING_CEILING);
            if self.value == RUNNING_CEILING {
                timer.next_due = now + self.period;
                break;
            }
            timer.next_due += self.period;
        }

        self.value != before
    }

    /// Cancels the timer and forces completion. No-op when not running.
    pub fn stop(&mut self) -> bool {
        if self.timer.take().is_none() {
            return false;
        }
        self.value = DONE_VALUE;
        true
    }

    pub fn reset(&mut self) {
        self.timer = None;
        self.value = 0;
    }

    pub fn state(&self) -> ProgressState {
        ProgressState {
            value: self.value,
            running: self.timer.is_some(),
        }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }
}
