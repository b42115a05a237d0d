//! Run pace: how fast obstacles move and how much time a round has left.

use serde::Serialize;

/// Distance covered per second at multiplier 1.
const DISTANCE_PER_SECOND: f64 = 10.0;
/// Distance after which the speed multiplier steps up.
const STEP_DISTANCE: f64 = 100.0;
/// Multiplier gained per step.
const STEP_GAIN: f64 = 0.15;

#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display, derive_more::FromStr,
)]
#[serde(rename_all = "lowercase")]
pub enum PaceKind {
    /// The obstacle speeds up with the distance run
    #[default]
    #[display("accelerating")]
    Accelerating,
    /// The obstacle keeps its base speed
    #[display("constant")]
    Constant,
}

/// Speed multiplier of one generation's run.
///
/// Distance accrues as `10 * multiplier * dt` per tick, and the multiplier is
/// `1 + floor(distance / 100) * 0.15`.
#[derive(Debug, Clone)]
pub struct Pace {
    kind: PaceKind,
    distance: f64,
    multiplier: f64,
}

impl Pace {
    pub fn new(kind: PaceKind) -> Self {
        Self {
            kind,
            distance: 0.0,
            multiplier: 1.0,
        }
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn advance(&mut self, dt: f64) {
        self.distance += DISTANCE_PER_SECOND * self.multiplier * dt;
        if self.kind == PaceKind::Accelerating {
            self.multiplier = 1.0 + (self.distance / STEP_DISTANCE).floor() * STEP_GAIN;
        }
    }

    /// Starts over from zero distance.
    pub fn reset(&mut self) {
        *self = Self::new(self.kind);
    }
}

/// Seconds left in a round, floored at zero.
#[derive(Debug, Clone)]
pub struct Countdown {
    start: f64,
    remaining: f64,
}

impl Countdown {
    pub fn new(seconds: f64) -> Self {
        Self {
            start: seconds,
            remaining: seconds,
        }
    }

    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    pub fn tick(&mut self, dt: f64) {
        self.remaining = (self.remaining - dt).max(0.0);
    }

    pub fn reset(&mut self) {
        self.remaining = self.start;
    }
}
