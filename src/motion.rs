//! Time and motion helpers shared by every state machine.
//!
//! Nothing here reads a clock: timers advance by the `elapsed_ms` delta the
//! game loop hands to each tick, arcs advance one step per tick.

use crate::config::ArcParams;

/// Counts elapsed simulated milliseconds toward a fixed duration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timer {
    elapsed: f32,
    duration: f32,
}

impl Timer {
    pub fn new(duration_ms: f32) -> Self {
        Timer { elapsed: 0.0, duration: duration_ms }
    }

    /// Returns `true` once the accumulated time reaches the duration.
    pub fn advance(&mut self, elapsed_ms: f32) -> bool {
        self.elapsed += elapsed_ms;
        self.finished()
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

/// Fires every `period_ms`. Overshoot is discarded, so a long frame fires
/// once rather than catching up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cadence {
    acc: f32,
    period: f32,
}

impl Cadence {
    pub fn new(period_ms: f32) -> Self {
        Cadence { acc: 0.0, period: period_ms }
    }

    pub fn advance(&mut self, elapsed_ms: f32) -> bool {
        self.acc += elapsed_ms;
        if self.acc >= self.period {
            self.acc = 0.0;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.acc = 0.0;
    }
}

/// Vertical velocity under constant gravity, sampled once per tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KinematicArc {
    params: ArcParams,
    frame: u32,
}

impl KinematicArc {
    pub fn new(params: ArcParams) -> Self {
        KinematicArc { params, frame: 0 }
    }

    /// Free fall from rest.
    pub fn falling(g: f32) -> Self {
        Self::new(ArcParams::new(0.0, g))
    }

    /// Velocity for the current tick; the arc then moves on by one tick.
    pub fn step(&mut self) -> f32 {
        let v = self.params.v_i + self.params.g * self.frame as f32;
        self.frame += 1;
        v
    }

    /// Ticks taken so far.
    pub fn frame(&self) -> u32 {
        self.frame
    }
}

/// A two-state toggle used for flicker and bobbing effects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlipFlop(bool);

impl FlipFlop {
    pub fn flip(&mut self) -> bool {
        self.0 = !self.0;
        self.0
    }

    pub fn is_on(self) -> bool {
        self.0
    }
}
