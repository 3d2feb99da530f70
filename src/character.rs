//! Axis states shared by the player and the boss.

use crate::entities::Point;
use crate::motion::{FlipFlop, KinematicArc, Timer};

/// Damage axis: a fixed window during which the owner flickers and cannot
/// be hurt again.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Damaged {
    timer: Timer,
    flicker: FlipFlop,
}

impl Damaged {
    pub fn new(duration_ms: f32) -> Self {
        Damaged { timer: Timer::new(duration_ms), flicker: FlipFlop::default() }
    }

    /// Flips the flicker and returns `true` once the window is over.
    pub fn update(&mut self, elapsed_ms: f32) -> bool {
        self.flicker.flip();
        self.timer.advance(elapsed_ms)
    }

    pub fn flicker_on(&self) -> bool {
        self.flicker.is_on()
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.timer.elapsed()
    }
}

/// Terminal fall of a defeated character: accelerates downward while
/// drifting sideways, then reports leaving the screen exactly once.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DyingFall {
    arc: KinematicArc,
    flicker: FlipFlop,
    gone: bool,
}

impl DyingFall {
    pub fn new(gravity: f32) -> Self {
        DyingFall { arc: KinematicArc::falling(gravity), flicker: FlipFlop::default(), gone: false }
    }

    /// Moves `pos`; returns `true` on the tick it first passes `fall_off_y`.
    pub fn step(&mut self, pos: &mut Point, vel: &mut Point, drift_x: f32, fall_off_y: f32) -> bool {
        self.flicker.flip();
        if self.gone {
            *vel = Point::ZERO;
            return false;
        }
        vel.x = drift_x;
        vel.y = self.arc.step();
        let next_y = pos.y + vel.y;
        if next_y > fall_off_y {
            self.gone = true;
            *vel = Point::ZERO;
            return true;
        }
        pos.x += vel.x;
        pos.y = next_y;
        false
    }

    pub fn flicker_on(&self) -> bool {
        self.flicker.is_on()
    }

    pub fn is_gone(&self) -> bool {
        self.gone
    }
}
