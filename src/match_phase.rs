//! Top-level match flow.
//!
//! ```text
//! INTRO ──intro_ms──▶ FIGHTING ──boss lives 0──▶ PLAYER_WON ──boss gone──▶ INTRO
//!                        │
//!                        └──player lives 0──▶ BOSS_WON ──player gone──▶ PAUSE ──resume──▶ INTRO
//! ```

use std::fmt;

use crate::config::MatchTimings;
use crate::motion::Timer;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatchPhase {
    Intro,
    Fighting,
    PlayerWon,
    BossWon,
    Pause,
}

impl MatchPhase {
    pub fn is_outcome(self) -> bool {
        matches!(self, MatchPhase::PlayerWon | MatchPhase::BossWon)
    }

    /// Where a finished outcome leads once the loser has left the screen.
    pub fn after_outcome(self) -> Option<MatchPhase> {
        match self {
            MatchPhase::PlayerWon => Some(MatchPhase::Intro),
            MatchPhase::BossWon => Some(MatchPhase::Pause),
            _ => None,
        }
    }

    pub fn banner(self) -> &'static str {
        match self {
            MatchPhase::Intro => "GET READY",
            MatchPhase::Fighting => "",
            MatchPhase::PlayerWon => "YOU WIN",
            MatchPhase::BossWon => "GAME OVER",
            MatchPhase::Pause => "PAUSED - R: retry  M: menu",
        }
    }
}

impl fmt::Display for MatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchPhase::Intro => "INTRO",
            MatchPhase::Fighting => "FIGHTING",
            MatchPhase::PlayerWon => "PLAYER_WON",
            MatchPhase::BossWon => "BOSS_WON",
            MatchPhase::Pause => "PAUSE",
        };
        f.write_str(name)
    }
}

/// Decides the outcome of a fight from the remaining lives. A boss knocked
/// out on the same tick as the player still counts as a player win.
pub fn outcome(player_lives: u32, boss_lives: u32) -> Option<MatchPhase> {
    if boss_lives == 0 {
        Some(MatchPhase::PlayerWon)
    } else if player_lives == 0 {
        Some(MatchPhase::BossWon)
    } else {
        None
    }
}

/// Current phase plus the time spent in it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchClock {
    phase: MatchPhase,
    in_phase: Timer,
}

impl MatchClock {
    pub fn new() -> Self {
        Self::starting_at(MatchPhase::Intro)
    }

    pub fn starting_at(phase: MatchPhase) -> Self {
        MatchClock { phase, in_phase: Timer::new(0.0) }
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn elapsed_in_phase(&self) -> f32 {
        self.in_phase.elapsed()
    }

    /// Advances the clock and returns the phase a timed transition asks for.
    /// Only INTRO and the outcome phases ever time out.
    pub fn advance(&mut self, elapsed_ms: f32, timings: &MatchTimings) -> Option<MatchPhase> {
        self.in_phase.advance(elapsed_ms);
        let spent = self.in_phase.elapsed();
        match self.phase {
            MatchPhase::Intro if spent >= timings.intro_ms => Some(MatchPhase::Fighting),
            phase if phase.is_outcome() && spent >= timings.outcome_delay_ms => phase.after_outcome(),
            _ => None,
        }
    }

    /// Switches phase, returning the one left behind.
    pub fn enter(&mut self, phase: MatchPhase) -> MatchPhase {
        let from = self.phase;
        self.phase = phase;
        self.in_phase = Timer::new(0.0);
        from
    }
}

impl Default for MatchClock {
    fn default() -> Self {
        Self::new()
    }
}
