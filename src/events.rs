//! Events raised while a tick runs.

use crate::entities::{EntityId, EntityKind};
use crate::match_phase::MatchPhase;

#[derive(Clone, Debug, PartialEq)]
pub enum FrameEvent {
    Sound { key: &'static str },
    PlayerDamaged { lives: u32 },
    BossDamaged { lives: u32 },
    ProjectileSpawned { id: EntityId },
    ProjectileRemoved { id: EntityId },
    PhaseChanged { from: MatchPhase, to: MatchPhase },
    /// A dying character dropped below the fall-off line.
    FellOffScreen { who: EntityKind },
}

/// Per-tick buffer. Entities push into it; the tick drains it.
#[derive(Clone, Debug, Default)]
pub struct EventBuffer {
    events: Vec<FrameEvent>,
}

impl EventBuffer {
    pub fn push(&mut self, event: FrameEvent) {
        self.events.push(event);
    }

    pub fn sound(&mut self, key: &'static str) {
        self.events.push(FrameEvent::Sound { key });
    }

    pub fn iter(&self) -> impl Iterator<Item = &FrameEvent> {
        self.events.iter()
    }

    pub fn contains(&self, event: &FrameEvent) -> bool {
        self.events.contains(event)
    }

    pub fn drain(&mut self) -> Vec<FrameEvent> {
        std::mem::take(&mut self.events)
    }
}
