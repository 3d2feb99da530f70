//! The boss: a scripted walk/shoot/hop cycle plus a damage axis.
//!
//! ```text
//! Intro ──FIGHTING──▶ Idle ──idle_ms──▶ Walking ──walk_ms──▶ Jumping (walked back) ──▶ Idle
//!                      │                   ▲      └────────▶ Idle (walked forward)
//!                      └─left of start──▶ Shooting ──shoot_ms──┘
//! ```

use crate::assets::AppearanceHandle;
use crate::character::{Damaged, DyingFall};
use crate::config::{BossTuning, MatchConfig};
use crate::entities::{
    BoxShape, Collision, CollisionBox, Direction, Entity, EntityId, EntityKind, Point, Side,
};
use crate::error::GameError;
use crate::events::{EventBuffer, FrameEvent};
use crate::match_phase::MatchPhase;
use crate::motion::{Cadence, FlipFlop, KinematicArc, Timer};
use crate::projectile::ProjectileState;
use crate::world::{Frame, WorldRequest};

pub const BOSS_BOX: BoxShape = BoxShape::new(6.0, 2.0, 24.0, 45.0);

/// Where shots leave the boss, relative to its position.
const MUZZLE: (f32, f32) = (-4.0, 14.0);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BossMovement {
    Intro { announced: bool },
    Idle(Timer),
    Walking { heading: Direction, timer: Timer, cadence: Cadence, step: FlipFlop },
    Jumping(KinematicArc),
    Shooting { timer: Timer, fired: bool },
    Dying(DyingFall),
    Winning,
}

impl BossMovement {
    pub fn name(&self) -> &'static str {
        match self {
            BossMovement::Intro { .. } => "intro",
            BossMovement::Idle(_) => "idle",
            BossMovement::Walking { .. } => "walking",
            BossMovement::Jumping(_) => "jumping",
            BossMovement::Shooting { .. } => "shooting",
            BossMovement::Dying(_) => "dying",
            BossMovement::Winning => "winning",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Boss {
    pub id: EntityId,
    pub pos: Point,
    pub vel: Point,
    pub lives: u32,
    movement: BossMovement,
    damage: Option<Damaged>,
    start: Point,
    appearance: Option<AppearanceHandle>,
}

impl Boss {
    pub fn new(id: EntityId, config: &MatchConfig) -> Self {
        let start = Point::new(config.boss.start_x, config.ground_top(BOSS_BOX.foot()));
        Boss {
            id,
            pos: start,
            vel: Point::ZERO,
            lives: config.boss.lives,
            movement: BossMovement::Intro { announced: false },
            damage: None,
            start,
            appearance: None,
        }
    }

    /// Back to the start spot with full lives. `announce` replays the intro.
    pub fn reset(&mut self, config: &MatchConfig, announce: bool) {
        *self = Boss { appearance: self.appearance.take(), ..Boss::new(self.id, config) };
        if !announce {
            self.movement = Self::idle(&config.boss);
        }
    }

    pub fn movement(&self) -> &BossMovement {
        &self.movement
    }

    pub fn damage(&self) -> Option<&Damaged> {
        self.damage.as_ref()
    }

    pub fn start(&self) -> Point {
        self.start
    }

    fn idle(tuning: &BossTuning) -> BossMovement {
        BossMovement::Idle(Timer::new(tuning.idle_ms))
    }

    fn switch_movement(&mut self, next: BossMovement) {
        log::debug!("boss {} -> {}", self.movement.name(), next.name());
        self.movement = next;
    }

    pub fn die(&mut self, config: &MatchConfig) {
        self.switch_movement(BossMovement::Dying(DyingFall::new(config.boss.dying_gravity)));
    }

    pub fn win(&mut self) {
        self.pos.y = self.start.y;
        self.vel = Point::ZERO;
        self.switch_movement(BossMovement::Winning);
    }

    /// Only a thrown projectile hurts the boss, and not while it is already
    /// recovering from the last hit.
    pub fn react(&mut self, collisions: &[Collision], events: &mut EventBuffer, config: &MatchConfig) {
        for c in collisions {
            let thrown = c.kind == EntityKind::Projectile(ProjectileState::Throwed);
            if !thrown || c.side == Side::South || self.damage.is_some() || self.lives == 0 {
                continue;
            }
            self.lives = self.lives.saturating_sub(1);
            self.damage = Some(Damaged::new(config.boss.damage_ms));
            log::debug!("boss hit by {}, {} lives left", c.other, self.lives);
            events.sound("birdo-hurt");
            events.push(FrameEvent::BossDamaged { lives: self.lives });
        }
    }

    pub fn update(&mut self, frame: &mut Frame<'_>) -> Result<(), GameError> {
        let next = self.update_movement(frame);
        let recovered = match self.damage.as_mut() {
            Some(damaged) => damaged.update(frame.elapsed_ms),
            None => false,
        };
        if let Some(next) = next {
            self.switch_movement(next);
        }
        if recovered {
            self.damage = None;
        }

        self.appearance = Some(frame.appearances.get(&self.appearance_key())?);
        Ok(())
    }

    fn update_movement(&mut self, frame: &mut Frame<'_>) -> Option<BossMovement> {
        let config = frame.config;
        let tuning = &config.boss;
        let elapsed = frame.elapsed_ms;

        match &mut self.movement {
            BossMovement::Intro { announced } => {
                if !*announced {
                    frame.events.sound("birdo-intro");
                    *announced = true;
                }
                self.pos = self.start;
                self.vel = Point::ZERO;
                (frame.phase == MatchPhase::Fighting).then(|| Self::idle(tuning))
            }
            BossMovement::Idle(timer) => {
                self.vel = Point::ZERO;
                // Outside the fight the boss holds still with its timer frozen.
                if frame.phase != MatchPhase::Fighting || !timer.advance(elapsed) {
                    return None;
                }
                if self.pos.x < self.start.x {
                    Some(BossMovement::Shooting { timer: Timer::new(tuning.shoot_ms), fired: false })
                } else {
                    Some(BossMovement::Walking {
                        heading: Direction::Left,
                        timer: Timer::new(tuning.walk_ms),
                        cadence: Cadence::new(tuning.walk_frame_ms),
                        step: FlipFlop::default(),
                    })
                }
            }
            BossMovement::Walking { heading, timer, cadence, step } => {
                self.vel = Point::new(heading.sign() * tuning.walk_speed, 0.0);
                self.pos.x += self.vel.x;
                if cadence.advance(elapsed) {
                    step.flip();
                }
                if !timer.advance(elapsed) {
                    return None;
                }
                // Walking back toward the start ends with a hop.
                match heading {
                    Direction::Right => Some(BossMovement::Jumping(KinematicArc::new(tuning.jump))),
                    Direction::Left => Some(Self::idle(tuning)),
                }
            }
            BossMovement::Jumping(arc) => {
                self.vel.x = 0.0;
                self.vel.y = arc.step();
                let next_y = self.pos.y + self.vel.y;
                if next_y > self.start.y {
                    self.pos.y = self.start.y;
                    self.vel.y = 0.0;
                    Some(Self::idle(tuning))
                } else {
                    self.pos.y = next_y;
                    None
                }
            }
            BossMovement::Shooting { timer, fired } => {
                self.vel = Point::ZERO;
                timer.advance(elapsed);
                let live = frame.phase == MatchPhase::Fighting;
                if live && !*fired && timer.elapsed() >= tuning.shoot_delay_ms {
                    *fired = true;
                    frame.requests.push(WorldRequest::Spawn {
                        kind: tuning.ammo,
                        pos: self.pos.offset(MUZZLE.0, MUZZLE.1),
                        heading: Direction::Left,
                    });
                    frame.events.sound("birdo-shoot-egg");
                    return None;
                }
                timer.finished().then(|| BossMovement::Walking {
                    heading: Direction::Right,
                    timer: Timer::new(tuning.walk_ms),
                    cadence: Cadence::new(tuning.walk_frame_ms),
                    step: FlipFlop::default(),
                })
            }
            BossMovement::Dying(fall) => {
                if fall.step(&mut self.pos, &mut self.vel, tuning.walk_speed, config.world.fall_off_y) {
                    frame.events.push(FrameEvent::FellOffScreen { who: EntityKind::Boss });
                }
                None
            }
            BossMovement::Winning => {
                self.vel = Point::ZERO;
                None
            }
        }
    }

    pub fn appearance_key(&self) -> String {
        let flicker = match (&self.movement, self.damage) {
            (BossMovement::Dying(fall), _) => Some(fall.flicker_on()),
            (_, Some(damaged)) => Some(damaged.flicker_on()),
            _ => None,
        };
        if let Some(on) = flicker {
            return format!("birdo-damage-{}", if on { 0 } else { 1 });
        }
        match &self.movement {
            BossMovement::Walking { step, .. } => format!("birdo-walk-{}", u8::from(step.is_on())),
            BossMovement::Shooting { .. } => "birdo-1".to_string(),
            _ => "birdo-0".to_string(),
        }
    }
}

impl Entity for Boss {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Boss
    }

    fn pos(&self) -> Point {
        self.pos
    }

    fn collision_box(&self) -> CollisionBox {
        BOSS_BOX.at(self.pos)
    }

    fn appearance(&self) -> Option<&AppearanceHandle> {
        self.appearance.as_ref()
    }
}
