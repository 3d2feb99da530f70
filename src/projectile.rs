//! Thrown objects (eggs and carrots) and their state machine.
//!
//! ```text
//! FLYING ──pick up──▶ PICKED_UP ──throw──▶ THROWED ──hit boss──▶ COLLIDED
//!    │                    │
//!    └──hit player side───┼──────────────────────────────────▶ COLLIDED
//!                         └──holder disarmed──▶ DROPPED
//! ```
//! A held projectile does not know its holder; the holder writes its
//! position every tick.

use serde::Deserialize;

use crate::assets::AppearanceHandle;
use crate::config::ProjectileTuning;
use crate::entities::{
    BoxShape, Collision, CollisionBox, Direction, Entity, EntityId, EntityKind, Point,
    ProjectileView, Side,
};
use crate::error::GameError;
use crate::motion::KinematicArc;
use crate::world::Frame;

pub const PROJECTILE_BOX: BoxShape = BoxShape::new(0.0, 0.0, 18.0, 16.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum ProjectileKind {
    Egg,
    Carrot,
}

impl ProjectileKind {
    pub fn appearance_key(self) -> &'static str {
        match self {
            ProjectileKind::Egg => "egg",
            ProjectileKind::Carrot => "carrot",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectileState {
    Flying,
    PickedUp,
    Throwed,
    Collided,
    Dropped,
}

impl ProjectileState {
    /// A character landing on a projectile in this state can ride it.
    pub fn is_landable(self) -> bool {
        matches!(self, ProjectileState::Flying | ProjectileState::PickedUp)
    }

    /// Bounced and dropped projectiles no longer take part in collisions.
    pub fn is_collidable(self) -> bool {
        !matches!(self, ProjectileState::Collided | ProjectileState::Dropped)
    }

    pub fn is_terminal(self) -> bool {
        !self.is_collidable()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Motion {
    Drift,
    Held,
    Arc(KinematicArc),
    Fall,
}

#[derive(Clone, Debug)]
pub struct Projectile {
    pub id: EntityId,
    pub kind: ProjectileKind,
    pub pos: Point,
    pub vel: Point,
    state: ProjectileState,
    motion: Motion,
    terminal_ticks: u32,
    appearance: Option<AppearanceHandle>,
}

impl Projectile {
    /// A freshly shot projectile drifting horizontally toward `heading`.
    pub fn flying(
        id: EntityId,
        kind: ProjectileKind,
        pos: Point,
        heading: Direction,
        tuning: &ProjectileTuning,
    ) -> Self {
        Projectile {
            id,
            kind,
            pos,
            vel: Point::new(heading.sign() * tuning.flying_speed, 0.0),
            state: ProjectileState::Flying,
            motion: Motion::Drift,
            terminal_ticks: 0,
            appearance: None,
        }
    }

    pub fn state(&self) -> ProjectileState {
        self.state
    }

    pub fn view(&self) -> ProjectileView {
        ProjectileView {
            id: self.id,
            state: self.state,
            pos: self.pos,
            vel: self.vel,
            bbox: self.collision_box(),
        }
    }

    fn enter(&mut self, state: ProjectileState, motion: Motion) {
        log::debug!("projectile {} {:?} -> {:?}", self.id, self.state, state);
        self.state = state;
        self.motion = motion;
        self.terminal_ticks = 0;
    }

    /// Freezes the projectile; from now on a holder positions it.
    pub fn pick_up(&mut self) {
        if self.state == ProjectileState::PickedUp {
            return;
        }
        self.vel = Point::ZERO;
        self.enter(ProjectileState::PickedUp, Motion::Held);
    }

    /// Holder writes the position of a held projectile.
    pub fn carry_to(&mut self, pos: Point) {
        self.pos = pos;
    }

    /// Launches on a parabola with a fixed horizontal speed.
    pub fn throw(&mut self, vel_x: f32, tuning: &ProjectileTuning) {
        self.vel = Point::new(vel_x, 0.0);
        self.enter(ProjectileState::Throwed, Motion::Arc(KinematicArc::new(tuning.throw_arc)));
    }

    /// Straight down at a constant small speed, out of every collision.
    pub fn drop_down(&mut self, tuning: &ProjectileTuning) {
        if self.state == ProjectileState::Dropped {
            return;
        }
        self.vel = Point::new(0.0, tuning.drop_speed);
        self.enter(ProjectileState::Dropped, Motion::Fall);
    }

    /// Bounces away from whatever it hit and stops colliding.
    pub fn bounce(&mut self, away: Direction, tuning: &ProjectileTuning) {
        self.vel = Point::new(away.sign() * tuning.bounce_speed, 0.0);
        self.enter(ProjectileState::Collided, Motion::Arc(KinematicArc::new(tuning.bounce_arc)));
    }

    fn bounce_direction(&self, side: Side) -> Direction {
        match side {
            Side::East => Direction::Left,
            Side::West => Direction::Right,
            Side::North | Side::South => {
                if self.vel.x > 0.0 {
                    Direction::Left
                } else {
                    Direction::Right
                }
            }
        }
    }

    pub fn update(&mut self, frame: &mut Frame<'_>, collisions: &[Collision]) -> Result<(), GameError> {
        let config = frame.config;
        let tuning = &config.projectile;

        for c in collisions {
            let hit = match (self.state, c.kind) {
                (ProjectileState::Flying, EntityKind::Player) => c.side.is_horizontal(),
                (ProjectileState::Throwed, EntityKind::Boss) => true,
                _ => false,
            };
            if hit {
                let away = self.bounce_direction(c.side);
                self.bounce(away, tuning);
                break;
            }
        }

        match &mut self.motion {
            Motion::Drift => {
                self.pos.x += self.vel.x;
            }
            Motion::Held => {}
            Motion::Arc(arc) => {
                self.vel.y = arc.step();
                self.pos.x += self.vel.x;
                self.pos.y += self.vel.y;
            }
            Motion::Fall => {
                self.pos.y += self.vel.y;
            }
        }

        if self.state.is_terminal() {
            self.terminal_ticks += 1;
        }

        self.appearance = Some(frame.appearances.get(self.kind.appearance_key())?);
        Ok(())
    }

    /// Whether the projectile should be taken out of the world.
    pub fn is_expired(&self, world_width: f32, world_height: f32, ttl_ticks: u32) -> bool {
        let w = PROJECTILE_BOX.w;
        let off_sides = self.pos.x < -w || self.pos.x > world_width;
        match self.state {
            ProjectileState::Flying => off_sides,
            ProjectileState::PickedUp => false,
            ProjectileState::Throwed => off_sides || self.pos.y > world_height,
            ProjectileState::Collided | ProjectileState::Dropped => {
                off_sides || self.pos.y > world_height || self.terminal_ticks >= ttl_ticks
            }
        }
    }
}

impl Entity for Projectile {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Projectile(self.state)
    }

    fn pos(&self) -> Point {
        self.pos
    }

    fn collision_box(&self) -> CollisionBox {
        PROJECTILE_BOX.at(self.pos)
    }

    fn is_collidable(&self) -> bool {
        self.state.is_collidable()
    }

    fn appearance(&self) -> Option<&AppearanceHandle> {
        self.appearance.as_ref()
    }
}
