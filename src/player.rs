//! The player character.
//!
//! Four independent axes advance every tick, in this order:
//! movement, standing-on, item, damage. Each axis reports at most one
//! transition; transitions are applied only after all four have run, so no
//! axis sees another axis half-updated.

use crate::assets::AppearanceHandle;
use crate::character::{Damaged, DyingFall};
use crate::config::{MatchConfig, PlayerTuning};
use crate::entities::{
    BoxShape, Collision, CollisionBox, Direction, Entity, EntityId, EntityKind, Point,
    ProjectileView, Side,
};
use crate::error::GameError;
use crate::events::{EventBuffer, FrameEvent};
use crate::motion::{Cadence, KinematicArc, Timer};
use crate::world::{Frame, WorldRequest};

pub const PLAYER_BOX: BoxShape = BoxShape::new(8.0, 16.0, 20.0, 32.0);

/// Where a held item sits relative to the player's position.
const HOLD_OFFSET_X: f32 = 8.0;

// ── Axes ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Movement {
    Idle,
    Walking { step: u8, cadence: Cadence },
    Jumping(KinematicArc),
    Falling(KinematicArc),
    Picking(Timer),
    Dying(DyingFall),
    Winning,
}

impl Movement {
    pub fn walking(tuning: &PlayerTuning) -> Self {
        Movement::Walking { step: 0, cadence: Cadence::new(tuning.walk_frame_ms) }
    }

    pub fn jumping(tuning: &PlayerTuning) -> Self {
        Movement::Jumping(KinematicArc::new(tuning.jump))
    }

    pub fn falling(tuning: &PlayerTuning) -> Self {
        Movement::Falling(KinematicArc::falling(tuning.fall_gravity))
    }

    pub fn picking(tuning: &PlayerTuning) -> Self {
        Movement::Picking(Timer::new(tuning.pick_ms))
    }

    pub fn dying(tuning: &PlayerTuning) -> Self {
        Movement::Dying(DyingFall::new(tuning.dying_gravity))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Movement::Idle => "idle",
            Movement::Walking { .. } => "walking",
            Movement::Jumping(_) => "jumping",
            Movement::Falling(_) => "falling",
            Movement::Picking(_) => "picking",
            Movement::Dying(_) => "dying",
            Movement::Winning => "winning",
        }
    }

    pub fn is_walking(&self) -> bool {
        matches!(self, Movement::Walking { .. })
    }

    pub fn is_airborne(&self) -> bool {
        matches!(self, Movement::Jumping(_) | Movement::Falling(_))
    }

    /// States the decision layer has to let run to completion.
    pub fn is_blocking(&self) -> bool {
        matches!(self, Movement::Jumping(_) | Movement::Falling(_) | Movement::Picking(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ItemState {
    /// Carried overhead. `lift` bobs between -1 and +1 while walking.
    Holding { projectile: EntityId, lift: f32, bob: Cadence },
    /// Throw pose; the projectile is already on its way.
    Throwing { projectile: EntityId, pose: Timer },
}

impl ItemState {
    fn holding(projectile: EntityId, tuning: &PlayerTuning) -> Self {
        ItemState::Holding { projectile, lift: 1.0, bob: Cadence::new(tuning.walk_frame_ms) }
    }

    pub fn projectile(&self) -> EntityId {
        match self {
            ItemState::Holding { projectile, .. } | ItemState::Throwing { projectile, .. } => {
                *projectile
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum AxisTransition {
    Movement(Movement),
    FinishPickUp,
    ClearItem,
    ClearDamage,
    LostFooting,
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub id: EntityId,
    pub pos: Point,
    pub vel: Point,
    pub direction: Direction,
    pub lives: u32,
    /// Ticks since the decision layer last changed movement.
    pub decision_frames: u32,
    movement: Movement,
    item: Option<ItemState>,
    damage: Option<Damaged>,
    standing_on: Option<EntityId>,
    on_platform: bool,
    appearance: Option<AppearanceHandle>,
}

impl Player {
    pub fn new(id: EntityId, config: &MatchConfig) -> Self {
        Player {
            id,
            pos: Self::start(config),
            vel: Point::ZERO,
            direction: Direction::Right,
            lives: config.player.lives,
            decision_frames: 0,
            movement: Movement::Idle,
            item: None,
            damage: None,
            standing_on: None,
            on_platform: false,
            appearance: None,
        }
    }

    fn start(config: &MatchConfig) -> Point {
        Point::new(config.player.start_x, config.ground_top(PLAYER_BOX.foot()))
    }

    /// Back to the start line with full lives and every axis cleared.
    pub fn reset(&mut self, config: &MatchConfig) {
        *self = Player { appearance: self.appearance.take(), ..Player::new(self.id, config) };
    }

    pub fn movement(&self) -> &Movement {
        &self.movement
    }

    pub fn item(&self) -> Option<&ItemState> {
        self.item.as_ref()
    }

    pub fn damage(&self) -> Option<&Damaged> {
        self.damage.as_ref()
    }

    pub fn standing_on(&self) -> Option<EntityId> {
        self.standing_on
    }

    pub fn is_on_platform(&self) -> bool {
        self.on_platform
    }

    pub fn is_holding_item(&self) -> bool {
        matches!(self.item, Some(ItemState::Holding { .. }))
    }

    pub fn held_projectile(&self) -> Option<EntityId> {
        match self.item {
            Some(ItemState::Holding { projectile, .. }) => Some(projectile),
            _ => None,
        }
    }

    /// The projectile on the item axis, held or just thrown.
    fn owns(&self, id: EntityId) -> bool {
        self.item.map_or(false, |item| item.projectile() == id)
    }

    fn switch_movement(&mut self, next: Movement) {
        log::debug!("player {} -> {}", self.movement.name(), next.name());
        self.movement = next;
    }

    /// Movement change requested by a controller. Restarts the decision
    /// counter and emits the cue that goes with the new state.
    pub fn set_movement(&mut self, next: Movement, events: &mut EventBuffer) {
        match next {
            Movement::Jumping(_) => events.sound("mario-jump"),
            Movement::Picking(_) => events.sound("mario-picking"),
            _ => {}
        }
        self.decision_frames = 0;
        self.switch_movement(next);
    }

    /// Starts lifting the projectile underfoot, if any. Returns its id so the
    /// world can freeze it.
    pub fn begin_pick_up(&mut self, events: &mut EventBuffer, tuning: &PlayerTuning) -> Option<EntityId> {
        let id = self.standing_on?;
        if self.item.is_some() {
            return None;
        }
        self.set_movement(Movement::picking(tuning), events);
        Some(id)
    }

    /// Releases the held item forward. Returns the projectile and the
    /// horizontal speed it should be launched with.
    pub fn throw_item(
        &mut self,
        events: &mut EventBuffer,
        tuning: &PlayerTuning,
    ) -> Result<(EntityId, f32), GameError> {
        let id = self.held_projectile().ok_or(GameError::NotHoldingItem)?;
        let speed = if self.on_platform { tuning.throw_speed_platform } else { tuning.throw_speed_ground };
        self.item = Some(ItemState::Throwing { projectile: id, pose: Timer::new(tuning.throw_pose_ms) });
        events.sound("mario-throw");
        Ok((id, self.direction.sign() * speed))
    }

    /// Lets go of the held item without throwing it.
    pub fn drop_item(&mut self) -> Result<EntityId, GameError> {
        let id = self.held_projectile().ok_or(GameError::NotHoldingItem)?;
        self.item = None;
        Ok(id)
    }

    pub fn die(&mut self, tuning: &PlayerTuning) {
        self.standing_on = None;
        self.on_platform = false;
        self.switch_movement(Movement::dying(tuning));
    }

    pub fn win(&mut self) {
        self.standing_on = None;
        self.vel = Point::ZERO;
        self.switch_movement(Movement::Winning);
    }

    fn take_hit(&mut self, events: &mut EventBuffer, tuning: &PlayerTuning) {
        if self.damage.is_some() || self.lives == 0 {
            return;
        }
        self.lives = self.lives.saturating_sub(1);
        self.damage = Some(Damaged::new(tuning.damage_ms));
        log::debug!("player hit, {} lives left", self.lives);
        events.sound("mario-ouch");
        events.push(FrameEvent::PlayerDamaged { lives: self.lives });
    }

    fn land_on(&mut self, surface: &CollisionBox) {
        self.pos.y = surface.y - PLAYER_BOX.foot() + 1.0;
        self.vel.y = 0.0;
        if self.movement.is_airborne() {
            self.switch_movement(Movement::Idle);
        }
    }

    /// Applies this tick's contacts. Only called while the fight is on.
    pub fn react(&mut self, collisions: &[Collision], events: &mut EventBuffer, config: &MatchConfig) {
        let tuning = &config.player;
        let mut on_projectile = false;
        let mut on_platform = false;

        for c in collisions {
            match c.kind {
                EntityKind::Projectile(_) if self.owns(c.other) => {}
                EntityKind::Projectile(state) if c.side == Side::South && state.is_landable() => {
                    on_projectile = true;
                    if self.standing_on != Some(c.other) {
                        self.standing_on = Some(c.other);
                        self.land_on(&c.other_box);
                    }
                }
                EntityKind::Platform => {
                    // Platforms are one-way: only landing from above counts.
                    if c.side == Side::South && self.vel.y >= 0.0 {
                        on_platform = true;
                        if !self.on_platform {
                            self.on_platform = true;
                            self.land_on(&c.other_box);
                        }
                    }
                }
                _ => self.take_hit(events, tuning),
            }
        }

        if self.on_platform && !on_platform {
            self.on_platform = false;
            self.lose_footing(tuning);
        }
        if self.standing_on.is_some() && !on_projectile {
            self.standing_on = None;
            self.lose_footing(tuning);
        }
    }

    /// Support gone. Idle falls too, not only Walking, so a rider never
    /// hovers after its projectile leaves.
    fn lose_footing(&mut self, tuning: &PlayerTuning) {
        if matches!(self.movement, Movement::Idle | Movement::Walking { .. }) {
            self.switch_movement(Movement::falling(tuning));
        }
    }

    pub fn update(&mut self, frame: &mut Frame<'_>) -> Result<(), GameError> {
        let transitions = [
            self.update_movement(frame),
            self.update_standing(frame.projectiles),
            self.update_item(frame),
            self.update_damage(frame.elapsed_ms),
        ];
        for transition in transitions.into_iter().flatten() {
            self.apply(transition, frame);
        }

        if !matches!(self.movement, Movement::Dying(_)) {
            let max_x = frame.config.world.width - PLAYER_BOX.dx - PLAYER_BOX.w;
            self.pos.x = self.pos.x.clamp(-PLAYER_BOX.dx, max_x);
        }

        self.appearance = Some(frame.appearances.get(&self.appearance_key())?);
        Ok(())
    }

    fn update_movement(&mut self, frame: &mut Frame<'_>) -> Option<AxisTransition> {
        let config = frame.config;
        let tuning = &config.player;
        let ground = config.ground_top(PLAYER_BOX.foot());

        match &mut self.movement {
            Movement::Idle | Movement::Winning => {
                self.vel = Point::ZERO;
                None
            }
            Movement::Walking { step, cadence } => {
                self.vel = Point::new(self.direction.sign() * tuning.walk_speed, 0.0);
                self.pos.x += self.vel.x;
                if cadence.advance(frame.elapsed_ms) {
                    *step = (*step + 1) % 4;
                }
                None
            }
            Movement::Jumping(arc) => {
                self.vel.x = self.direction.sign() * tuning.jump_speed_x;
                self.vel.y = arc.step();
                self.pos.x += self.vel.x;
                let next_y = self.pos.y + self.vel.y;
                if next_y > ground {
                    self.pos.y = ground;
                    self.vel.y = 0.0;
                    Some(AxisTransition::Movement(Movement::Idle))
                } else {
                    self.pos.y = next_y;
                    None
                }
            }
            Movement::Falling(arc) => {
                self.vel.y = arc.step();
                self.pos.x += self.vel.x;
                let next_y = self.pos.y + self.vel.y;
                if next_y > ground {
                    self.pos.y = ground;
                    self.vel.y = 0.0;
                    Some(AxisTransition::Movement(Movement::walking(tuning)))
                } else {
                    self.pos.y = next_y;
                    None
                }
            }
            Movement::Picking(timer) => {
                self.vel = Point::ZERO;
                if !timer.advance(frame.elapsed_ms) {
                    return None;
                }
                if self.standing_on.is_some() {
                    Some(AxisTransition::FinishPickUp)
                } else {
                    Some(AxisTransition::Movement(Movement::falling(tuning)))
                }
            }
            Movement::Dying(fall) => {
                let drift = -tuning.dying_speed_x;
                if fall.step(&mut self.pos, &mut self.vel, drift, config.world.fall_off_y) {
                    frame.events.push(FrameEvent::FellOffScreen { who: EntityKind::Player });
                }
                None
            }
        }
    }

    /// Rides along with the projectile underfoot.
    fn update_standing(&mut self, views: &[ProjectileView]) -> Option<AxisTransition> {
        let id = self.standing_on?;
        match views.iter().find(|v| v.id == id) {
            Some(view) => {
                self.pos.x += view.vel.x;
                self.pos.y += view.vel.y;
                None
            }
            None => Some(AxisTransition::LostFooting),
        }
    }

    fn update_item(&mut self, frame: &mut Frame<'_>) -> Option<AxisTransition> {
        match self.item.as_mut()? {
            ItemState::Holding { projectile, lift, bob } => {
                match self.movement {
                    Movement::Walking { .. } => {
                        if bob.advance(frame.elapsed_ms) {
                            *lift = -*lift;
                        }
                    }
                    Movement::Jumping(_) => {
                        *lift = -1.0;
                        bob.reset();
                    }
                    _ => {
                        *lift = 1.0;
                        bob.reset();
                    }
                }
                frame.requests.push(WorldRequest::Carry {
                    id: *projectile,
                    pos: self.pos.offset(HOLD_OFFSET_X, *lift),
                });
                None
            }
            ItemState::Throwing { pose, .. } => {
                pose.advance(frame.elapsed_ms).then_some(AxisTransition::ClearItem)
            }
        }
    }

    fn update_damage(&mut self, elapsed_ms: f32) -> Option<AxisTransition> {
        let damaged = self.damage.as_mut()?;
        damaged.update(elapsed_ms).then_some(AxisTransition::ClearDamage)
    }

    fn apply(&mut self, transition: AxisTransition, frame: &mut Frame<'_>) {
        let config = frame.config;
        let tuning = &config.player;
        match transition {
            AxisTransition::Movement(next) => self.switch_movement(next),
            AxisTransition::FinishPickUp => {
                if let Some(id) = self.standing_on.take() {
                    self.item = Some(ItemState::holding(id, tuning));
                    frame.requests.push(WorldRequest::PickUp { id });
                    frame.events.sound("mario-picked");
                }
                self.switch_movement(Movement::falling(tuning));
            }
            AxisTransition::ClearItem => self.item = None,
            AxisTransition::ClearDamage => self.damage = None,
            AxisTransition::LostFooting => {
                self.standing_on = None;
                self.lose_footing(tuning);
            }
        }
    }

    /// Sprite key for the current combination of axes.
    pub fn appearance_key(&self) -> String {
        let dir = self.direction.as_str();
        let hurt = if self.damage.map_or(false, |d| d.flicker_on()) { "-damage" } else { "" };

        match &self.movement {
            Movement::Dying(fall) => {
                format!("dead-{dir}{}", if fall.flicker_on() { "-damage" } else { "" })
            }
            Movement::Winning => "winning".to_string(),
            Movement::Picking(_) => format!("lift{hurt}"),
            _ if matches!(self.item, Some(ItemState::Throwing { .. })) => format!("throw-{dir}"),
            movement => {
                let hold = if self.is_holding_item() { "-holding-item" } else { "" };
                let step = match movement {
                    Movement::Walking { step, .. } => step + 1,
                    Movement::Jumping(_) | Movement::Falling(_) => 2,
                    _ => 1,
                };
                format!("walk-{dir}{hold}{hurt}{step}")
            }
        }
    }
}

impl Entity for Player {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Player
    }

    fn pos(&self) -> Point {
        self.pos
    }

    fn collision_box(&self) -> CollisionBox {
        PLAYER_BOX.at(self.pos)
    }

    fn appearance(&self) -> Option<&AppearanceHandle> {
        self.appearance.as_ref()
    }
}
