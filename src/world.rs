//! The entity arena: everything that exists in a match, plus the context
//! handed to entity updates while a tick runs.

use crate::assets::AppearanceRegistry;
use crate::boss::Boss;
use crate::collision::{contacts_of, Body, CollisionMap};
use crate::config::MatchConfig;
use crate::entities::{
    Collision, CollisionBox, Direction, Entity, EntityId, Platform, Point, ProjectileView,
};
use crate::error::GameError;
use crate::events::{EventBuffer, FrameEvent};
use crate::match_phase::{MatchClock, MatchPhase};
use crate::player::{Movement, Player};
use crate::projectile::{Projectile, ProjectileKind, ProjectileState};
use crate::random::RandomSource;

/// Changes an entity asks the world to make on its behalf. Applied once the
/// characters have finished updating.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WorldRequest {
    Spawn { kind: ProjectileKind, pos: Point, heading: Direction },
    PickUp { id: EntityId },
    Carry { id: EntityId, pos: Point },
}

/// What an entity may read and write during its update.
pub struct Frame<'a> {
    pub elapsed_ms: f32,
    pub phase: MatchPhase,
    pub config: &'a MatchConfig,
    pub appearances: &'a dyn AppearanceRegistry,
    /// Projectiles as they were before anything moved this tick.
    pub projectiles: &'a [ProjectileView],
    pub events: &'a mut EventBuffer,
    pub requests: &'a mut Vec<WorldRequest>,
}

pub struct World {
    pub config: MatchConfig,
    pub player: Player,
    pub boss: Boss,
    pub platforms: Vec<Platform>,
    pub projectiles: Vec<Projectile>,
    pub events: EventBuffer,
    pub rng: Box<dyn RandomSource>,
    /// Ticks since the world was created.
    pub frame: u64,
    clock: MatchClock,
    next_id: u32,
}

impl World {
    pub fn new(config: MatchConfig, rng: Box<dyn RandomSource>) -> Self {
        let player = Player::new(EntityId(1), &config);
        let boss = Boss::new(EntityId(2), &config);
        let mut next_id = 3;
        let platforms = config
            .world
            .platforms
            .iter()
            .map(|p| {
                let id = EntityId(next_id);
                next_id += 1;
                Platform::new(id, Point::new(p.x, p.y), p.w, p.h)
            })
            .collect();

        World {
            config,
            player,
            boss,
            platforms,
            projectiles: Vec::new(),
            events: EventBuffer::default(),
            rng,
            frame: 0,
            clock: MatchClock::new(),
            next_id,
        }
    }

    pub fn phase(&self) -> MatchPhase {
        self.clock.phase()
    }

    pub fn clock(&self) -> &MatchClock {
        &self.clock
    }

    pub(crate) fn clock_mut(&mut self) -> &mut MatchClock {
        &mut self.clock
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    // ── Snapshots ─────────────────────────────────────────────────────────────

    /// Collision snapshot of every collidable entity, in world-list order.
    pub fn bodies(&self) -> Vec<Body> {
        let mut bodies = vec![body_of(&self.player), body_of(&self.boss)];
        bodies.extend(self.platforms.iter().map(body_of));
        bodies.extend(
            self.projectiles
                .iter()
                .filter(|p| p.is_collidable())
                .map(body_of),
        );
        bodies
    }

    pub fn projectile_views(&self) -> Vec<ProjectileView> {
        self.projectiles.iter().map(Projectile::view).collect()
    }

    // ── Lookups ───────────────────────────────────────────────────────────────

    pub fn projectile(&self, id: EntityId) -> Result<&Projectile, GameError> {
        self.projectiles
            .iter()
            .find(|p| p.id == id)
            .ok_or(GameError::UnknownEntity(id))
    }

    pub fn projectile_mut(&mut self, id: EntityId) -> Result<&mut Projectile, GameError> {
        self.projectiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(GameError::UnknownEntity(id))
    }

    /// The platform the player's decisions are made against.
    pub fn platform_box(&self) -> Result<CollisionBox, GameError> {
        self.platforms
            .first()
            .map(Platform::collision_box)
            .ok_or(GameError::MissingPlatform)
    }

    // ── Projectiles ───────────────────────────────────────────────────────────

    pub fn spawn_projectile(&mut self, kind: ProjectileKind, pos: Point, heading: Direction) -> EntityId {
        let id = self.allocate_id();
        self.projectiles
            .push(Projectile::flying(id, kind, pos, heading, &self.config.projectile));
        log::debug!("spawned {kind:?} {id} at ({:.0}, {:.0})", pos.x, pos.y);
        self.events.push(FrameEvent::ProjectileSpawned { id });
        id
    }

    pub fn apply_request(&mut self, request: WorldRequest) -> Result<(), GameError> {
        match request {
            WorldRequest::Spawn { kind, pos, heading } => {
                self.spawn_projectile(kind, pos, heading);
            }
            WorldRequest::PickUp { id } => self.projectile_mut(id)?.pick_up(),
            WorldRequest::Carry { id, pos } => self.projectile_mut(id)?.carry_to(pos),
        }
        Ok(())
    }

    /// Removes projectiles that left the world or outlived their terminal
    /// state.
    pub fn remove_expired(&mut self) {
        let w = &self.config.world;
        let ttl = self.config.projectile.terminal_ttl_ticks;
        let (width, height) = (w.width, w.height);
        let events = &mut self.events;
        self.projectiles.retain(|p| {
            let expired = p.is_expired(width, height, ttl);
            if expired {
                log::debug!("removed projectile {} ({:?})", p.id, p.state());
                events.push(FrameEvent::ProjectileRemoved { id: p.id });
            }
            !expired
        });
    }

    /// Every projectile still in play falls out of the fight.
    pub fn drop_loose_projectiles(&mut self) {
        let tuning = &self.config.projectile;
        for p in &mut self.projectiles {
            if matches!(
                p.state(),
                ProjectileState::Flying | ProjectileState::PickedUp | ProjectileState::Throwed
            ) {
                p.drop_down(tuning);
            }
        }
    }

    // ── Player actions shared by every controller ─────────────────────────────

    pub fn set_player_movement(&mut self, next: Movement) {
        self.player.set_movement(next, &mut self.events);
    }

    /// Walks toward `direction`, keeping the walk cycle if already walking.
    pub fn walk_player(&mut self, direction: Direction) {
        if !self.player.movement().is_walking() {
            self.set_player_movement(Movement::walking(&self.config.player));
        }
        self.player.direction = direction;
    }

    pub fn jump_player(&mut self, direction: Direction) {
        self.set_player_movement(Movement::jumping(&self.config.player));
        self.player.direction = direction;
    }

    /// Starts lifting the projectile the player stands on. `false` if there
    /// is nothing to lift.
    pub fn begin_pick_up(&mut self) -> Result<bool, GameError> {
        match self.player.begin_pick_up(&mut self.events, &self.config.player) {
            Some(id) => {
                self.projectile_mut(id)?.pick_up();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn throw_held_item(&mut self) -> Result<(), GameError> {
        let (id, vel_x) = self.player.throw_item(&mut self.events, &self.config.player)?;
        let tuning = &self.config.projectile;
        let projectile = self
            .projectiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(GameError::UnknownEntity(id))?;
        projectile.throw(vel_x, tuning);
        Ok(())
    }

    pub fn drop_held_item(&mut self) -> Result<(), GameError> {
        let id = self.player.drop_item()?;
        let tuning = &self.config.projectile;
        let projectile = self
            .projectiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(GameError::UnknownEntity(id))?;
        projectile.drop_down(tuning);
        Ok(())
    }

    // ── Per-tick stepping ─────────────────────────────────────────────────────

    /// Runs every entity update for one tick: characters first, then the
    /// requests they made, then projectiles.
    pub fn step_entities(
        &mut self,
        elapsed_ms: f32,
        appearances: &dyn AppearanceRegistry,
        views: &[ProjectileView],
        collisions: &CollisionMap,
    ) -> Result<(), GameError> {
        let phase = self.phase();
        let mut requests = Vec::new();

        let mut frame = Frame {
            elapsed_ms,
            phase,
            config: &self.config,
            appearances,
            projectiles: views,
            events: &mut self.events,
            requests: &mut requests,
        };
        self.boss.update(&mut frame)?;
        self.player.update(&mut frame)?;

        let (spawns, carries): (Vec<_>, Vec<_>) = requests
            .into_iter()
            .partition(|r| matches!(r, WorldRequest::Spawn { .. }));
        for request in carries {
            self.apply_request(request)?;
        }

        let mut unused = Vec::new();
        let mut frame = Frame {
            elapsed_ms,
            phase,
            config: &self.config,
            appearances,
            projectiles: views,
            events: &mut self.events,
            requests: &mut unused,
        };
        let fighting = phase == MatchPhase::Fighting;
        for projectile in &mut self.projectiles {
            let contacts: &[Collision] = if fighting { contacts_of(collisions, projectile.id) } else { &[] };
            projectile.update(&mut frame, contacts)?;
        }

        for request in spawns {
            self.apply_request(request)?;
        }
        self.remove_expired();

        for platform in &mut self.platforms {
            if platform.appearance().is_none() {
                platform.set_appearance(appearances.get("platform")?);
            }
        }
        Ok(())
    }

    // ── Match flow ────────────────────────────────────────────────────────────

    /// Switches the match phase and applies what the new phase implies for
    /// the combatants.
    pub fn enter_phase(&mut self, next: MatchPhase) -> Result<(), GameError> {
        if self.clock.phase() == next {
            return Ok(());
        }
        let from = self.clock.enter(next);
        log::info!("match {from} -> {next}");
        self.events.push(FrameEvent::PhaseChanged { from, to: next });

        if from == MatchPhase::Fighting {
            if self.player.is_holding_item() {
                self.drop_held_item()?;
            }
            self.drop_loose_projectiles();
        }

        match next {
            MatchPhase::Intro | MatchPhase::Pause => {
                self.player.reset(&self.config);
                self.boss.reset(&self.config, next == MatchPhase::Intro);
            }
            MatchPhase::Fighting => {}
            MatchPhase::PlayerWon => {
                self.boss.die(&self.config);
                self.player.win();
            }
            MatchPhase::BossWon => {
                self.player.die(&self.config.player);
                self.boss.win();
            }
        }
        Ok(())
    }
}

fn body_of(entity: &impl Entity) -> Body {
    Body { id: entity.id(), kind: entity.kind(), bbox: entity.collision_box() }
}
