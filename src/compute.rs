/// Game-logic entry points.
///
/// `tick` advances a whole match by one frame. Everything it needs from the
/// outside world comes in as arguments: the elapsed time, the sprite registry
/// and the audio sink. Randomness lives in the world and can be seeded.

use crate::assets::{AppearanceRegistry, AudioPlayer};
use crate::brain::PlayerBrain;
use crate::collision::{contacts_of, resolve};
use crate::config::MatchConfig;
use crate::entities::Direction;
use crate::error::GameError;
use crate::events::FrameEvent;
use crate::match_phase::{outcome, MatchPhase};
use crate::player::Movement;
use crate::random::RandomSource;
use crate::world::World;

/// Who decides what the player does.
pub enum Controller {
    Ai(PlayerBrain),
    Human,
}

/// Buttons held during the current frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub pick: bool,
    pub throw: bool,
}

pub struct Game {
    pub world: World,
    pub controller: Controller,
    /// Read by the human controller on the next tick.
    pub input: PlayerInput,
}

impl Game {
    /// Pauses the match after a boss win; this restarts it.
    pub fn resume(&mut self) -> Result<bool, GameError> {
        if self.world.phase() != MatchPhase::Pause {
            return Ok(false);
        }
        self.world.enter_phase(MatchPhase::Intro)?;
        Ok(true)
    }

    pub fn phase(&self) -> MatchPhase {
        self.world.phase()
    }
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// A match in INTRO with the player driven by the decision tree.
pub fn init_ai_game(config: MatchConfig, rng: Box<dyn RandomSource>) -> Game {
    Game {
        world: World::new(config, rng),
        controller: Controller::Ai(PlayerBrain::new()),
        input: PlayerInput::default(),
    }
}

/// A match in INTRO with the player driven by [`PlayerInput`].
pub fn init_human_game(config: MatchConfig, rng: Box<dyn RandomSource>) -> Game {
    Game {
        world: World::new(config, rng),
        controller: Controller::Human,
        input: PlayerInput::default(),
    }
}

// ── Human control ────────────────────────────────────────────────────────────

/// Maps held buttons onto the same world actions the decision tree uses.
pub fn apply_input(world: &mut World, input: PlayerInput) -> Result<(), GameError> {
    if input.throw && world.player.is_holding_item() {
        world.throw_held_item()?;
    }
    if world.player.movement().is_blocking() {
        return Ok(());
    }

    let heading = match (input.left, input.right) {
        (true, false) => Some(Direction::Left),
        (false, true) => Some(Direction::Right),
        _ => None,
    };

    if input.jump {
        let direction = heading.unwrap_or(world.player.direction);
        world.jump_player(direction);
        return Ok(());
    }
    if input.pick && world.begin_pick_up()? {
        return Ok(());
    }
    match heading {
        Some(direction) => world.walk_player(direction),
        None if world.player.movement().is_walking() => world.set_player_movement(Movement::Idle),
        None => {}
    }
    Ok(())
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the match by one frame of `elapsed_ms` simulated milliseconds.
///
/// Order matters: collisions are resolved on a snapshot taken before
/// anything moves, consequences and decisions are applied to that snapshot,
/// then entities move. Win and loss are decided on the same tick as the hit
/// that caused them.
pub fn tick(
    game: &mut Game,
    elapsed_ms: f32,
    appearances: &dyn AppearanceRegistry,
    audio: &mut dyn AudioPlayer,
) -> Result<Vec<FrameEvent>, GameError> {
    let world = &mut game.world;
    world.frame += 1;
    log::trace!(
        "tick {} ({:.1} ms, {}, {} projectiles)",
        world.frame,
        elapsed_ms,
        world.phase(),
        world.projectiles.len()
    );

    // ── 1. Timed phase changes ───────────────────────────────────────────────
    let timings = world.config.timing.clone();
    if let Some(next) = world.clock_mut().advance(elapsed_ms, &timings) {
        world.enter_phase(next)?;
    }
    let fighting = world.phase() == MatchPhase::Fighting;

    // ── 2. Snapshot ──────────────────────────────────────────────────────────
    let collisions = resolve(&world.bodies());
    let views = world.projectile_views();

    // ── 3. Collision consequences & decisions ────────────────────────────────
    if fighting {
        let player_id = world.player.id;
        let boss_id = world.boss.id;
        world
            .player
            .react(contacts_of(&collisions, player_id), &mut world.events, &world.config);
        world
            .boss
            .react(contacts_of(&collisions, boss_id), &mut world.events, &world.config);

        match &game.controller {
            Controller::Ai(brain) => {
                brain.evaluate(world)?;
            }
            Controller::Human => apply_input(world, game.input)?,
        }
    }

    // ── 4. Movement ──────────────────────────────────────────────────────────
    world.step_entities(elapsed_ms, appearances, &views, &collisions)?;

    // ── 5. Outcome ───────────────────────────────────────────────────────────
    if fighting {
        if let Some(result) = outcome(world.player.lives, world.boss.lives) {
            world.enter_phase(result)?;
        }
    }

    // ── 6. Loser left the screen ─────────────────────────────────────────────
    let fell = world
        .events
        .iter()
        .any(|e| matches!(e, FrameEvent::FellOffScreen { .. }));
    if fell {
        if let Some(next) = world.phase().after_outcome() {
            world.enter_phase(next)?;
        }
    }

    // ── 7. Flush ─────────────────────────────────────────────────────────────
    let events = world.events.drain();
    for event in &events {
        if let FrameEvent::Sound { key } = event {
            audio.play(key, false);
        }
    }
    Ok(events)
}
