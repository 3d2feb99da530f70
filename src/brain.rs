//! The computer-controlled player.
//!
//! Holding an item, the player heads for the boss and throws once close
//! enough. Empty-handed, it waits for a projectile to ride, lifts it, and
//! uses the platform as a vantage point. Leaves act directly on the
//! [`World`]; see [`crate::behaviour`] for the evaluation rules.

use crate::behaviour::Node;
use crate::entities::{Direction, Entity};
use crate::error::GameError;
use crate::player::Movement;
use crate::projectile::ProjectileState;
use crate::world::World;

type Brain = Node<World, GameError>;

/// How far ahead, in pixels, a flying projectile can be to jump onto it.
const EGG_JUMP_RANGE: f32 = 25.0;

pub struct PlayerBrain {
    root: Brain,
}

impl PlayerBrain {
    pub fn new() -> Self {
        PlayerBrain { root: build() }
    }

    /// Runs one decision. `Ok(false)` means nothing applied this tick.
    pub fn evaluate(&self, world: &mut World) -> Result<bool, GameError> {
        world.player.decision_frames += 1;
        let applied = self.root.evaluate(world)?;
        if !applied {
            log::trace!("brain: no action ({})", world.player.movement().name());
        }
        Ok(applied)
    }
}

impl Default for PlayerBrain {
    fn default() -> Self {
        Self::new()
    }
}

fn build() -> Brain {
    Node::or(vec![
        // Jumps, falls and lifts always run to completion.
        Node::leaf(|w: &mut World| w.player.movement().is_blocking()),
        Node::and(vec![Node::leaf(|w: &mut World| w.player.is_holding_item()), attack()]),
        Node::and(vec![Node::leaf(|w: &mut World| !w.player.is_holding_item()), forage()]),
    ])
}

/// Carry the held item to the boss.
fn attack() -> Brain {
    Node::or(vec![
        Node::and(vec![
            Node::leaf(|w: &mut World| boss_ahead_within(w, 50.0)),
            Node::try_leaf(|w: &mut World| {
                w.throw_held_item()?;
                w.player.direction = Direction::Left;
                Ok(true)
            }),
        ]),
        Node::and(vec![
            Node::leaf(|w: &mut World| w.player.is_on_platform()),
            Node::or(vec![
                edge_hops(),
                Node::and(vec![frames_over(50), wander()]),
                Node::succeed(),
            ]),
        ]),
        Node::and(vec![
            Node::try_leaf(|w: &mut World| platform_ahead_within(w, 5.0)),
            chance_over(0.75),
            jump(Direction::Right),
        ]),
        Node::and(vec![
            Node::leaf(can_jump_onto_projectile),
            chance_over(0.75),
            jump(Direction::Right),
        ]),
        Node::leaf(|w: &mut World| {
            w.walk_player(Direction::Right);
            true
        }),
    ])
}

/// Get hold of something to throw.
fn forage() -> Brain {
    Node::or(vec![
        Node::and(vec![
            Node::leaf(|w: &mut World| w.player.standing_on().is_some()),
            Node::or(vec![
                Node::and(vec![
                    frames_over(25),
                    Node::try_leaf(|w: &mut World| w.begin_pick_up()),
                ]),
                Node::succeed(),
            ]),
        ]),
        Node::and(vec![
            Node::leaf(|w: &mut World| w.player.is_on_platform()),
            Node::or(vec![
                Node::and(vec![
                    Node::try_leaf(near_left_edge),
                    jump(Direction::Left),
                ]),
                Node::and(vec![
                    Node::try_leaf(near_right_edge),
                    Node::or(vec![
                        Node::and(vec![
                            Node::leaf(|w: &mut World| !boss_ahead_within(w, 75.0)),
                            jump(Direction::Right),
                        ]),
                        Node::leaf(|w: &mut World| {
                            w.set_player_movement(Movement::walking(&w.config.player));
                            w.player.direction = Direction::Left;
                            true
                        }),
                    ]),
                ]),
                Node::and(vec![frames_at_least(50), wander()]),
                Node::succeed(),
            ]),
        ]),
        Node::and(vec![Node::leaf(can_jump_onto_projectile), jump(Direction::Right)]),
        Node::and(vec![
            Node::leaf(|w: &mut World| boss_ahead_within(w, 20.0)),
            Node::leaf(|w: &mut World| {
                w.walk_player(Direction::Left);
                true
            }),
        ]),
        Node::and(vec![
            Node::try_leaf(|w: &mut World| platform_ahead_within(w, 5.0)),
            Node::or(vec![
                Node::and(vec![chance_over(0.5), jump(Direction::Right)]),
                Node::succeed(),
            ]),
        ]),
        Node::and(vec![
            frames_at_least(100),
            Node::leaf(|w: &mut World| {
                toggle_walk(w, Direction::Right);
                true
            }),
        ]),
    ])
}

// ── Leaves ────────────────────────────────────────────────────────────────────

fn jump(direction: Direction) -> Brain {
    Node::leaf(move |w: &mut World| {
        w.jump_player(direction);
        true
    })
}

fn frames_over(n: u32) -> Brain {
    Node::leaf(move |w: &mut World| w.player.decision_frames > n)
}

fn frames_at_least(n: u32) -> Brain {
    Node::leaf(move |w: &mut World| w.player.decision_frames >= n)
}

/// Succeeds with probability `1 - threshold`.
fn chance_over(threshold: f32) -> Brain {
    Node::leaf(move |w: &mut World| w.rng.above(threshold))
}

/// Alternates between idling and walking in a random direction.
fn wander() -> Brain {
    Node::leaf(|w: &mut World| {
        let direction = if w.rng.above(0.5) { Direction::Right } else { Direction::Left };
        toggle_walk(w, direction);
        true
    })
}

/// Jump down from whichever platform edge the player is walking toward.
fn edge_hops() -> Brain {
    Node::or(vec![
        Node::and(vec![Node::try_leaf(near_left_edge), jump(Direction::Left)]),
        Node::and(vec![Node::try_leaf(near_right_edge), jump(Direction::Right)]),
    ])
}

fn toggle_walk(w: &mut World, direction: Direction) {
    if w.player.movement().is_walking() {
        w.set_player_movement(Movement::Idle);
    } else {
        w.set_player_movement(Movement::walking(&w.config.player));
        w.player.direction = direction;
    }
}

/// Horizontal gap from the player's right side to a box on its right.
fn gap_ahead(w: &World, left_edge: f32) -> f32 {
    left_edge - w.player.collision_box().right()
}

fn boss_ahead_within(w: &World, distance: f32) -> bool {
    let gap = gap_ahead(w, w.boss.collision_box().x);
    gap > 0.0 && gap <= distance
}

fn platform_ahead_within(w: &World, distance: f32) -> Result<bool, GameError> {
    let gap = gap_ahead(w, w.platform_box()?.x);
    Ok(gap > 0.0 && gap <= distance)
}

fn can_jump_onto_projectile(w: &mut World) -> bool {
    let w: &World = w;
    w.projectiles
        .iter()
        .filter(|p| p.state() == ProjectileState::Flying)
        .any(|p| {
            let gap = gap_ahead(w, p.collision_box().x);
            gap > 0.0 && gap <= EGG_JUMP_RANGE
        })
}

fn near_left_edge(w: &mut World) -> Result<bool, GameError> {
    let platform = w.platform_box()?;
    let player = w.player.collision_box();
    Ok(player.x < platform.x - 8.0 && w.player.direction == Direction::Left)
}

fn near_right_edge(w: &mut World) -> Result<bool, GameError> {
    let platform = w.platform_box()?;
    let player = w.player.collision_box();
    Ok(player.x > platform.right() - player.w / 2.0 && w.player.direction == Direction::Right)
}
