use boss_fight::assets::SpriteCatalog;
use boss_fight::brain::PlayerBrain;
use boss_fight::collision::CollisionMap;
use boss_fight::config::MatchConfig;
use boss_fight::entities::*;
use boss_fight::error::GameError;
use boss_fight::events::FrameEvent;
use boss_fight::match_phase::MatchPhase;
use boss_fight::player::{ItemState, Movement, PLAYER_BOX};
use boss_fight::projectile::{ProjectileKind, ProjectileState};
use boss_fight::random::ScriptedRandom;
use boss_fight::world::World;

use pretty_assertions::assert_eq;

fn fighting_world(config: MatchConfig, script: Vec<f32>) -> World {
    let mut world = World::new(config, Box::new(ScriptedRandom::new(script)));
    world.enter_phase(MatchPhase::Fighting).unwrap();
    world.events.drain();
    world
}

fn world_with_script(script: Vec<f32>) -> World {
    fighting_world(MatchConfig::default(), script)
}

/// Puts the player on top of a fresh flying egg.
fn stand_on_egg(world: &mut World) -> EntityId {
    let egg = world.spawn_projectile(ProjectileKind::Egg, Point::new(world.player.pos.x + 8.0, 120.0), Direction::Left);
    let other_box = world.projectile(egg).unwrap().collision_box();
    let underfoot = Collision {
        other: egg,
        kind: EntityKind::Projectile(ProjectileState::Flying),
        other_box,
        side: Side::South,
    };
    world.player.react(&[underfoot], &mut world.events, &world.config);
    egg
}

/// Lifts an egg and leaves the player idle with it overhead.
fn give_egg(world: &mut World) -> EntityId {
    let egg = stand_on_egg(world);
    assert!(world.begin_pick_up().unwrap());
    let views = world.projectile_views();
    world
        .step_entities(world.config.player.pick_ms, &SpriteCatalog::standard(), &views, &CollisionMap::new())
        .unwrap();
    assert_eq!(world.player.held_projectile(), Some(egg));
    world.set_player_movement(Movement::Idle);
    world.events.drain();
    egg
}

/// Moves the player so its box ends `gap` pixels left of `x`.
fn place_player_before(world: &mut World, x: f32, gap: f32) {
    world.player.pos.x = x - gap - PLAYER_BOX.dx - PLAYER_BOX.w;
}

fn land_on_platform(world: &mut World) {
    let platform = &world.platforms[0];
    let on_top = Collision {
        other: platform.id,
        kind: EntityKind::Platform,
        other_box: platform.collision_box(),
        side: Side::South,
    };
    world.player.react(&[on_top], &mut world.events, &world.config);
    assert!(world.player.is_on_platform());
}

// ── Gating ────────────────────────────────────────────────────────────────────

#[test]
fn blocking_movements_run_to_completion() {
    let brain = PlayerBrain::new();
    let mut world = world_with_script(vec![]);
    world.jump_player(Direction::Right);
    let before = *world.player.movement();

    assert!(brain.evaluate(&mut world).unwrap());
    assert_eq!(world.player.movement(), &before);
    assert_eq!(world.player.decision_frames, 1);
}

#[test]
fn idle_player_waits_until_boredom_sets_in() {
    let brain = PlayerBrain::new();
    let mut world = world_with_script(vec![]);

    for _ in 0..99 {
        assert!(!brain.evaluate(&mut world).unwrap());
        assert_eq!(world.player.movement(), &Movement::Idle);
    }
    assert!(brain.evaluate(&mut world).unwrap());
    assert!(world.player.movement().is_walking());
    assert_eq!(world.player.direction, Direction::Right);
    assert_eq!(world.player.decision_frames, 0);
}

// ── Foraging ──────────────────────────────────────────────────────────────────

#[test]
fn jumps_onto_a_flying_egg_just_ahead() {
    let brain = PlayerBrain::new();
    let mut world = world_with_script(vec![]);
    // Player box ends at x = 22; the egg starts 18 px further
    world.spawn_projectile(ProjectileKind::Egg, Point::new(40.0, 115.0), Direction::Left);

    assert!(brain.evaluate(&mut world).unwrap());
    assert!(matches!(world.player.movement(), Movement::Jumping(_)));
    assert!(world.events.contains(&FrameEvent::Sound { key: "mario-jump" }));
}

#[test]
fn waits_on_the_egg_before_lifting_it() {
    let brain = PlayerBrain::new();
    let mut world = world_with_script(vec![]);
    let egg = stand_on_egg(&mut world);

    assert!(brain.evaluate(&mut world).unwrap());
    assert_eq!(world.player.movement(), &Movement::Idle);

    world.player.decision_frames = 25;
    assert!(brain.evaluate(&mut world).unwrap());
    assert!(matches!(world.player.movement(), Movement::Picking(_)));
    assert_eq!(world.projectile(egg).unwrap().state(), ProjectileState::PickedUp);
}

#[test]
fn backs_off_when_the_boss_is_close() {
    let brain = PlayerBrain::new();
    let mut world = world_with_script(vec![]);
    let boss_x = world.boss.collision_box().x;
    place_player_before(&mut world, boss_x, 10.0);

    assert!(brain.evaluate(&mut world).unwrap());
    assert!(world.player.movement().is_walking());
    assert_eq!(world.player.direction, Direction::Left);
}

#[test]
fn hops_onto_the_platform_on_a_lucky_draw() {
    let brain = PlayerBrain::new();
    let mut lucky = world_with_script(vec![0.9]);
    let platform_x = lucky.platform_box().unwrap().x;
    place_player_before(&mut lucky, platform_x, 4.0);
    assert!(brain.evaluate(&mut lucky).unwrap());
    assert!(matches!(lucky.player.movement(), Movement::Jumping(_)));

    let mut unlucky = world_with_script(vec![0.1]);
    place_player_before(&mut unlucky, platform_x, 4.0);
    assert!(brain.evaluate(&mut unlucky).unwrap());
    assert_eq!(unlucky.player.movement(), &Movement::Idle);
}

#[test]
fn jumps_off_the_left_edge_of_the_platform() {
    let brain = PlayerBrain::new();
    let mut world = world_with_script(vec![]);
    land_on_platform(&mut world);
    world.player.pos.x = 95.0;
    world.player.direction = Direction::Left;

    assert!(brain.evaluate(&mut world).unwrap());
    assert!(matches!(world.player.movement(), Movement::Jumping(_)));
    assert_eq!(world.player.direction, Direction::Left);
}

#[test]
fn right_edge_jump_depends_on_where_the_boss_is() {
    let brain = PlayerBrain::new();

    // Boss 43 px away: turn around instead
    let mut near = world_with_script(vec![]);
    land_on_platform(&mut near);
    near.player.pos.x = 185.0;
    assert!(brain.evaluate(&mut near).unwrap());
    assert!(near.player.movement().is_walking());
    assert_eq!(near.player.direction, Direction::Left);

    let mut far = world_with_script(vec![]);
    far.boss.pos.x = 300.0;
    land_on_platform(&mut far);
    far.player.pos.x = 185.0;
    assert!(brain.evaluate(&mut far).unwrap());
    assert!(matches!(far.player.movement(), Movement::Jumping(_)));
    assert_eq!(far.player.direction, Direction::Right);
}

#[test]
fn wanders_on_the_platform_when_bored() {
    let brain = PlayerBrain::new();
    let mut world = world_with_script(vec![0.2]);
    land_on_platform(&mut world);
    world.player.pos.x = 140.0;
    world.player.decision_frames = 49;

    assert!(brain.evaluate(&mut world).unwrap());
    assert!(world.player.movement().is_walking());
    assert_eq!(world.player.direction, Direction::Left);
}

#[test]
fn missing_platform_is_reported() {
    let mut config = MatchConfig::default();
    config.world.platforms.clear();
    let brain = PlayerBrain::new();
    let mut world = fighting_world(config, vec![]);

    assert!(matches!(brain.evaluate(&mut world), Err(GameError::MissingPlatform)));
}

// ── Attacking ─────────────────────────────────────────────────────────────────

#[test]
fn throws_once_the_boss_is_in_range() {
    let brain = PlayerBrain::new();
    let mut world = world_with_script(vec![]);
    let egg = give_egg(&mut world);
    let boss_x = world.boss.collision_box().x;
    place_player_before(&mut world, boss_x, 40.0);

    assert!(brain.evaluate(&mut world).unwrap());
    let thrown = world.projectile(egg).unwrap();
    assert_eq!(thrown.state(), ProjectileState::Throwed);
    assert_eq!(thrown.vel.x, 8.0);
    assert!(matches!(world.player.item(), Some(ItemState::Throwing { .. })));
    assert_eq!(world.player.direction, Direction::Left);
}

#[test]
fn carries_the_egg_toward_the_boss() {
    let brain = PlayerBrain::new();
    let mut world = world_with_script(vec![]);
    give_egg(&mut world);
    world.player.pos = Point::new(30.0, 100.0);

    assert!(brain.evaluate(&mut world).unwrap());
    assert!(world.player.movement().is_walking());
    assert_eq!(world.player.direction, Direction::Right);
    assert!(world.player.is_holding_item());
}

#[test]
fn holding_player_stays_put_on_the_platform() {
    let brain = PlayerBrain::new();
    let mut world = world_with_script(vec![]);
    give_egg(&mut world);
    land_on_platform(&mut world);
    world.player.pos.x = 140.0;

    assert!(brain.evaluate(&mut world).unwrap());
    assert_eq!(world.player.movement(), &Movement::Idle);
}
