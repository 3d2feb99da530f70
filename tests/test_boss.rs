use boss_fight::assets::SpriteCatalog;
use boss_fight::boss::*;
use boss_fight::config::MatchConfig;
use boss_fight::entities::*;
use boss_fight::events::{EventBuffer, FrameEvent};
use boss_fight::match_phase::MatchPhase;
use boss_fight::projectile::{ProjectileKind, ProjectileState};
use boss_fight::world::{Frame, WorldRequest};

use pretty_assertions::assert_eq;

fn update(
    boss: &mut Boss,
    config: &MatchConfig,
    phase: MatchPhase,
    elapsed_ms: f32,
) -> (EventBuffer, Vec<WorldRequest>) {
    let sprites = SpriteCatalog::standard();
    let mut events = EventBuffer::default();
    let mut requests = Vec::new();
    let mut frame = Frame {
        elapsed_ms,
        phase,
        config,
        appearances: &sprites,
        projectiles: &[],
        events: &mut events,
        requests: &mut requests,
    };
    boss.update(&mut frame).unwrap();
    (events, requests)
}

fn fighting_boss(config: &MatchConfig) -> Boss {
    let mut boss = Boss::new(EntityId(2), config);
    boss.reset(config, false);
    boss
}

fn hit_by(state: ProjectileState, side: Side) -> Collision {
    Collision {
        other: EntityId(7),
        kind: EntityKind::Projectile(state),
        other_box: CollisionBox::new(250.0, 110.0, 18.0, 16.0),
        side,
    }
}

// ── Intro ─────────────────────────────────────────────────────────────────────

#[test]
fn intro_announces_once_and_waits_for_the_fight() {
    let config = MatchConfig::default();
    let mut boss = Boss::new(EntityId(2), &config);
    assert_eq!(boss.pos, Point::new(250.0, 101.0));
    assert_eq!(boss.collision_box().bottom(), config.world.ground_y);

    let (first, _) = update(&mut boss, &config, MatchPhase::Intro, 16.0);
    let (second, _) = update(&mut boss, &config, MatchPhase::Intro, 16.0);
    assert!(first.contains(&FrameEvent::Sound { key: "birdo-intro" }));
    assert_eq!(second.iter().count(), 0);
    assert!(matches!(boss.movement(), BossMovement::Intro { .. }));

    update(&mut boss, &config, MatchPhase::Fighting, 16.0);
    assert!(matches!(boss.movement(), BossMovement::Idle(_)));
}

// ── Routine ───────────────────────────────────────────────────────────────────

#[test]
fn boss_walks_forward_shoots_walks_back_and_hops() {
    let config = MatchConfig::default();
    let mut boss = fighting_boss(&config);
    let fight = MatchPhase::Fighting;

    // Idle at the start spot, then walk toward the player
    update(&mut boss, &config, fight, 1500.0);
    assert!(matches!(boss.movement(), BossMovement::Walking { heading: Direction::Left, .. }));
    for _ in 0..5 {
        update(&mut boss, &config, fight, 100.0);
    }
    assert_eq!(boss.pos.x, 245.0);
    assert!(matches!(boss.movement(), BossMovement::Idle(_)));

    // Left of the start spot, so the next idle ends in a shot
    update(&mut boss, &config, fight, 1500.0);
    assert!(matches!(boss.movement(), BossMovement::Shooting { .. }));

    let (_, requests) = update(&mut boss, &config, fight, 100.0);
    assert!(requests.is_empty());
    assert_eq!(boss.appearance_key(), "birdo-1");

    let (events, requests) = update(&mut boss, &config, fight, 200.0);
    assert_eq!(
        requests,
        vec![WorldRequest::Spawn {
            kind: ProjectileKind::Egg,
            pos: Point::new(241.0, 115.0),
            heading: Direction::Left,
        }]
    );
    assert!(events.contains(&FrameEvent::Sound { key: "birdo-shoot-egg" }));

    let (_, requests) = update(&mut boss, &config, fight, 1200.0);
    assert!(requests.is_empty());
    assert!(matches!(boss.movement(), BossMovement::Walking { heading: Direction::Right, .. }));

    for _ in 0..5 {
        update(&mut boss, &config, fight, 100.0);
    }
    assert_eq!(boss.pos.x, 250.0);
    assert!(matches!(boss.movement(), BossMovement::Jumping(_)));

    let mut apex = boss.pos.y;
    for _ in 0..30 {
        if !matches!(boss.movement(), BossMovement::Jumping(_)) {
            break;
        }
        update(&mut boss, &config, fight, 16.0);
        apex = apex.min(boss.pos.y);
    }
    assert!(matches!(boss.movement(), BossMovement::Idle(_)));
    assert_eq!(boss.pos.y, 101.0);
    assert_eq!(apex, 80.0);
}

#[test]
fn walk_cycle_alternates_two_frames() {
    let config = MatchConfig::default();
    let mut boss = fighting_boss(&config);
    update(&mut boss, &config, MatchPhase::Fighting, 1500.0);

    update(&mut boss, &config, MatchPhase::Fighting, 100.0);
    let first = boss.appearance_key();
    update(&mut boss, &config, MatchPhase::Fighting, 100.0);
    let second = boss.appearance_key();

    assert_ne!(first, second);
    assert!(first.starts_with("birdo-walk-"));
    assert!(second.starts_with("birdo-walk-"));
}

// ── Damage ────────────────────────────────────────────────────────────────────

#[test]
fn thrown_egg_costs_the_boss_a_life_once_per_window() {
    let config = MatchConfig::default();
    let mut boss = fighting_boss(&config);
    let mut events = EventBuffer::default();

    boss.react(&[hit_by(ProjectileState::Throwed, Side::West)], &mut events, &config);
    assert_eq!(boss.lives, 4);
    assert!(events.contains(&FrameEvent::BossDamaged { lives: 4 }));
    assert!(events.contains(&FrameEvent::Sound { key: "birdo-hurt" }));

    boss.react(&[hit_by(ProjectileState::Throwed, Side::East)], &mut events, &config);
    assert_eq!(boss.lives, 4);

    update(&mut boss, &config, MatchPhase::Fighting, 500.0);
    assert!(boss.damage().is_none());
    boss.react(&[hit_by(ProjectileState::Throwed, Side::North)], &mut events, &config);
    assert_eq!(boss.lives, 3);
}

#[test]
fn only_thrown_eggs_from_above_or_the_sides_count() {
    let config = MatchConfig::default();
    let mut boss = fighting_boss(&config);
    let mut events = EventBuffer::default();

    boss.react(
        &[
            hit_by(ProjectileState::Throwed, Side::South),
            hit_by(ProjectileState::Flying, Side::West),
            hit_by(ProjectileState::PickedUp, Side::West),
        ],
        &mut events,
        &config,
    );
    let player = Collision {
        other: EntityId(1),
        kind: EntityKind::Player,
        other_box: CollisionBox::new(230.0, 116.0, 20.0, 32.0),
        side: Side::West,
    };
    boss.react(&[player], &mut events, &config);

    assert_eq!(boss.lives, 5);
    assert!(boss.damage().is_none());
}

#[test]
fn damaged_boss_flickers() {
    let config = MatchConfig::default();
    let mut boss = fighting_boss(&config);
    let mut events = EventBuffer::default();
    boss.react(&[hit_by(ProjectileState::Throwed, Side::West)], &mut events, &config);

    update(&mut boss, &config, MatchPhase::Fighting, 16.0);
    assert_eq!(boss.appearance_key(), "birdo-damage-0");
    update(&mut boss, &config, MatchPhase::Fighting, 16.0);
    assert_eq!(boss.appearance_key(), "birdo-damage-1");
}

// ── Outcome states ────────────────────────────────────────────────────────────

#[test]
fn defeated_boss_falls_off_screen_once() {
    let mut config = MatchConfig::default();
    config.world.fall_off_y = 150.0;
    let mut boss = fighting_boss(&config);
    boss.lives = 0;
    boss.die(&config);

    let mut reports = 0;
    for _ in 0..100 {
        let (events, _) = update(&mut boss, &config, MatchPhase::PlayerWon, 16.0);
        reports += events
            .iter()
            .filter(|e| matches!(e, FrameEvent::FellOffScreen { who: EntityKind::Boss }))
            .count();
    }
    assert_eq!(reports, 1);
    assert!(boss.pos.x > 250.0);
    match boss.movement() {
        BossMovement::Dying(fall) => assert!(fall.is_gone()),
        other => panic!("expected dying, got {other:?}"),
    }
}

#[test]
fn winning_boss_stands_still() {
    let config = MatchConfig::default();
    let mut boss = fighting_boss(&config);
    boss.pos.y = 90.0;
    boss.win();
    update(&mut boss, &config, MatchPhase::BossWon, 1500.0);

    assert_eq!(boss.pos, Point::new(250.0, 101.0));
    assert_eq!(boss.movement(), &BossMovement::Winning);
}

#[test]
fn reset_without_announcement_skips_the_intro() {
    let config = MatchConfig::default();
    let mut boss = Boss::new(EntityId(2), &config);
    boss.lives = 1;
    boss.pos.x = 10.0;

    boss.reset(&config, false);
    assert_eq!(boss.lives, 5);
    assert_eq!(boss.pos, boss.start());
    assert!(matches!(boss.movement(), BossMovement::Idle(_)));

    boss.reset(&config, true);
    assert!(matches!(boss.movement(), BossMovement::Intro { announced: false }));
}

#[test]
fn idle_boss_holds_still_outside_the_fight() {
    let config = MatchConfig::default();
    let mut boss = fighting_boss(&config);
    boss.pos.x = 100.0;

    for phase in [MatchPhase::Pause, MatchPhase::Intro, MatchPhase::BossWon] {
        let (events, requests) = update(&mut boss, &config, phase, 5000.0);
        assert!(requests.is_empty(), "{phase}");
        assert_eq!(events.iter().count(), 0, "{phase}");
    }
    match boss.movement() {
        BossMovement::Idle(timer) => assert_eq!(timer.elapsed(), 0.0),
        other => panic!("expected idle, got {other:?}"),
    }
    assert_eq!(boss.pos, Point::new(100.0, 101.0));
}
