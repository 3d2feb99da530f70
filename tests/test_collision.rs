use boss_fight::collision::*;
use boss_fight::entities::*;

use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn body(id: u32, kind: EntityKind, x: f32, y: f32, w: f32, h: f32) -> Body {
    Body { id: EntityId(id), kind, bbox: CollisionBox::new(x, y, w, h) }
}

// ── overlaps ──────────────────────────────────────────────────────────────────

#[test]
fn overlap_is_symmetric() {
    let a = CollisionBox::new(0.0, 0.0, 10.0, 10.0);
    let b = CollisionBox::new(5.0, 5.0, 10.0, 10.0);
    assert!(overlaps(&a, &b));
    assert!(overlaps(&b, &a));
}

#[test]
fn boxes_sharing_an_edge_do_not_collide() {
    let a = CollisionBox::new(0.0, 0.0, 10.0, 10.0);
    let right = CollisionBox::new(10.0, 0.0, 10.0, 10.0);
    let below = CollisionBox::new(0.0, 10.0, 10.0, 10.0);

    assert!(!overlaps(&a, &right));
    assert!(!overlaps(&a, &below));
    assert_eq!(contact_side(&a, &right), None);

    let bodies = [
        body(1, EntityKind::Player, 0.0, 0.0, 10.0, 10.0),
        body(2, EntityKind::Boss, 10.0, 0.0, 10.0, 10.0),
    ];
    assert!(resolve(&bodies).is_empty());
}

// ── contact_side ──────────────────────────────────────────────────────────────

#[test]
fn resting_on_top_reports_south_below_and_north_above() {
    // Two pixels of vertical penetration, full horizontal overlap
    let top = CollisionBox::new(0.0, 0.0, 10.0, 10.0);
    let bottom = CollisionBox::new(0.0, 8.0, 10.0, 10.0);

    assert_eq!(contact_side(&top, &bottom), Some(Side::South));
    assert_eq!(contact_side(&bottom, &top), Some(Side::North));
}

#[test]
fn side_by_side_contact_is_east_and_west() {
    let left = CollisionBox::new(0.0, 0.0, 10.0, 10.0);
    let right = CollisionBox::new(8.0, 0.0, 10.0, 10.0);

    assert_eq!(contact_side(&left, &right), Some(Side::East));
    assert_eq!(contact_side(&right, &left), Some(Side::West));
}

#[test]
fn player_standing_on_the_platform_sees_it_south() {
    // Player snapped onto the default platform (surface one pixel above)
    let player = CollisionBox::new(138.0, 18.0, 20.0, 32.0);
    let platform = CollisionBox::new(117.0, 49.0, 85.0, 30.0);
    assert_eq!(contact_side(&player, &platform), Some(Side::South));
}

#[test]
fn swapping_the_pair_flips_the_side() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut checked = 0;

    for _ in 0..2000 {
        let mut random_box = || {
            CollisionBox::new(
                rng.gen_range(0..40) as f32,
                rng.gen_range(0..40) as f32,
                rng.gen_range(4..30) as f32,
                rng.gen_range(4..30) as f32,
            )
        };
        let a = random_box();
        let b = random_box();

        // Equal centers on an axis break the antisymmetry on purpose
        let (ca, cb) = (a.center(), b.center());
        if ca.x == cb.x || ca.y == cb.y {
            continue;
        }
        match (contact_side(&a, &b), contact_side(&b, &a)) {
            (Some(ab), Some(ba)) => {
                assert_eq!(ab.opposite(), ba, "a = {a:?}, b = {b:?}");
                checked += 1;
            }
            (None, None) => {}
            other => panic!("asymmetric detection {other:?} for {a:?} / {b:?}"),
        }
    }
    assert!(checked > 100);
}

// ── resolve ───────────────────────────────────────────────────────────────────

#[test]
fn resolve_reports_each_contact_to_both_bodies() {
    let bodies = [
        body(1, EntityKind::Player, 0.0, 0.0, 10.0, 10.0),
        body(2, EntityKind::Projectile(boss_fight::projectile::ProjectileState::Flying), 0.0, 8.0, 10.0, 10.0),
        body(3, EntityKind::Platform, 100.0, 100.0, 50.0, 10.0),
    ];
    let map = resolve(&bodies);

    let player = contacts_of(&map, EntityId(1));
    assert_eq!(player.len(), 1);
    assert_eq!(player[0].other, EntityId(2));
    assert_eq!(player[0].side, Side::South);
    assert_eq!(player[0].other_box, bodies[1].bbox);

    let egg = contacts_of(&map, EntityId(2));
    assert_eq!(egg.len(), 1);
    assert_eq!(egg[0].other, EntityId(1));
    assert_eq!(egg[0].kind, EntityKind::Player);
    assert_eq!(egg[0].side, Side::North);

    assert!(contacts_of(&map, EntityId(3)).is_empty());
}

#[test]
fn resolve_keeps_every_contact_of_a_crowded_body() {
    let bodies = [
        body(1, EntityKind::Boss, 0.0, 0.0, 30.0, 30.0),
        body(2, EntityKind::Player, 25.0, 5.0, 10.0, 10.0),
        body(3, EntityKind::Player, -5.0, 5.0, 10.0, 10.0),
    ];
    let map = resolve(&bodies);
    let sides: Vec<_> = contacts_of(&map, EntityId(1)).iter().map(|c| (c.other, c.side)).collect();
    assert_eq!(sides, vec![(EntityId(2), Side::East), (EntityId(3), Side::West)]);
}
