//! All-pairs AABB collision resolution with contact sides.
//!
//! Discrete only: boxes are tested where they are at the start of the tick,
//! so a fast thin projectile can step clean over a thin platform between two
//! ticks. Cost is O(n²), fine for the handful of entities in a match.

use std::collections::HashMap;

use crate::entities::{Collision, CollisionBox, EntityId, EntityKind, Side};

/// One entity as captured in the pre-tick snapshot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub id: EntityId,
    pub kind: EntityKind,
    pub bbox: CollisionBox,
}

pub type CollisionMap = HashMap<EntityId, Vec<Collision>>;

/// Strict overlap: boxes that only share an edge do not collide.
pub fn overlaps(a: &CollisionBox, b: &CollisionBox) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// Penetration on one axis, signed positive when `a`'s center is greater.
fn signed_overlap(a_center: f32, a_half: f32, b_center: f32, b_half: f32) -> f32 {
    let depth = (a_half + b_half) - (a_center - b_center).abs();
    if a_center > b_center {
        depth
    } else {
        -depth
    }
}

/// Side of `a` on which `b` lies, or `None` if they do not overlap.
///
/// The axis with the larger penetration is the one the boxes still have room
/// to separate along, so the contact is taken on the other one.
pub fn contact_side(a: &CollisionBox, b: &CollisionBox) -> Option<Side> {
    if !overlaps(a, b) {
        return None;
    }
    let (ca, cb) = (a.center(), b.center());
    let overlap_x = signed_overlap(ca.x, a.w / 2.0, cb.x, b.w / 2.0);
    let overlap_y = signed_overlap(ca.y, a.h / 2.0, cb.y, b.h / 2.0);

    let side = if overlap_y.abs() > overlap_x.abs() {
        if overlap_x <= 0.0 {
            Side::East
        } else {
            Side::West
        }
    } else if overlap_y <= 0.0 {
        Side::South
    } else {
        Side::North
    };
    Some(side)
}

/// Every contact for every body. Bodies with no contact get no entry.
pub fn resolve(bodies: &[Body]) -> CollisionMap {
    let mut map: CollisionMap = HashMap::new();

    for (i, a) in bodies.iter().enumerate() {
        for b in &bodies[i + 1..] {
            if a.id == b.id {
                continue;
            }
            let Some(side) = contact_side(&a.bbox, &b.bbox) else {
                continue;
            };
            map.entry(a.id).or_default().push(Collision {
                other: b.id,
                kind: b.kind,
                other_box: b.bbox,
                side,
            });
            map.entry(b.id).or_default().push(Collision {
                other: a.id,
                kind: a.kind,
                other_box: a.bbox,
                side: contact_side(&b.bbox, &a.bbox).unwrap_or(side.opposite()),
            });
        }
    }
    log::trace!("{} of {} bodies in contact", map.len(), bodies.len());
    map
}

/// Contacts reported for one entity, empty if it touched nothing.
pub fn contacts_of(map: &CollisionMap, id: EntityId) -> &[Collision] {
    map.get(&id).map(Vec::as_slice).unwrap_or(&[])
}
