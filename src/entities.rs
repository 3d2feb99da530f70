//! Shared value types: geometry, entity identity, collision records.
//!
//! Everything here is plain data. Behaviour lives in the per-entity modules.

use std::fmt;

use crate::assets::AppearanceHandle;
use crate::projectile::ProjectileState;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// 2D coordinate in logical pixels. Also used for velocities.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Point { x: self.x + dx, y: self.y + dy }
    }
}

/// Axis-aligned box in world space. Always derived from the owner's current
/// position; never stored across ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionBox {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl CollisionBox {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        CollisionBox { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Where an entity's collision box sits relative to its position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxShape {
    pub dx: f32,
    pub dy: f32,
    pub w: f32,
    pub h: f32,
}

impl BoxShape {
    pub const fn new(dx: f32, dy: f32, w: f32, h: f32) -> Self {
        BoxShape { dx, dy, w, h }
    }

    pub fn at(&self, pos: Point) -> CollisionBox {
        CollisionBox::new(pos.x + self.dx, pos.y + self.dy, self.w, self.h)
    }

    /// Distance from the owner's `pos.y` to the bottom edge of the box.
    pub fn foot(&self) -> f32 {
        self.dy + self.h
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    pub fn flipped(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

// ── Identity ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What an entity is, as seen by the collision snapshot. Projectiles carry
/// the state they were in when the snapshot was taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    Boss,
    Projectile(ProjectileState),
    Platform,
}

// ── Collisions ────────────────────────────────────────────────────────────────

/// The side on which the *other* entity lies, from the receiver's point of
/// view. A character resting on top of something reports `South`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    North,
    South,
    East,
    West,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::North => Side::South,
            Side::South => Side::North,
            Side::East => Side::West,
            Side::West => Side::East,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::East | Side::West)
    }
}

/// One contact reported for one tick. Never persisted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collision {
    pub other: EntityId,
    pub kind: EntityKind,
    /// The other entity's box at snapshot time.
    pub other_box: CollisionBox,
    pub side: Side,
}

// ── Entity capability set ─────────────────────────────────────────────────────

/// What the collision resolver and the renderer need from every entity.
/// Updates are inherent on each entity type because each needs a different
/// slice of the world.
pub trait Entity {
    fn id(&self) -> EntityId;
    fn kind(&self) -> EntityKind;
    fn pos(&self) -> Point;
    fn collision_box(&self) -> CollisionBox;

    /// Entities that bounced away or were dropped stop taking part in
    /// collision resolution.
    fn is_collidable(&self) -> bool {
        true
    }

    /// The sprite assigned by the last update, if any.
    fn appearance(&self) -> Option<&AppearanceHandle>;
}

/// Read-only view of a projectile, taken before anything moves in a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileView {
    pub id: EntityId,
    pub state: ProjectileState,
    pub pos: Point,
    pub vel: Point,
    pub bbox: CollisionBox,
}

// ── Static obstacles ──────────────────────────────────────────────────────────

/// Immutable platform. Its surface sits one pixel above the drawn top so a
/// character snapped onto it keeps reporting a south contact.
#[derive(Clone, Debug)]
pub struct Platform {
    pub id: EntityId,
    pub pos: Point,
    pub w: f32,
    pub h: f32,
    appearance: Option<AppearanceHandle>,
}

impl Platform {
    pub fn new(id: EntityId, pos: Point, w: f32, h: f32) -> Self {
        Platform { id, pos, w, h, appearance: None }
    }

    pub fn set_appearance(&mut self, handle: AppearanceHandle) {
        self.appearance = Some(handle);
    }
}

impl Entity for Platform {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Platform
    }

    fn pos(&self) -> Point {
        self.pos
    }

    fn collision_box(&self) -> CollisionBox {
        CollisionBox::new(self.pos.x, self.pos.y - 1.0, self.w, self.h)
    }

    fn appearance(&self) -> Option<&AppearanceHandle> {
        self.appearance.as_ref()
    }
}
