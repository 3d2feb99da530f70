//! Seams to the asset and audio layers.
//!
//! The core never loads anything. States ask an [`AppearanceRegistry`] for a
//! handle every tick and emit sound cues that end up at an [`AudioPlayer`].

use std::collections::HashMap;
use std::sync::Arc;

use crate::entities::Direction;
use crate::error::GameError;

/// A resolved sprite. Cheap to clone; the glyph is what the terminal
/// renderer prints for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppearanceHandle {
    key: Arc<str>,
    pub glyph: char,
}

impl AppearanceHandle {
    pub fn new(key: &str, glyph: char) -> Self {
        AppearanceHandle { key: Arc::from(key), glyph }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

pub trait AppearanceRegistry {
    /// Fails with [`GameError::AssetNotLoaded`] for unknown keys.
    fn get(&self, key: &str) -> Result<AppearanceHandle, GameError>;
}

/// Fire-and-forget sound output.
pub trait AudioPlayer {
    fn play(&mut self, key: &str, looped: bool);
}

// ── In-memory registry ────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct SpriteCatalog {
    sprites: HashMap<String, AppearanceHandle>,
}

impl SpriteCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, key: &str, glyph: char) {
        self.sprites
            .insert(key.to_string(), AppearanceHandle::new(key, glyph));
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Every key the core can ask for.
    pub fn standard() -> Self {
        let mut catalog = SpriteCatalog::new();

        for dir in [Direction::Left, Direction::Right] {
            let d = dir.as_str();
            for hold in ["", "-holding-item"] {
                for damage in ["", "-damage"] {
                    for frame in 1..=4 {
                        catalog.register(&format!("walk-{d}{hold}{damage}{frame}"), 'M');
                    }
                }
            }
            catalog.register(&format!("throw-{d}"), 'M');
            catalog.register(&format!("dead-{d}"), 'x');
            catalog.register(&format!("dead-{d}-damage"), 'X');
        }
        catalog.register("lift", 'm');
        catalog.register("lift-damage", 'm');
        catalog.register("winning", 'W');

        catalog.register("birdo-0", 'B');
        catalog.register("birdo-1", 'B');
        catalog.register("birdo-walk-0", 'B');
        catalog.register("birdo-walk-1", 'B');
        catalog.register("birdo-damage-0", 'b');
        catalog.register("birdo-damage-1", 'B');

        catalog.register("egg", 'o');
        catalog.register("carrot", 'v');
        catalog.register("platform", '=');
        catalog
    }
}

impl AppearanceRegistry for SpriteCatalog {
    fn get(&self, key: &str) -> Result<AppearanceHandle, GameError> {
        self.sprites
            .get(key)
            .cloned()
            .ok_or_else(|| GameError::AssetNotLoaded(key.to_string()))
    }
}

// ── Audio sinks ───────────────────────────────────────────────────────────────

/// Drops every cue, logging it at debug level.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentAudio;

impl AudioPlayer for SilentAudio {
    fn play(&mut self, key: &str, looped: bool) {
        log::debug!("sound cue {key} (looped: {looped})");
    }
}

/// Remembers every cue in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingAudio {
    pub played: Vec<String>,
}

impl AudioPlayer for RecordingAudio {
    fn play(&mut self, key: &str, _looped: bool) {
        self.played.push(key.to_string());
    }
}
