//! Match tuning, optionally loaded from a RON file.
//!
//! Defaults reproduce the hand-tuned constants of the game; a file only has
//! to name the values it wants to change.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::projectile::ProjectileKind;

pub const DEFAULT_CONFIG_PATH: &str = "assets/match.ron";

/// Discrete kinematics: `v_y(t) = v_i + g·t`, `t` counted in ticks.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct ArcParams {
    pub v_i: f32,
    pub g: f32,
}

impl ArcParams {
    pub const fn new(v_i: f32, g: f32) -> Self {
        ArcParams { v_i, g }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self { x: 117.0, y: 50.0, w: 85.0, h: 30.0 }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    /// Line the characters' feet rest on.
    pub ground_y: f32,
    /// A dying character below this line has left the screen for good.
    pub fall_off_y: f32,
    pub platforms: Vec<PlatformConfig>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 320.0,
            height: 180.0,
            ground_y: 148.0,
            fall_off_y: 2000.0,
            platforms: vec![PlatformConfig::default()],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub lives: u32,
    pub start_x: f32,
    pub walk_speed: f32,
    pub walk_frame_ms: f32,
    pub jump: ArcParams,
    pub jump_speed_x: f32,
    pub fall_gravity: f32,
    pub dying_gravity: f32,
    pub dying_speed_x: f32,
    pub pick_ms: f32,
    pub throw_pose_ms: f32,
    pub damage_ms: f32,
    pub throw_speed_ground: f32,
    pub throw_speed_platform: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            lives: 3,
            start_x: -6.0,
            walk_speed: 1.0,
            walk_frame_ms: 150.0,
            jump: ArcParams::new(-14.0, 1.0),
            jump_speed_x: 1.0,
            fall_gravity: 1.0,
            dying_gravity: 0.2,
            dying_speed_x: 1.0,
            pick_ms: 1000.0,
            throw_pose_ms: 250.0,
            damage_ms: 500.0,
            throw_speed_ground: 8.0,
            throw_speed_platform: 2.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct BossTuning {
    pub lives: u32,
    pub start_x: f32,
    pub idle_ms: f32,
    pub walk_ms: f32,
    pub walk_speed: f32,
    pub walk_frame_ms: f32,
    pub shoot_delay_ms: f32,
    pub shoot_ms: f32,
    pub jump: ArcParams,
    pub damage_ms: f32,
    pub dying_gravity: f32,
    pub ammo: ProjectileKind,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            lives: 5,
            start_x: 250.0,
            idle_ms: 1500.0,
            walk_ms: 500.0,
            walk_speed: 1.0,
            walk_frame_ms: 100.0,
            shoot_delay_ms: 250.0,
            shoot_ms: 1500.0,
            jump: ArcParams::new(-6.0, 1.0),
            damage_ms: 500.0,
            dying_gravity: 0.2,
            ammo: ProjectileKind::Egg,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    pub flying_speed: f32,
    pub throw_arc: ArcParams,
    pub bounce_arc: ArcParams,
    pub bounce_speed: f32,
    pub drop_speed: f32,
    /// Ticks a bounced or dropped projectile may linger before removal.
    pub terminal_ttl_ticks: u32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            flying_speed: 1.0,
            throw_arc: ArcParams::new(-4.0, 1.0),
            bounce_arc: ArcParams::new(-4.0, 1.0),
            bounce_speed: 2.0,
            drop_speed: 1.0,
            terminal_ttl_ticks: 600,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MatchTimings {
    pub intro_ms: f32,
    /// Fallback if the loser never reports falling off-screen.
    pub outcome_delay_ms: f32,
}

impl Default for MatchTimings {
    fn default() -> Self {
        Self { intro_ms: 3000.0, outcome_delay_ms: 10_000.0 }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub world: WorldConfig,
    pub player: PlayerTuning,
    pub boss: BossTuning,
    pub projectile: ProjectileTuning,
    pub timing: MatchTimings,
}

impl MatchConfig {
    pub fn from_ron(path: &str, contents: &str) -> Result<Self, ConfigError> {
        let config: MatchConfig = ron::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Strict load: any problem is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        Self::from_ron(&display, &contents)
    }

    /// Lenient load used by the binary: falls back to defaults on failure.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded match config from {}", path.display());
                config
            }
            Err(ConfigError::Read { path, source }) => {
                log::warn!("Could not read {path}: {source}. Using defaults.");
                Self::default()
            }
            Err(e) => {
                log::error!("{e}. Using defaults.");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.world;
        if w.width <= 0.0 || w.height <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "world must have a positive size, got {}x{}",
                w.width, w.height
            )));
        }
        if w.ground_y <= 0.0 || w.ground_y > w.height {
            return Err(ConfigError::Invalid(format!(
                "ground_y {} outside the world",
                w.ground_y
            )));
        }
        if self.player.lives == 0 || self.boss.lives == 0 {
            return Err(ConfigError::Invalid("both combatants need at least one life".into()));
        }
        let gravities = [
            self.player.jump.g,
            self.player.fall_gravity,
            self.player.dying_gravity,
            self.boss.jump.g,
            self.boss.dying_gravity,
            self.projectile.throw_arc.g,
            self.projectile.bounce_arc.g,
        ];
        if gravities.iter().any(|g| *g <= 0.0) {
            return Err(ConfigError::Invalid("gravity must be positive".into()));
        }
        Ok(())
    }

    /// `pos.y` of a character standing on the ground, given its box shape.
    pub fn ground_top(&self, foot: f32) -> f32 {
        self.world.ground_y - foot
    }
}
