//! # Game Configuration
//!
//! Loaded once at startup from TOML. Every field has a default, so a file
//! only needs the values it changes:
//!
//! ```toml
//! seed = 7
//!
//! [memory]
//! pool_capacity = 512
//!
//! [tuning]
//! enemy_spawn_interval = 0.5
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use swarm_core::ArenaConfig;
use swarm_shared::{Vec2, RENDER_SIZE, TICK_RATE, WINDOW_SIZE};
use thiserror::Error;

use crate::gameplay::layers;

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`GameConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Window and render target sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title.
    pub title: String,
    /// Window width in pixels.
    pub width: f32,
    /// Window height in pixels.
    pub height: f32,
    /// World render target width.
    pub render_width: f32,
    /// World render target height.
    pub render_height: f32,
    /// Frames per second the driver aims for.
    pub target_fps: u32,
}

impl WindowConfig {
    /// Window size as a vector.
    #[must_use]
    pub fn window_size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// World render target size as a vector.
    #[must_use]
    pub fn render_size(&self) -> Vec2 {
        Vec2::new(self.render_width, self.render_height)
    }

    /// Frame budget in microseconds.
    #[must_use]
    pub fn frame_budget_us(&self) -> u64 {
        1_000_000 / u64::from(self.target_fps.max(1))
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "swarm".to_owned(),
            width: WINDOW_SIZE.x,
            height: WINDOW_SIZE.y,
            render_width: RENDER_SIZE.x,
            render_height: RENDER_SIZE.y,
            target_fps: TICK_RATE,
        }
    }
}

/// Pool, renderer and arena sizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Object pool slots.
    pub pool_capacity: usize,
    /// Renderer layers.
    pub layer_count: usize,
    /// Chunk size of the persistent arena.
    pub persistent_chunk_size: usize,
    /// Byte limit of the persistent arena.
    pub persistent_limit: Option<usize>,
    /// Chunk size of the transient arena.
    pub transient_chunk_size: usize,
    /// Byte limit of the transient arena.
    pub transient_limit: Option<usize>,
    /// Events buffered between drains before new ones are dropped.
    pub event_capacity: usize,
}

impl MemoryConfig {
    /// Sizing of the persistent arena.
    #[must_use]
    pub fn persistent_arena(&self) -> ArenaConfig {
        ArenaConfig {
            chunk_size: self.persistent_chunk_size,
            limit: self.persistent_limit,
        }
    }

    /// Sizing of the transient arena.
    #[must_use]
    pub fn transient_arena(&self) -> ArenaConfig {
        ArenaConfig {
            chunk_size: self.transient_chunk_size,
            limit: self.transient_limit,
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            pool_capacity: 2046,
            layer_count: 1024,
            persistent_chunk_size: 512 * 1024,
            persistent_limit: None,
            transient_chunk_size: 64 * 1024,
            transient_limit: Some(16 * 1024 * 1024),
            event_capacity: 256,
        }
    }
}

/// Gameplay constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    /// Player health at start.
    pub player_max_health: f32,
    /// Player square side.
    pub player_size: f32,
    /// Starting player speed (px/s).
    pub player_speed: f32,
    /// Speed gained per second.
    pub player_speed_gain: f32,
    /// Speed cap.
    pub player_max_speed: f32,
    /// Starting shot cooldown (s).
    pub shoot_time: f32,
    /// Cooldown lost per second.
    pub shoot_time_decay: f32,
    /// Cooldown floor.
    pub min_shoot_time: f32,
    /// Projectile square side.
    pub projectile_size: f32,
    /// Projectile speed (px/s).
    pub projectile_speed: f32,
    /// Seconds before a projectile expires.
    pub projectile_lifetime: f32,
    /// Enemy square side.
    pub enemy_size: f32,
    /// Enemy health.
    pub enemy_health: f32,
    /// Enemy chase speed (px/s).
    pub enemy_speed: f32,
    /// Health an enemy takes from the player on contact.
    pub enemy_contact_damage: f32,
    /// Seconds between spawns.
    pub enemy_spawn_interval: f32,
    /// Spawn offset range around the player, per axis.
    pub enemy_spawn_radius: i32,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            player_max_health: 10.0,
            player_size: 10.0,
            player_speed: 100.0,
            player_speed_gain: 0.01,
            player_max_speed: 120.0,
            shoot_time: 1.2,
            shoot_time_decay: 0.001,
            min_shoot_time: 0.7,
            projectile_size: 10.0,
            projectile_speed: 1000.0,
            projectile_lifetime: 2.0,
            enemy_size: 20.0,
            enemy_health: 10.0,
            enemy_speed: 100.0,
            enemy_contact_damage: 1.0,
            enemy_spawn_interval: 1.1,
            enemy_spawn_radius: 200,
        }
    }
}

/// Asset files used by the windowed client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Sprite atlas (background and cursor).
    pub atlas: PathBuf,
    /// HUD font.
    pub font: PathBuf,
    /// Played when the player fires.
    pub shoot_sound: PathBuf,
    /// Played when an enemy reaches the player.
    pub hit_sound: PathBuf,
    /// Played when an enemy dies.
    pub die_sound: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            atlas: PathBuf::from("res/atlas.png"),
            font: PathBuf::from("res/arial.ttf"),
            shoot_sound: PathBuf::from("res/shoot.wav"),
            hit_sound: PathBuf::from("res/hit.wav"),
            die_sound: PathBuf::from("res/die.wav"),
        }
    }
}

/// Complete game configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for enemy spawn positions.
    pub seed: u64,
    /// Window and render target sizes.
    pub window: WindowConfig,
    /// Memory sizing.
    pub memory: MemoryConfig,
    /// Gameplay constants.
    pub tuning: TuningConfig,
    /// Client asset paths.
    pub assets: AssetConfig,
}

impl GameConfig {
    /// Reads and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is unreadable, malformed or invalid.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parses and validates TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text is malformed or invalid.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the game cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let memory = &self.memory;
        if memory.pool_capacity < 2 {
            return Err(invalid("memory.pool_capacity must be at least 2"));
        }
        if memory.layer_count <= layers::MAX_USED {
            return Err(ConfigError::Invalid(format!(
                "memory.layer_count must be greater than {}",
                layers::MAX_USED
            )));
        }
        if memory.persistent_chunk_size == 0 || memory.transient_chunk_size == 0 {
            return Err(invalid("memory chunk sizes must be non-zero"));
        }
        if memory.event_capacity == 0 {
            return Err(invalid("memory.event_capacity must be non-zero"));
        }

        let window = &self.window;
        if window.width <= 0.0 || window.height <= 0.0 {
            return Err(invalid("window size must be positive"));
        }
        if window.render_width <= 0.0 || window.render_height <= 0.0 {
            return Err(invalid("render size must be positive"));
        }
        if window.target_fps == 0 {
            return Err(invalid("window.target_fps must be non-zero"));
        }

        let tuning = &self.tuning;
        let positive = [
            ("tuning.player_max_health", tuning.player_max_health),
            ("tuning.player_size", tuning.player_size),
            ("tuning.projectile_size", tuning.projectile_size),
            ("tuning.projectile_lifetime", tuning.projectile_lifetime),
            ("tuning.enemy_size", tuning.enemy_size),
            ("tuning.enemy_spawn_interval", tuning.enemy_spawn_interval),
        ];
        if let Some((name, _)) = positive.iter().find(|(_, value)| *value <= 0.0) {
            return Err(ConfigError::Invalid(format!("{name} must be positive")));
        }
        if tuning.enemy_spawn_radius < 0 {
            return Err(invalid("tuning.enemy_spawn_radius must not be negative"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::Invalid(message.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GameConfig::default();
        config.validate().unwrap();
        assert_eq!(config.memory.pool_capacity, 2046);
        assert_eq!(config.window.render_size(), Vec2::new(640.0, 360.0));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = GameConfig::from_toml_str(
            r#"
            seed = 99

            [memory]
            pool_capacity = 64

            [tuning]
            enemy_spawn_interval = 0.25
            "#,
        )
        .unwrap();

        assert_eq!(config.seed, 99);
        assert_eq!(config.memory.pool_capacity, 64);
        assert_eq!(config.memory.layer_count, 1024);
        assert_eq!(config.tuning.enemy_spawn_interval, 0.25);
        assert_eq!(config.tuning.shoot_time, 1.2);
    }

    #[test]
    fn test_too_few_layers_rejected() {
        let err = GameConfig::from_toml_str("[memory]\nlayer_count = 16\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_zero_pool_rejected() {
        let err = GameConfig::from_toml_str("[memory]\npool_capacity = 0\n").unwrap_err();
        assert!(err.to_string().contains("pool_capacity"));
    }

    #[test]
    fn test_malformed_toml() {
        let err = GameConfig::from_toml_str("seed = \"seven\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = GameConfig::from_path("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
