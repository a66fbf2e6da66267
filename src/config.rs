//! Game tuning and surface configuration
//!
//! Persisted separately from scores in LocalStorage so a tweaked build can be
//! replayed with the same feel.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Reasons a configuration is rejected
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be a finite number")]
    NonFinite(&'static str),
    #[error("surface must have positive size, got {width}x{height}")]
    InvalidSurface { width: f32, height: f32 },
    #[error("actor of size {size} does not fit a surface of height {height}")]
    ActorTooLarge { size: f32, height: f32 },
    #[error("gravity must be positive, got {0}")]
    InvalidGravity(f32),
    #[error("jump impulse must point up (negative), got {0}")]
    InvalidJump(f32),
    #[error("scroll speed must be positive, got {0}")]
    InvalidScrollSpeed(f32),
    #[error("obstacle width and gap must be positive")]
    InvalidObstacle,
    #[error("spawn interval must be at least one frame")]
    InvalidSpawnInterval,
    #[error("no room for a gap: height {height} < gap {gap} + 2 x margin {margin}")]
    NoSpawnRange { height: f32, gap: f32, margin: f32 },
    #[error("invalid config json: {0}")]
    Json(String),
}

/// Physics and layout constants for one game surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Surface ===
    pub width: f32,
    pub height: f32,

    // === Actor ===
    pub actor_x: f32,
    /// Collision radius
    pub actor_size: f32,
    pub gravity: f32,
    pub jump_impulse: f32,

    // === Obstacles ===
    pub obstacle_width: f32,
    /// Vertical opening between top and bottom barrier
    pub gap: f32,
    pub scroll_speed: f32,
    /// Frames between spawns
    pub spawn_interval: u32,
    /// Minimum distance between a gap and the surface edges
    pub min_margin: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: SURFACE_WIDTH,
            height: SURFACE_HEIGHT,

            actor_x: ACTOR_X,
            actor_size: ACTOR_SIZE,
            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,

            obstacle_width: OBSTACLE_WIDTH,
            gap: OBSTACLE_GAP,
            scroll_speed: SCROLL_SPEED,
            spawn_interval: SPAWN_INTERVAL,
            min_margin: MIN_MARGIN,
        }
    }
}

impl GameConfig {
    /// Default tuning on a surface of the given size
    pub fn with_surface(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Check every constraint the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in self.float_fields() {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite(name));
            }
        }
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ConfigError::InvalidSurface {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.actor_size > 0.0) || self.actor_size * 2.0 >= self.height {
            return Err(ConfigError::ActorTooLarge {
                size: self.actor_size,
                height: self.height,
            });
        }
        if !(self.gravity > 0.0) {
            return Err(ConfigError::InvalidGravity(self.gravity));
        }
        if !(self.jump_impulse < 0.0) {
            return Err(ConfigError::InvalidJump(self.jump_impulse));
        }
        if !(self.scroll_speed > 0.0) {
            return Err(ConfigError::InvalidScrollSpeed(self.scroll_speed));
        }
        if !(self.obstacle_width > 0.0 && self.gap > 0.0) {
            return Err(ConfigError::InvalidObstacle);
        }
        if self.spawn_interval == 0 {
            return Err(ConfigError::InvalidSpawnInterval);
        }
        if self.min_margin < 0.0 || self.min_spawn_top() > self.max_spawn_top() {
            return Err(ConfigError::NoSpawnRange {
                height: self.height,
                gap: self.gap,
                margin: self.min_margin,
            });
        }
        Ok(())
    }

    fn float_fields(&self) -> [(&'static str, f32); 10] {
        [
            ("width", self.width),
            ("height", self.height),
            ("actor_x", self.actor_x),
            ("actor_size", self.actor_size),
            ("gravity", self.gravity),
            ("jump_impulse", self.jump_impulse),
            ("obstacle_width", self.obstacle_width),
            ("gap", self.gap),
            ("scroll_speed", self.scroll_speed),
            ("min_margin", self.min_margin),
        ]
    }

    /// Lowest allowed gap top
    pub fn min_spawn_top(&self) -> f32 {
        self.min_margin
    }

    /// Highest allowed gap top (gap bottom stays `min_margin` above the floor)
    pub fn max_spawn_top(&self) -> f32 {
        self.height - self.gap - self.min_margin
    }

    /// Parse and validate a JSON config; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string(self).map_err(|e| ConfigError::Json(e.to_string()))
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "sky_gap_config";

    /// Load config from LocalStorage (WASM only), falling back to defaults
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {}", e),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Save config to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match self.to_json() {
                Ok(json) => {
                    let _ = storage.set_item(Self::STORAGE_KEY, &json);
                    log::info!("Config saved");
                }
                Err(e) => log::warn!("Config not saved: {}", e),
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GameConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.min_spawn_top(), 100.0);
        assert_eq!(config.max_spawn_top(), 250.0);
    }

    #[test]
    fn test_rejects_surface_without_spawn_room() {
        let config = GameConfig::with_surface(400.0, 300.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NoSpawnRange { .. })
        ));
    }

    #[test]
    fn test_rejects_downward_jump() {
        let config = GameConfig {
            jump_impulse: 4.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidJump(4.0)));
    }

    #[test]
    fn test_rejects_zero_spawn_interval() {
        let config = GameConfig {
            spawn_interval: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidSpawnInterval));
    }

    #[test]
    fn test_json_fills_missing_fields() {
        let config = GameConfig::from_json(r#"{"height": 800.0, "gap": 180.0}"#).unwrap();
        assert_eq!(config.height, 800.0);
        assert_eq!(config.gap, 180.0);
        assert_eq!(config.gravity, GRAVITY);

        let back = GameConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_json_rejects_invalid_values() {
        assert!(matches!(
            GameConfig::from_json(r#"{"gravity": -1.0}"#),
            Err(ConfigError::InvalidGravity(_))
        ));
        assert!(matches!(
            GameConfig::from_json("not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_rejects_non_finite_values() {
        // 1e39 overflows f32 to infinity
        assert_eq!(
            GameConfig::from_json(r#"{"height": 1e39}"#),
            Err(ConfigError::NonFinite("height"))
        );

        let config = GameConfig {
            min_margin: f32::NAN,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NonFinite("min_margin")));

        let config = GameConfig {
            actor_x: f32::NEG_INFINITY,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NonFinite("actor_x")));
    }

    #[test]
    fn test_state_refuses_non_finite_config() {
        let config = GameConfig {
            gap: f32::INFINITY,
            ..Default::default()
        };
        assert_eq!(
            crate::sim::GameState::new(config, 1).err(),
            Some(ConfigError::NonFinite("gap"))
        );
    }
}
