//! Sky Gap - a side-scrolling gap-dodging arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacles, collisions, scoring)
//! - `renderer`: 2D canvas drawing (commands + surfaces)
//! - `config`: Tunable game constants with validation and persistence
//! - `leaderboard`: Ledger leaderboard wire types and score submission seam

pub mod config;
pub mod leaderboard;
pub mod renderer;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use leaderboard::{LeaderboardEntry, ScoreSubmission, ScoreSubmitter, SubmitError};

/// Game configuration constants (defaults for [`GameConfig`])
pub mod consts {
    /// Drawing surface size in pixels
    pub const SURFACE_WIDTH: f32 = 400.0;
    pub const SURFACE_HEIGHT: f32 = 600.0;

    /// Actor defaults - x never changes during a session
    pub const ACTOR_X: f32 = 100.0;
    pub const ACTOR_SIZE: f32 = 20.0;
    /// Added to vertical velocity every frame (pixels/frame²)
    pub const GRAVITY: f32 = 0.5;
    /// Velocity set by a jump (negative is up)
    pub const JUMP_IMPULSE: f32 = -8.0;

    /// Obstacle defaults
    pub const OBSTACLE_WIDTH: f32 = 60.0;
    pub const OBSTACLE_GAP: f32 = 150.0;
    /// Leftward scroll per frame
    pub const SCROLL_SPEED: f32 = 3.0;
    /// Frames between spawns (spawn fires when the timer reaches this)
    pub const SPAWN_INTERVAL: u32 = 90;
    /// Minimum distance between a gap edge and the surface edge
    pub const MIN_MARGIN: f32 = 100.0;

    /// Decoration sizes
    pub const CAP_HEIGHT: f32 = 30.0;
    pub const CAP_OVERHANG: f32 = 5.0;
    pub const EYE_OFFSET_X: f32 = 8.0;
    pub const EYE_OFFSET_Y: f32 = -5.0;
    pub const EYE_RADIUS: f32 = 3.0;
}

