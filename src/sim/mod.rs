//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per call, no delta time
//! - Seeded RNG only
//! - Obstacles kept in spawn order
//! - No rendering, timers or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{has_cleared, hits_obstacle, intervals_overlap, out_of_bounds};
pub use state::{Actor, EndCause, GameEvent, GamePhase, GameState, Obstacle, Snapshot};
pub use tick::step;
