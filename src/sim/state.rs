//! Game state and core simulation types
//!
//! Everything one session needs lives in [`GameState`]; hosts own exactly one
//! value and drive it through `start`, `trigger_jump` and `step`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, GameConfig};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first start
    Idle,
    /// Active gameplay
    Running,
    /// Run ended, frozen until the next start
    Ended,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndCause {
    /// Actor left the surface through the top or bottom
    Boundary,
    /// Actor touched an obstacle
    Collision,
}

/// Session notifications for hosts, drained once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    SessionStarted,
    Jumped,
    ObstacleSpawned,
    Scored { score: u32 },
    SessionEnded { final_score: u32, cause: EndCause },
}

/// The player-controlled body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Center; x is fixed for the session
    pub pos: Vec2,
    /// Vertical velocity in pixels/frame (negative is up)
    pub vel: f32,
    /// Collision radius
    pub size: f32,
}

impl Actor {
    pub fn new(x: f32, y: f32, size: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            vel: 0.0,
            size,
        }
    }

    /// Explicit Euler step: velocity first, then position
    #[inline]
    pub fn integrate(&mut self, gravity: f32) {
        self.vel += gravity;
        self.pos.y += self.vel;
    }

    pub fn top(&self) -> f32 {
        self.pos.y - self.size
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size
    }

    pub fn left(&self) -> f32 {
        self.pos.x - self.size
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size
    }
}

/// A top/bottom barrier pair scrolling leftward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Left edge
    pub x: f32,
    /// Bottom edge of the top barrier (top of the gap)
    pub top_height: f32,
    /// Top edge of the bottom barrier (bottom of the gap)
    pub bottom_y: f32,
    /// Already scored
    pub passed: bool,
}

impl Obstacle {
    pub fn new(x: f32, top_height: f32, gap: f32) -> Self {
        Self {
            x,
            top_height,
            bottom_y: top_height + gap,
            passed: false,
        }
    }

    pub fn right(&self, width: f32) -> f32 {
        self.x + width
    }

    /// Fully scrolled past the left edge of the surface
    pub fn is_offscreen(&self, width: f32) -> bool {
        self.right(width) < 0.0
    }
}

/// Read-only view of a session for hosts and debugging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub actor: Actor,
    pub obstacles: Vec<Obstacle>,
    pub score: u32,
    pub frame: u64,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Tuning this state was built with
    pub config: GameConfig,
    /// Seed of the obstacle RNG
    pub seed: u64,
    /// Current phase
    pub phase: GamePhase,
    pub actor: Actor,
    /// Active obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    pub score: u32,
    /// Frames since the last spawn
    pub spawn_timer: u32,
    /// Frames stepped in this session
    pub frame: u64,
    rng: Pcg32,
    final_score: Option<u32>,
    ended_unread: bool,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create an idle state; fails if the config cannot host a game
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            seed,
            phase: GamePhase::Idle,
            actor: Actor::new(config.actor_x, config.height / 2.0, config.actor_size),
            obstacles: Vec::new(),
            score: 0,
            spawn_timer: 0,
            frame: 0,
            rng: Pcg32::seed_from_u64(seed),
            final_score: None,
            ended_unread: false,
            events: Vec::new(),
        })
    }

    /// Begin a fresh session (also used for restart)
    pub fn start(&mut self) {
        self.actor = Actor::new(
            self.config.actor_x,
            self.config.height / 2.0,
            self.config.actor_size,
        );
        self.obstacles.clear();
        self.score = 0;
        self.spawn_timer = 0;
        self.frame = 0;
        self.final_score = None;
        self.ended_unread = false;
        self.phase = GamePhase::Running;
        self.events.push(GameEvent::SessionStarted);
        log::info!("Session started (seed {})", self.seed);
    }

    /// Apply the jump impulse; ignored unless running
    pub fn trigger_jump(&mut self) -> bool {
        if self.phase != GamePhase::Running {
            return false;
        }
        self.actor.vel = self.config.jump_impulse;
        self.events.push(GameEvent::Jumped);
        true
    }

    /// Advance one frame (see [`super::tick::step`])
    pub fn step(&mut self) {
        super::tick::step(self);
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Score frozen at the end of the session, `None` while not ended
    pub fn final_score(&self) -> Option<u32> {
        self.final_score
    }

    /// Final score, handed out once per ended session
    pub fn take_ended(&mut self) -> Option<u32> {
        if !self.ended_unread {
            return None;
        }
        self.ended_unread = false;
        self.final_score
    }

    /// Drain queued notifications in emission order
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            actor: self.actor,
            obstacles: self.obstacles.clone(),
            score: self.score,
            frame: self.frame,
        }
    }

    /// Append an obstacle at the right edge with a random gap placement
    pub fn spawn_obstacle(&mut self) {
        let lo = self.config.min_spawn_top();
        let hi = self.config.max_spawn_top();
        let top_height = self.rng.random_range(lo..=hi);
        self.obstacles
            .push(Obstacle::new(self.config.width, top_height, self.config.gap));
        self.events.push(GameEvent::ObstacleSpawned);
        log::debug!("Obstacle spawned, gap {}..{}", top_height, top_height + self.config.gap);
    }

    /// Freeze the session; later calls are ignored
    pub(crate) fn end(&mut self, cause: EndCause) {
        if self.phase != GamePhase::Running {
            return;
        }
        self.phase = GamePhase::Ended;
        self.final_score = Some(self.score);
        self.ended_unread = true;
        self.events.push(GameEvent::SessionEnded {
            final_score: self.score,
            cause,
        });
        log::info!("Session ended ({:?}) with score {}", cause, self.score);
    }

    /// Mark an obstacle passed and award its point
    pub(crate) fn award(&mut self, index: usize) {
        let obstacle = &mut self.obstacles[index];
        if obstacle.passed {
            return;
        }
        obstacle.passed = true;
        self.score += 1;
        self.events.push(GameEvent::Scored { score: self.score });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(GameConfig::default(), 42).unwrap()
    }

    #[test]
    fn test_new_state_is_idle() {
        let state = state();
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.actor.pos, Vec2::new(100.0, 300.0));
        assert_eq!(state.final_score(), None);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = GameConfig::with_surface(400.0, 200.0);
        assert!(GameState::new(config, 1).is_err());
    }

    #[test]
    fn test_jump_ignored_outside_running() {
        let mut state = state();
        assert!(!state.trigger_jump());
        assert_eq!(state.actor.vel, 0.0);

        state.start();
        state.end(EndCause::Boundary);
        state.actor.vel = 1.5;
        assert!(!state.trigger_jump());
        assert_eq!(state.actor.vel, 1.5);
    }

    #[test]
    fn test_jump_overrides_velocity() {
        let mut state = state();
        state.start();
        state.actor.vel = 7.0;
        assert!(state.trigger_jump());
        assert_eq!(state.actor.vel, -8.0);
        // Last write wins, no queueing
        assert!(state.trigger_jump());
        assert_eq!(state.actor.vel, -8.0);
    }

    #[test]
    fn test_start_resets_session() {
        let mut state = state();
        state.start();
        state.obstacles.push(Obstacle::new(200.0, 120.0, 150.0));
        state.score = 4;
        state.spawn_timer = 33;
        state.actor.pos.y = 10.0;
        state.actor.vel = 3.0;
        state.end(EndCause::Collision);

        state.start();
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.spawn_timer, 0);
        assert_eq!(state.actor.pos.y, 300.0);
        assert_eq!(state.actor.vel, 0.0);
        assert_eq!(state.final_score(), None);
    }

    #[test]
    fn test_final_score_notified_once() {
        let mut state = state();
        state.start();
        state.score = 3;
        state.end(EndCause::Collision);
        // Second end is ignored
        state.end(EndCause::Boundary);

        assert_eq!(state.take_ended(), Some(3));
        assert_eq!(state.take_ended(), None);
        assert_eq!(state.final_score(), Some(3));
        assert_eq!(state.final_score(), Some(3));

        let ended = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::SessionEnded { .. }))
            .count();
        assert_eq!(ended, 1);
    }

    #[test]
    fn test_award_is_idempotent() {
        let mut state = state();
        state.start();
        state.obstacles.push(Obstacle::new(0.0, 100.0, 150.0));
        state.award(0);
        state.award(0);
        assert_eq!(state.score, 1);
        assert!(state.obstacles[0].passed);
    }

    #[test]
    fn test_spawn_respects_margins() {
        let mut state = state();
        state.start();
        for _ in 0..500 {
            state.spawn_obstacle();
        }
        for o in &state.obstacles {
            assert_eq!(o.x, 400.0);
            assert!(o.top_height >= 100.0 && o.top_height <= 250.0);
            assert_eq!(o.bottom_y - o.top_height, 150.0);
            assert!(o.bottom_y <= 500.0);
        }
    }

    #[test]
    fn test_same_seed_same_obstacles() {
        let mut a = GameState::new(GameConfig::default(), 7).unwrap();
        let mut b = GameState::new(GameConfig::default(), 7).unwrap();
        for _ in 0..10 {
            a.spawn_obstacle();
            b.spawn_obstacle();
        }
        assert_eq!(a.obstacles, b.obstacles);
    }
}
