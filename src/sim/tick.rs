//! Fixed-step frame advance
//!
//! One call is one frame. There is no delta time: game speed follows the
//! host's frame rate.

use super::collision::{has_cleared, hits_obstacle, out_of_bounds};
use super::state::{EndCause, GamePhase, GameState};

/// Advance the session by one frame. No-op unless running.
pub fn step(state: &mut GameState) {
    if state.phase != GamePhase::Running {
        return;
    }
    state.frame += 1;

    let config = state.config;

    // Actor physics
    state.actor.integrate(config.gravity);
    if out_of_bounds(&state.actor, config.height) {
        state.end(EndCause::Boundary);
        return;
    }

    // Spawning
    state.spawn_timer += 1;
    if state.spawn_timer >= config.spawn_interval {
        state.spawn_obstacle();
        state.spawn_timer = 0;
    }

    // Scroll, then drop anything fully past the left edge
    for obstacle in &mut state.obstacles {
        obstacle.x -= config.scroll_speed;
    }
    state
        .obstacles
        .retain(|o| !o.is_offscreen(config.obstacle_width));

    let actor = state.actor;
    if state
        .obstacles
        .iter()
        .any(|o| hits_obstacle(&actor, o, config.obstacle_width))
    {
        state.end(EndCause::Collision);
        return;
    }

    for i in 0..state.obstacles.len() {
        let obstacle = &state.obstacles[i];
        if !obstacle.passed && has_cleared(&actor, obstacle, config.obstacle_width) {
            state.award(i);
        }
    }
}
