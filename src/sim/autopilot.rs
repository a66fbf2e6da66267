//! Demo autopilot
//!
//! Picks the next gap the actor still has to clear and flaps whenever it
//! sinks below that gap's center. Drives the headless native host.

use super::state::GameState;

/// Distance below the target before flapping
const SLACK: f32 = 15.0;

/// Vertical center of the next gap, or the surface middle when none is ahead
pub fn target_y(state: &GameState) -> f32 {
    let width = state.config.obstacle_width;
    state
        .obstacles
        .iter()
        .find(|o| o.right(width) >= state.actor.left())
        .map(|o| (o.top_height + o.bottom_y) / 2.0)
        .unwrap_or(state.config.height / 2.0)
}

/// Whether a jump now keeps the actor on track
pub fn wants_jump(state: &GameState) -> bool {
    state.is_running() && state.actor.vel >= 0.0 && state.actor.pos.y > target_y(state) + SLACK
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::Obstacle;

    fn running() -> GameState {
        let mut state = GameState::new(GameConfig::default(), 11).unwrap();
        state.start();
        state
    }

    #[test]
    fn test_targets_surface_middle_without_obstacles() {
        assert_eq!(target_y(&running()), 300.0);
    }

    #[test]
    fn test_targets_first_uncleared_gap() {
        let mut state = running();
        // Already behind the actor
        state.obstacles.push(Obstacle::new(-30.0, 100.0, 150.0));
        state.obstacles.push(Obstacle::new(250.0, 200.0, 150.0));
        assert_eq!(target_y(&state), 275.0);
    }

    #[test]
    fn test_jumps_only_when_low_and_falling() {
        let mut state = running();
        state.actor.pos.y = 330.0;
        state.actor.vel = 1.0;
        assert!(wants_jump(&state));

        state.actor.vel = -3.0;
        assert!(!wants_jump(&state));

        state.actor.vel = 1.0;
        state.actor.pos.y = 310.0;
        assert!(!wants_jump(&state));
    }

    #[test]
    fn test_never_jumps_when_not_running() {
        let mut state = GameState::new(GameConfig::default(), 11).unwrap();
        state.actor.pos.y = 500.0;
        assert!(!wants_jump(&state));
    }

    #[test]
    fn test_outlasts_free_fall() {
        let mut idle = running();
        let mut idle_frames = 0;
        while idle.is_running() {
            idle.step();
            idle_frames += 1;
        }

        let mut piloted = running();
        let mut piloted_frames = 0;
        while piloted.is_running() && piloted_frames < 2000 {
            if wants_jump(&piloted) {
                piloted.trigger_jump();
            }
            piloted.step();
            piloted_frames += 1;
        }
        assert!(piloted_frames > idle_frames);
    }
}
