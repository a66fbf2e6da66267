//! Collision and scoring tests
//!
//! Everything is axis-aligned interval overlap on the actor's bounding square.
//! No swept or sub-pixel tests: a fast actor can tunnel through a thin
//! obstacle between frames.

use super::state::{Actor, Obstacle};

/// Open-interval overlap: touching edges do not count
#[inline]
pub fn intervals_overlap(a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> bool {
    a_max > b_min && a_min < b_max
}

/// Actor extends past the top or bottom of a surface of `height`
pub fn out_of_bounds(actor: &Actor, height: f32) -> bool {
    actor.bottom() > height || actor.top() < 0.0
}

/// Actor overlaps the obstacle horizontally and is outside its gap
pub fn hits_obstacle(actor: &Actor, obstacle: &Obstacle, width: f32) -> bool {
    if !intervals_overlap(actor.left(), actor.right(), obstacle.x, obstacle.right(width)) {
        return false;
    }
    actor.top() < obstacle.top_height || actor.bottom() > obstacle.bottom_y
}

/// Actor center is beyond the obstacle's right edge
pub fn has_cleared(actor: &Actor, obstacle: &Obstacle, width: f32) -> bool {
    actor.pos.x > obstacle.right(width)
}
