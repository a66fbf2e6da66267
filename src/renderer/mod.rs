//! 2D rendering module
//!
//! The scene is a short list of filled rectangles and discs, built from the
//! game state and replayed onto whatever surface the host provides.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod shapes;
pub mod surface;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use shapes::{Color, DrawCommand, Palette, draw_commands};
pub use surface::{RecordingSurface, Surface, paint};

use crate::sim::GameState;

/// Paint the current frame; valid in every phase
pub fn render(state: &GameState, palette: &Palette, surface: &mut dyn Surface) {
    paint(&draw_commands(state, palette), surface);
}
