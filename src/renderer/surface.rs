//! Drawing surfaces
//!
//! A [`Surface`] is anything that can fill rectangles and discs at a fixed
//! size. The browser host paints onto a canvas; tests and the native host use
//! [`RecordingSurface`].

use super::shapes::{Color, DrawCommand};

/// Minimal 2D fill API
pub trait Surface {
    /// Width and height in pixels
    fn size(&self) -> (f32, f32);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Color);
}

/// Replay commands in order
pub fn paint(commands: &[DrawCommand], surface: &mut dyn Surface) {
    for command in commands {
        match *command {
            DrawCommand::FillRect { x, y, w, h, color } => surface.fill_rect(x, y, w, h, color),
            DrawCommand::FillCircle {
                x,
                y,
                radius,
                color,
            } => surface.fill_circle(x, y, radius, color),
        }
    }
}

/// Stores every command it is asked to draw
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub width: f32,
    pub height: f32,
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.commands
            .push(DrawCommand::FillRect { x, y, w, h, color });
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillCircle {
            x,
            y,
            radius,
            color,
        });
    }
}
