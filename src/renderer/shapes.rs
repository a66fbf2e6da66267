//! Scene to draw-command conversion
//!
//! Pure function of the game state: nothing here mutates the simulation, so a
//! frozen `Ended` or `Idle` frame paints the same way every time.

use serde::{Deserialize, Serialize};

use crate::consts::{CAP_HEIGHT, CAP_OVERHANG, EYE_OFFSET_X, EYE_OFFSET_Y, EYE_RADIUS};
use crate::sim::{Actor, GameState, Obstacle};

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// From a 0xRRGGBB literal
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: (rgb >> 16) as u8,
            g: (rgb >> 8) as u8,
            b: rgb as u8,
        }
    }

    /// CSS `#rrggbb` form for canvas fill styles
    pub fn css(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Colors for each scene element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub sky: Color,
    pub actor: Color,
    pub eye: Color,
    pub obstacle: Color,
    pub cap: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            sky: Color::hex(0x87CEEB),
            actor: Color::hex(0xFFD700),
            eye: Color::hex(0x000000),
            obstacle: Color::hex(0x228B22),
            cap: Color::hex(0x196F3D),
        }
    }
}

/// One drawing primitive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    FillRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
    },
    FillCircle {
        x: f32,
        y: f32,
        radius: f32,
        color: Color,
    },
}

/// Background, then actor, then obstacles in spawn order
pub fn draw_commands(state: &GameState, palette: &Palette) -> Vec<DrawCommand> {
    let config = &state.config;
    let mut commands = Vec::with_capacity(3 + state.obstacles.len() * 4);

    commands.push(DrawCommand::FillRect {
        x: 0.0,
        y: 0.0,
        w: config.width,
        h: config.height,
        color: palette.sky,
    });
    actor_commands(&state.actor, palette, &mut commands);
    for obstacle in &state.obstacles {
        obstacle_commands(
            obstacle,
            config.obstacle_width,
            config.height,
            palette,
            &mut commands,
        );
    }

    commands
}

/// Body disc plus the eye mark
fn actor_commands(actor: &Actor, palette: &Palette, out: &mut Vec<DrawCommand>) {
    out.push(DrawCommand::FillCircle {
        x: actor.pos.x,
        y: actor.pos.y,
        radius: actor.size,
        color: palette.actor,
    });
    out.push(DrawCommand::FillCircle {
        x: actor.pos.x + EYE_OFFSET_X,
        y: actor.pos.y + EYE_OFFSET_Y,
        radius: EYE_RADIUS,
        color: palette.eye,
    });
}

/// Top and bottom barrier with a wider cap at each gap edge
fn obstacle_commands(
    obstacle: &Obstacle,
    width: f32,
    surface_height: f32,
    palette: &Palette,
    out: &mut Vec<DrawCommand>,
) {
    out.push(DrawCommand::FillRect {
        x: obstacle.x,
        y: 0.0,
        w: width,
        h: obstacle.top_height,
        color: palette.obstacle,
    });
    out.push(DrawCommand::FillRect {
        x: obstacle.x,
        y: obstacle.bottom_y,
        w: width,
        h: surface_height - obstacle.bottom_y,
        color: palette.obstacle,
    });

    let cap_x = obstacle.x - CAP_OVERHANG;
    let cap_w = width + CAP_OVERHANG * 2.0;
    out.push(DrawCommand::FillRect {
        x: cap_x,
        y: obstacle.top_height - CAP_HEIGHT,
        w: cap_w,
        h: CAP_HEIGHT,
        color: palette.cap,
    });
    out.push(DrawCommand::FillRect {
        x: cap_x,
        y: obstacle.bottom_y,
        w: cap_w,
        h: CAP_HEIGHT,
        color: palette.cap,
    });
}
