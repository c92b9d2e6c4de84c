//! Draw primitives and the stage that produces them
//!
//! The core never draws. [`Compositor`] turns simulation state into an
//! ordered list of [`DrawCommand`]s, and a host replays them onto whatever
//! surface it owns through the [`Rasterizer`] trait. [`FrameBuffer`] is a
//! software rasterizer for headless use and tests.

mod compositor;
mod framebuffer;
mod layout;
mod texture;

pub use compositor::{cell_color, Compositor, Scene};
pub use framebuffer::FrameBuffer;
pub use layout::{PaperLayout, Viewport};
pub use texture::{PaperTexture, TEXEL_SIZE};

use crate::core_types::color::Rgba;
use serde::{Deserialize, Serialize};

/// How a filled rectangle combines with what is already drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BlendMode {
    /// Source-over alpha blending
    #[default]
    Normal,
    /// `dst + src · alpha`, saturating
    Additive,
}

/// Axis-aligned rectangle in destination pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
}

/// One step of a frame's drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Blend mode for every following fill until the next change
    SetBlendMode(BlendMode),
    FillRect { rect: Rect, color: Rgba },
}

/// Drawing capability supplied by the host
pub trait Rasterizer {
    fn set_blend_mode(&mut self, mode: BlendMode);

    fn fill_rect(&mut self, rect: Rect, color: Rgba);
}

/// Replay `commands` onto `target` in order
pub fn submit<R: Rasterizer + ?Sized>(commands: &[DrawCommand], target: &mut R) {
    for command in commands {
        match *command {
            DrawCommand::SetBlendMode(mode) => target.set_blend_mode(mode),
            DrawCommand::FillRect { rect, color } => target.fill_rect(rect, color),
        }
    }
}
