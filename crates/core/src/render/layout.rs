//! Placement of the paper sheet inside the host viewport

use crate::core_types::vec2::Vec2;
use crate::render::Rect;
use serde::{Deserialize, Serialize};

/// Host drawing surface size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The whole surface as a rectangle
    #[must_use]
    pub const fn rect(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }
}

/// Paper rectangle and grid cell geometry in destination pixels
///
/// The sheet is centred horizontally and sits on the bottom edge. On a
/// viewport smaller than the sheet the origin goes negative and the
/// rasterizer clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperLayout {
    pub paper: Rect,
    pub grid_width: usize,
    pub grid_height: usize,
}

impl PaperLayout {
    #[must_use]
    pub fn new(
        viewport: Viewport,
        paper_width: u32,
        paper_height: u32,
        grid_width: usize,
        grid_height: usize,
    ) -> Self {
        let x = (i64::from(viewport.width) - i64::from(paper_width)) / 2;
        let y = i64::from(viewport.height) - i64::from(paper_height);
        Self {
            paper: Rect::new(x as i32, y as i32, paper_width, paper_height),
            grid_width,
            grid_height,
        }
    }

    /// Whole-pixel cell size (integer division)
    #[must_use]
    pub fn cell_size(&self) -> (u32, u32) {
        (
            self.paper.w / self.grid_width.max(1) as u32,
            self.paper.h / self.grid_height.max(1) as u32,
        )
    }

    /// Destination rectangle of a grid cell
    ///
    /// One pixel wider and taller than the cell pitch so neighbouring
    /// cells overlap instead of leaving seams.
    #[must_use]
    pub fn cell_rect(&self, x: usize, y: usize) -> Rect {
        let (cw, ch) = self.cell_size();
        Rect::new(
            self.paper.x + (x as u32 * cw) as i32,
            self.paper.y + (y as u32 * ch) as i32,
            cw + 1,
            ch + 1,
        )
    }

    /// Sub-pixel position of a cell's top-left corner, used as the
    /// particle spawn origin
    #[must_use]
    pub fn cell_origin(&self, x: usize, y: usize) -> Vec2 {
        let pitch_x = self.paper.w as f32 / self.grid_width.max(1) as f32;
        let pitch_y = self.paper.h as f32 / self.grid_height.max(1) as f32;
        Vec2::new(
            self.paper.x as f32 + x as f32 * pitch_x,
            self.paper.y as f32 + y as f32 * pitch_y,
        )
    }
}
