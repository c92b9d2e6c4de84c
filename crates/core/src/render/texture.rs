//! Paper grain, rolled once per effect

use super::Rect;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Side of one grain texel in pixels
pub const TEXEL_SIZE: u32 = 4;

/// Per-texel opacity of the paper sheet
///
/// Texels cover the sheet row by row in `TEXEL_SIZE` squares; the last
/// column and row are cut short when the sheet is not a multiple of the
/// texel size. Every alpha lies in `[MIN_ALPHA, 255]`, with about half the
/// texels fully opaque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperTexture {
    columns: u32,
    rows: u32,
    alphas: Vec<u8>,
}

impl PaperTexture {
    /// Faintest texel alpha
    pub const MIN_ALPHA: u8 = 245;

    /// Roll the grain for a `width × height` pixel sheet
    pub fn generate<R: Rng + ?Sized>(width: u32, height: u32, rng: &mut R) -> Self {
        let columns = width.div_ceil(TEXEL_SIZE);
        let rows = height.div_ceil(TEXEL_SIZE);
        let alphas = (0..columns as usize * rows as usize)
            .map(|_| (255 + rng.random_range(-10..10_i32)).min(255) as u8)
            .collect();
        Self {
            columns,
            rows,
            alphas,
        }
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of texels
    pub fn len(&self) -> usize {
        self.alphas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alphas.is_empty()
    }

    /// Alpha of the texel at `(column, row)`
    pub fn alpha(&self, column: u32, row: u32) -> u8 {
        self.alphas[(row * self.columns + column) as usize]
    }

    /// Texel rectangles laid over `paper`, row by row, with their alpha
    pub fn texels(&self, paper: Rect) -> impl Iterator<Item = (Rect, u8)> + '_ {
        (0..self.rows).flat_map(move |row| {
            (0..self.columns).map(move |column| {
                let x = column * TEXEL_SIZE;
                let y = row * TEXEL_SIZE;
                let rect = Rect::new(
                    paper.x + x as i32,
                    paper.y + y as i32,
                    TEXEL_SIZE.min(paper.w.saturating_sub(x)),
                    TEXEL_SIZE.min(paper.h.saturating_sub(y)),
                );
                (rect, self.alpha(column, row))
            })
        })
    }
}
