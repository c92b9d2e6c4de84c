//! RGBA colour used by draw commands and particles

use serde::{Deserialize, Serialize};

/// 8-bit straight-alpha RGBA colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Backdrop behind the paper
    pub const CHARCOAL: Rgba = Rgba::new(20, 20, 20, 255);

    /// Creamy paper base colour
    pub const PAPER: Rgba = Rgba::new(255, 250, 245, 255);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Neutral gray with the given level and alpha
    #[must_use]
    pub const fn gray(level: u8, a: u8) -> Self {
        Self::new(level, level, level, a)
    }

    /// Same colour with a different alpha
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Alpha as a `[0, 1]` coverage factor
    #[must_use]
    pub fn alpha_f32(self) -> f32 {
        f32::from(self.a) / 255.0
    }
}
