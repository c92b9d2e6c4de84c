//! Software rasterizer over an opaque RGB pixel buffer

use super::{BlendMode, Rasterizer, Rect};
use crate::core_types::color::Rgba;
use std::io::{self, Write};

/// Opaque RGB framebuffer implementing [`Rasterizer`]
///
/// Normal blending is source-over (`dst = src·a + dst·(1-a)`); additive
/// blending is `dst = min(255, dst + src·a)`. Fills are clipped to the
/// buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 3]>,
    blend: BlendMode,
}

impl FrameBuffer {
    /// Create a black framebuffer
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0, 0, 0]; width as usize * height as usize],
            blend: BlendMode::Normal,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at `(x, y)`, `None` when out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        (x < self.width && y < self.height)
            .then(|| self.pixels[y as usize * self.width as usize + x as usize])
    }

    /// Fill every pixel with an opaque colour
    pub fn clear(&mut self, color: Rgba) {
        self.pixels.fill([color.r, color.g, color.b]);
    }

    /// Resize, discarding contents
    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self {
            blend: self.blend,
            ..Self::new(width, height)
        };
    }

    /// Encode as binary PPM (P6)
    ///
    /// # Errors
    ///
    /// Propagates any error from `writer`.
    pub fn write_ppm<W: Write>(&self, mut writer: W) -> io::Result<()> {
        write!(writer, "P6\n{} {}\n255\n", self.width, self.height)?;
        for px in &self.pixels {
            writer.write_all(px)?;
        }
        writer.flush()
    }

    fn clip(&self, rect: Rect) -> Option<(usize, usize, usize, usize)> {
        let x0 = i64::from(rect.x).max(0);
        let y0 = i64::from(rect.y).max(0);
        let x1 = (i64::from(rect.x) + i64::from(rect.w)).min(i64::from(self.width));
        let y1 = (i64::from(rect.y) + i64::from(rect.h)).min(i64::from(self.height));
        (x0 < x1 && y0 < y1).then_some((x0 as usize, y0 as usize, x1 as usize, y1 as usize))
    }
}

impl Rasterizer for FrameBuffer {
    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend = mode;
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        if color.a == 0 {
            return;
        }

        let a = color.alpha_f32();
        let src = [f32::from(color.r), f32::from(color.g), f32::from(color.b)];
        let width = self.width as usize;
        let blend = self.blend;

        for y in y0..y1 {
            for px in &mut self.pixels[y * width + x0..y * width + x1] {
                for (channel, &s) in px.iter_mut().zip(src.iter()) {
                    let d = f32::from(*channel);
                    let out = match blend {
                        BlendMode::Normal => s * a + d * (1.0 - a),
                        BlendMode::Additive => d + s * a,
                    };
                    *channel = out.round().clamp(0.0, 255.0) as u8;
                }
            }
        }
    }
}
