//! Layered compositing of the burning sheet
//!
//! Layers, back to front:
//!
//! 1. Backdrop over the whole viewport
//! 2. Paper grain, one rectangle per texel, faded in by `paper_alpha`
//! 3. Burn/ash overlay, one rectangle per damaged cell
//! 4. Particles, additively blended so overlapping embers brighten
//!
//! # Overlay colour
//!
//! - Ash (`ash > 0`): opaque gray `255 - ⌊ash·255⌋`, hiding any burn colour
//! - Burn (`burn > 0`): yellow → red → black ramp
//!   - `burn ≤ 0.5`: `r = 255`, `g = ⌊burn·255⌋`
//!   - `burn > 0.5`: `r = 255 - ⌊(burn-0.5)·510⌋`, `g = 128 - ⌊(burn-0.5)·256⌋`
//!   - alpha follows the current fire, `⌊fire·200⌋`
//! - Otherwise nothing is drawn for the cell

use super::{BlendMode, DrawCommand, PaperLayout, PaperTexture, Rect, Viewport};
use crate::core_types::color::Rgba;
use crate::core_types::particle::Particle;
use crate::grid::FireGrid;
use serde::{Deserialize, Serialize};

/// Everything one frame is drawn from
#[derive(Clone, Copy)]
pub struct Scene<'a> {
    pub viewport: Viewport,
    pub layout: &'a PaperLayout,
    pub texture: &'a PaperTexture,
    /// Paper fade in `[0, 1]`, scales every texel's alpha
    pub paper_alpha: f32,
    pub grid: &'a FireGrid,
    pub particles: &'a [Particle],
}

/// Converts grid and particle state into draw commands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Compositor {
    pub background: Rgba,
    pub paper: Rgba,
}

impl Default for Compositor {
    fn default() -> Self {
        Self {
            background: Rgba::CHARCOAL,
            paper: Rgba::PAPER,
        }
    }
}

impl Compositor {
    /// Build a full frame
    #[must_use]
    pub fn render(&self, scene: &Scene<'_>) -> Vec<DrawCommand> {
        let mut out = Vec::new();
        self.render_into(&mut out, scene);
        out
    }

    /// Build a full frame into a reusable buffer (cleared first)
    pub fn render_into(&self, out: &mut Vec<DrawCommand>, scene: &Scene<'_>) {
        out.clear();
        out.push(DrawCommand::SetBlendMode(BlendMode::Normal));
        out.push(DrawCommand::FillRect {
            rect: scene.viewport.rect(),
            color: self.background,
        });

        let fade = scene.paper_alpha.clamp(0.0, 1.0);
        out.extend(
            scene
                .texture
                .texels(scene.layout.paper)
                .map(|(rect, alpha)| DrawCommand::FillRect {
                    rect,
                    color: self.paper.with_alpha((f32::from(alpha) * fade) as u8),
                }),
        );

        Self::push_overlay(out, scene.layout, scene.grid);

        out.push(DrawCommand::SetBlendMode(BlendMode::Additive));
        out.extend(scene.particles.iter().filter_map(Self::particle_command));
        out.push(DrawCommand::SetBlendMode(BlendMode::Normal));
    }

    fn push_overlay(out: &mut Vec<DrawCommand>, layout: &PaperLayout, grid: &FireGrid) {
        let (fire, burn, ash) = (grid.fire(), grid.burn(), grid.ash());
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let color = cell_color(fire.get(x, y), burn.get(x, y), ash.get(x, y));
                if let Some(color) = color {
                    out.push(DrawCommand::FillRect {
                        rect: layout.cell_rect(x, y),
                        color,
                    });
                }
            }
        }
    }

    fn particle_command(particle: &Particle) -> Option<DrawCommand> {
        if !particle.is_alive() {
            return None;
        }
        let life = particle.life.min(1.0);
        let size = ((particle.size * life) as i32).max(1);
        let alpha = (f32::from(particle.color.a) * life) as u8;
        Some(DrawCommand::FillRect {
            rect: Rect::new(
                particle.position.x as i32 - size / 2,
                particle.position.y as i32 - size / 2,
                size as u32,
                size as u32,
            ),
            color: particle.color.with_alpha(alpha),
        })
    }
}

/// Overlay colour for one cell, `None` when the cell is untouched
#[must_use]
pub fn cell_color(fire: f32, burn: f32, ash: f32) -> Option<Rgba> {
    if ash > 0.0 {
        let gray = 255 - (ash.min(1.0) * 255.0) as i32;
        return Some(Rgba::gray(gray as u8, 255));
    }
    if burn > 0.0 {
        let burn = burn.min(1.0);
        let (r, g) = if burn > 0.5 {
            (
                255 - ((burn - 0.5) * 2.0 * 255.0) as i32,
                128 - ((burn - 0.5) * 256.0) as i32,
            )
        } else {
            (255, (burn * 255.0) as i32)
        };
        let alpha = (fire.clamp(0.0, 1.0) * 200.0) as i32;
        return Some(Rgba::new(
            r.clamp(0, 255) as u8,
            g.clamp(0, 255) as u8,
            0,
            alpha as u8,
        ));
    }
    None
}
