//! The paper-burn effect: grid, particles and compositor driven per frame
//!
//! # Frame order
//!
//! ```text
//! update(dt, speed):
//!     Dormant?  -> reset
//!     clock    += dt · speed
//!     grid      step            -> hot cells (post-step state)
//!     particles spawn per hot cell (spawn_chance, random kind)
//!     particles step            (wind phase = clock)
//!     phase     recomputed
//! render()      -> draw commands
//! ```
//!
//! # Phases
//!
//! `FadingIn` while the clock is below `paper_appear_time`, then `Burning`
//! until the clock passes `total_burn_time + cooldown` with no particles
//! left, which makes the effect `Dormant`. The next `update` resets it to a
//! freshly seeded sheet.

use super::config::{ConfigError, EffectConfig};
use crate::core_types::particle::ParticleKind;
use crate::core_types::units::SpeedMultiplier;
use crate::grid::FireGrid;
use crate::particles::ParticleSystem;
use crate::render::{Compositor, DrawCommand, PaperLayout, PaperTexture, Scene, Viewport};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

/// Lifecycle state of the effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectPhase {
    /// Paper fading in; fire already running
    FadingIn,
    /// Fire and/or particles active
    Burning,
    /// Burn over and every particle gone, waiting for reset
    Dormant,
}

/// Snapshot of the effect for reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectStats {
    pub elapsed: f32,
    pub phase: EffectPhase,
    pub live_particles: usize,
    pub dropped_particles: u64,
    pub hot_cells: usize,
    pub fire_mass: f32,
    pub burned_fraction: f32,
    pub ash_fraction: f32,
    pub cycles_completed: u64,
}

/// Paper-burn effect owning its simulation state and random source
///
/// # Example
///
/// ```
/// use paper_burn_core::{EffectConfig, EffectPhase, PaperBurn, SpeedMultiplier, Viewport};
///
/// let mut effect = PaperBurn::seeded(EffectConfig::default(), Viewport::new(800, 900), 42)
///     .expect("default config is valid");
///
/// for _ in 0..60 {
///     effect.update(0.016, SpeedMultiplier::NORMAL);
/// }
///
/// assert_eq!(effect.phase(), EffectPhase::FadingIn);
/// assert!(!effect.render().is_empty());
/// ```
pub struct PaperBurn<R: Rng = StdRng> {
    config: EffectConfig,
    grid: FireGrid,
    particles: ParticleSystem,
    compositor: Compositor,
    viewport: Viewport,
    layout: PaperLayout,
    texture: PaperTexture,
    rng: R,

    elapsed: f32,
    phase: EffectPhase,
    cycles_completed: u64,
}

impl PaperBurn<StdRng> {
    /// Create an effect with a deterministic random source
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails validation.
    pub fn seeded(config: EffectConfig, viewport: Viewport, seed: u64) -> Result<Self, ConfigError> {
        Self::new(config, viewport, StdRng::seed_from_u64(seed))
    }

    /// Create an effect seeded from OS entropy
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails validation.
    pub fn from_entropy(config: EffectConfig, viewport: Viewport) -> Result<Self, ConfigError> {
        Self::new(config, viewport, StdRng::from_os_rng())
    }
}

impl<R: Rng> PaperBurn<R> {
    /// Create an effect drawing randomness from `rng`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails validation.
    pub fn new(config: EffectConfig, viewport: Viewport, mut rng: R) -> Result<Self, ConfigError> {
        config.validate()?;

        let grid = FireGrid::new(
            config.grid_width,
            config.grid_height,
            config.grid,
            config.ignitions.clone(),
        );
        let particles = ParticleSystem::new(config.particles);
        let layout = Self::layout_for(&config, viewport);
        let texture = PaperTexture::generate(config.paper_width, config.paper_height, &mut rng);

        info!(
            "Paper burn initialized: {}x{} grid, {}x{} paper in {}x{} viewport, {} particle slots",
            config.grid_width,
            config.grid_height,
            config.paper_width,
            config.paper_height,
            viewport.width,
            viewport.height,
            config.particles.capacity
        );

        let mut effect = Self {
            compositor: config.compositor,
            config,
            grid,
            particles,
            viewport,
            layout,
            texture,
            rng,
            elapsed: 0.0,
            phase: EffectPhase::FadingIn,
            cycles_completed: 0,
        };
        effect.phase = effect.next_phase();
        Ok(effect)
    }

    fn layout_for(config: &EffectConfig, viewport: Viewport) -> PaperLayout {
        PaperLayout::new(
            viewport,
            config.paper_width,
            config.paper_height,
            config.grid_width,
            config.grid_height,
        )
    }

    /// Re-seed the grid, clear every particle and rewind the clock
    ///
    /// Does not touch the random source or the paper grain, so resetting
    /// twice is the same as resetting once.
    pub fn reset(&mut self) {
        self.grid.reset();
        self.particles.clear();
        self.elapsed = 0.0;
        self.phase = self.next_phase();
        info!("Paper reset (cycle {})", self.cycles_completed + 1);
    }

    /// Re-fit the paper to a new viewport
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport != self.viewport {
            debug!(
                "Viewport resized to {}x{}",
                viewport.width, viewport.height
            );
            self.viewport = viewport;
            self.layout = Self::layout_for(&self.config, viewport);
        }
    }

    /// Advance the effect by one frame
    ///
    /// `dt` advances the effect clock (scaled by `speed`); the grid and
    /// particles always take exactly one step. Negative or non-finite `dt`
    /// is treated as zero.
    pub fn update(&mut self, dt: f32, speed: SpeedMultiplier) {
        if self.phase == EffectPhase::Dormant {
            self.reset();
        }

        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let k = speed.get();
        self.elapsed += dt * k;

        let hot = self.grid.update(k);
        let mut spawned = 0_usize;
        for cell in hot {
            if self.rng.random::<f32>() < self.config.spawn_chance {
                let kind = ParticleKind::random(&mut self.rng);
                let origin = self.layout.cell_origin(cell.x, cell.y);
                if self.particles.spawn(origin, kind, &mut self.rng) {
                    spawned += 1;
                }
            }
        }

        self.particles.update(k, self.elapsed);

        trace!(
            "Frame t={:.3}: {} hot cells, {} spawned, {} live particles",
            self.elapsed,
            self.grid.hot_cells().len(),
            spawned,
            self.particles.len()
        );

        let next = self.next_phase();
        if next != self.phase {
            info!(
                "Phase {:?} -> {:?} at t={:.2}s",
                self.phase, next, self.elapsed
            );
            if next == EffectPhase::Dormant {
                self.cycles_completed += 1;
                debug!(
                    "Cycle complete: {:.0}% ash, {} spawns dropped",
                    self.grid.ash_fraction() * 100.0,
                    self.particles.dropped()
                );
            }
            self.phase = next;
        }
    }

    fn next_phase(&self) -> EffectPhase {
        if self.elapsed < self.config.paper_appear_time {
            EffectPhase::FadingIn
        } else if self.elapsed > self.config.total_burn_time + self.config.cooldown
            && self.particles.is_empty()
        {
            EffectPhase::Dormant
        } else {
            EffectPhase::Burning
        }
    }

    /// Paper opacity in `[0, 1]`, ramping up over `paper_appear_time`
    pub fn paper_alpha(&self) -> f32 {
        if self.config.paper_appear_time <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.config.paper_appear_time).clamp(0.0, 1.0)
        }
    }

    /// Draw commands for the current state, back to front
    #[must_use]
    pub fn render(&self) -> Vec<DrawCommand> {
        let mut out = Vec::new();
        self.render_into(&mut out);
        out
    }

    /// Draw commands into a reusable buffer (cleared first)
    pub fn render_into(&self, out: &mut Vec<DrawCommand>) {
        let scene = Scene {
            viewport: self.viewport,
            layout: &self.layout,
            texture: &self.texture,
            paper_alpha: self.paper_alpha(),
            grid: &self.grid,
            particles: self.particles.particles(),
        };
        self.compositor.render_into(out, &scene);
    }

    pub fn stats(&self) -> EffectStats {
        EffectStats {
            elapsed: self.elapsed,
            phase: self.phase,
            live_particles: self.particles.len(),
            dropped_particles: self.particles.dropped(),
            hot_cells: self.grid.hot_cells().len(),
            fire_mass: self.grid.fire_mass(),
            burned_fraction: self.grid.burned_fraction(),
            ash_fraction: self.grid.ash_fraction(),
            cycles_completed: self.cycles_completed,
        }
    }

    pub fn phase(&self) -> EffectPhase {
        self.phase
    }

    /// Effect clock in seconds since the last reset
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn grid(&self) -> &FireGrid {
        &self.grid
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn layout(&self) -> &PaperLayout {
        &self.layout
    }

    /// Paper grain rolled when the effect was created
    pub fn texture(&self) -> &PaperTexture {
        &self.texture
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{BlendMode, Rect};
    use approx::assert_relative_eq;

    fn effect() -> PaperBurn {
        PaperBurn::seeded(EffectConfig::default(), Viewport::new(600, 800), 7).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EffectConfig {
            grid_width: 1,
            ..EffectConfig::default()
        };
        assert!(PaperBurn::seeded(config, Viewport::new(10, 10), 1).is_err());
    }

    #[test]
    fn test_starts_fading_in() {
        let effect = effect();
        assert_eq!(effect.phase(), EffectPhase::FadingIn);
        assert_eq!(effect.elapsed(), 0.0);
        assert_eq!(effect.paper_alpha(), 0.0);
    }

    #[test]
    fn test_clock_scales_with_speed() {
        let mut effect = effect();
        effect.update(0.5, SpeedMultiplier::new(2.0));
        assert_relative_eq!(effect.elapsed(), 1.0);
        assert_relative_eq!(effect.paper_alpha(), 0.5);

        effect.update(-1.0, SpeedMultiplier::NORMAL);
        effect.update(f32::NAN, SpeedMultiplier::NORMAL);
        assert_relative_eq!(effect.elapsed(), 1.0);

        effect.update(1.5, SpeedMultiplier::NORMAL);
        assert_eq!(effect.phase(), EffectPhase::Burning);
        assert_eq!(effect.paper_alpha(), 1.0);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut effect = effect();
        for _ in 0..200 {
            effect.update(0.016, SpeedMultiplier::NORMAL);
        }
        assert!(!effect.particles().is_empty());

        effect.reset();
        let once = (effect.grid().fire().clone(), effect.stats(), effect.render());
        effect.reset();
        let twice = (effect.grid().fire().clone(), effect.stats(), effect.render());

        assert_eq!(once, twice);
        assert!(effect.particles().is_empty());
        assert_eq!(effect.elapsed(), 0.0);
        assert_eq!(effect.grid().burn().sum(), 0.0);
    }

    #[test]
    fn test_render_starts_with_backdrop() {
        let effect = effect();
        let commands = effect.render();
        assert_eq!(commands[0], DrawCommand::SetBlendMode(BlendMode::Normal));
        assert!(matches!(
            commands[1],
            DrawCommand::FillRect { rect, .. } if rect == Rect::new(0, 0, 600, 800)
        ));
        assert_eq!(
            commands.last(),
            Some(&DrawCommand::SetBlendMode(BlendMode::Normal))
        );
    }

    #[test]
    fn test_grain_is_fixed_per_effect() {
        let mut sheet = effect();
        let grain = sheet.texture().clone();
        assert_eq!(grain.len(), 150 * 200);

        for _ in 0..50 {
            sheet.update(0.016, SpeedMultiplier::NORMAL);
        }
        sheet.reset();
        sheet.resize(Viewport::new(1000, 1000));
        assert_eq!(sheet.texture(), &grain);
        assert_eq!(effect().texture(), &grain);
    }

    #[test]
    fn test_resize_moves_paper() {
        let mut effect = effect();
        effect.resize(Viewport::new(1000, 1000));
        assert_eq!(effect.layout().paper, Rect::new(200, 200, 600, 800));
        assert_eq!(effect.viewport(), Viewport::new(1000, 1000));
    }
}
