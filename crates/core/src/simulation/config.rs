//! Effect configuration and validation

use crate::grid::{GridParams, Ignition};
use crate::particles::ParticleParams;
use crate::render::Compositor;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default grid resolution (cells per side)
pub const DEFAULT_GRID_SIZE: usize = 80;

/// Largest accepted grid side in cells
pub const MAX_GRID_SIZE: usize = 4096;

/// Largest accepted particle pool
pub const MAX_PARTICLE_CAPACITY: usize = 1_000_000;

/// Largest accepted paper side in pixels
pub const MAX_PAPER_SIZE: u32 = 8192;

/// Why an [`EffectConfig`] was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Grid must be at least 3x3 to have interior cells, got {width}x{height}")]
    GridTooSmall { width: usize, height: usize },

    #[error("Grid may be at most {max}x{max}, got {width}x{height}")]
    GridTooLarge {
        width: usize,
        height: usize,
        max: usize,
    },

    #[error("Ignition at ({x}, {y}) is outside the {width}x{height} grid")]
    IgnitionOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("Parameter {name} must be {expected}, got {value}")]
    InvalidParameter {
        name: &'static str,
        value: f32,
        expected: &'static str,
    },

    #[error("Particle capacity must be positive")]
    ZeroCapacity,

    #[error("Particle capacity may be at most {max}, got {capacity}")]
    CapacityTooLarge { capacity: usize, max: usize },

    #[error("Paper must have a non-zero size, got {width}x{height}")]
    EmptyPaper { width: u32, height: u32 },

    #[error("Paper may be at most {max}x{max}, got {width}x{height}")]
    PaperTooLarge { width: u32, height: u32, max: u32 },
}

/// Complete description of one paper-burn effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectConfig {
    pub grid_width: usize,
    pub grid_height: usize,
    pub grid: GridParams,
    pub particles: ParticleParams,
    /// Seeds lit on every reset
    pub ignitions: Vec<Ignition>,

    /// Paper sheet size in destination pixels
    pub paper_width: u32,
    pub paper_height: u32,

    /// Seconds (of effect clock) for the paper to fade in
    pub paper_appear_time: f32,
    /// Seconds the burn is expected to take
    pub total_burn_time: f32,
    /// Extra seconds after the burn before the effect may go dormant
    pub cooldown: f32,

    /// Chance per hot cell per step of emitting a particle
    pub spawn_chance: f32,

    /// Backdrop and paper colours
    pub compositor: Compositor,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            grid_width: DEFAULT_GRID_SIZE,
            grid_height: DEFAULT_GRID_SIZE,
            grid: GridParams::default(),
            particles: ParticleParams::default(),
            ignitions: Ignition::defaults(DEFAULT_GRID_SIZE, DEFAULT_GRID_SIZE),
            paper_width: 600,
            paper_height: 800,
            paper_appear_time: 2.0,
            total_burn_time: 20.0,
            cooldown: 10.0,
            spawn_chance: 3.0 / 200.0,
            compositor: Compositor::default(),
        }
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            value,
            expected: "finite and non-negative",
        })
    }
}

fn unit_interval(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            value,
            expected: "within [0, 1]",
        })
    }
}

impl EffectConfig {
    /// Default effect on a square grid of `size` cells, seeds scaled to fit
    #[must_use]
    pub fn with_grid_size(size: usize) -> Self {
        Self {
            grid_width: size,
            grid_height: size,
            ignitions: Ignition::defaults(size, size),
            ..Self::default()
        }
    }

    /// Check every field against the ranges the effect is built for
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width < 3 || self.grid_height < 3 {
            return Err(ConfigError::GridTooSmall {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        if self.grid_width > MAX_GRID_SIZE || self.grid_height > MAX_GRID_SIZE {
            return Err(ConfigError::GridTooLarge {
                width: self.grid_width,
                height: self.grid_height,
                max: MAX_GRID_SIZE,
            });
        }
        if let Some(ign) = self
            .ignitions
            .iter()
            .find(|ign| ign.x >= self.grid_width || ign.y >= self.grid_height)
        {
            return Err(ConfigError::IgnitionOutOfBounds {
                x: ign.x,
                y: ign.y,
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        for ign in &self.ignitions {
            unit_interval("ignition.intensity", ign.intensity)?;
        }

        let g = &self.grid;
        unit_interval("grid.spread_threshold", g.spread_threshold)?;
        unit_interval("grid.burn_threshold", g.burn_threshold)?;
        unit_interval("grid.ash_threshold", g.ash_threshold)?;
        non_negative("grid.spread_rate", g.spread_rate)?;
        non_negative("grid.decay_rate", g.decay_rate)?;
        non_negative("grid.burn_rate", g.burn_rate)?;
        non_negative("grid.ash_rate", g.ash_rate)?;

        let p = &self.particles;
        if p.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if p.capacity > MAX_PARTICLE_CAPACITY {
            return Err(ConfigError::CapacityTooLarge {
                capacity: p.capacity,
                max: MAX_PARTICLE_CAPACITY,
            });
        }
        non_negative("particles.fade_rate", p.fade_rate)?;
        non_negative("particles.smoke_extra_fade", p.smoke_extra_fade)?;
        non_negative("particles.jitter", p.jitter)?;
        for (name, value) in [
            ("particles.ash_gravity", p.ash_gravity),
            ("particles.smoke_lift", p.smoke_lift),
            ("particles.smoke_drift", p.smoke_drift),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::InvalidParameter {
                    name,
                    value,
                    expected: "finite",
                });
            }
        }

        if self.paper_width == 0 || self.paper_height == 0 {
            return Err(ConfigError::EmptyPaper {
                width: self.paper_width,
                height: self.paper_height,
            });
        }
        if self.paper_width > MAX_PAPER_SIZE || self.paper_height > MAX_PAPER_SIZE {
            return Err(ConfigError::PaperTooLarge {
                width: self.paper_width,
                height: self.paper_height,
                max: MAX_PAPER_SIZE,
            });
        }
        non_negative("paper_appear_time", self.paper_appear_time)?;
        non_negative("total_burn_time", self.total_burn_time)?;
        non_negative("cooldown", self.cooldown)?;
        unit_interval("spawn_chance", self.spawn_chance)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(EffectConfig::default().validate(), Ok(()));
        assert_eq!(EffectConfig::with_grid_size(12).validate(), Ok(()));
    }

    #[test]
    fn test_tiny_grid_rejected() {
        let config = EffectConfig {
            grid_width: 2,
            ignitions: Vec::new(),
            ..EffectConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::GridTooSmall {
                width: 2,
                height: 80
            })
        );
    }

    #[test]
    fn test_ignition_out_of_bounds_rejected() {
        let config = EffectConfig {
            ignitions: vec![Ignition::new(80, 0, 0.5)],
            ..EffectConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::IgnitionOutOfBounds { x: 80, y: 0, .. })
        ));
    }

    #[test]
    fn test_bad_rates_rejected() {
        let mut config = EffectConfig::default();
        config.grid.decay_rate = -0.1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter {
                name: "grid.decay_rate",
                ..
            })
        ));

        let config = EffectConfig {
            spawn_chance: f32::NAN,
            ..EffectConfig::default()
        };
        assert!(config.validate().is_err());

        let mut config = EffectConfig::default();
        config.particles.capacity = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroCapacity));
    }

    #[test]
    fn test_oversized_allocations_rejected() {
        let mut config = EffectConfig::default();
        config.particles.capacity = usize::MAX / 2;
        assert_eq!(
            config.validate(),
            Err(ConfigError::CapacityTooLarge {
                capacity: usize::MAX / 2,
                max: MAX_PARTICLE_CAPACITY
            })
        );

        config.particles.capacity = MAX_PARTICLE_CAPACITY;
        assert_eq!(config.validate(), Ok(()));

        let config = EffectConfig::with_grid_size(MAX_GRID_SIZE + 1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GridTooLarge { max: MAX_GRID_SIZE, .. })
        ));

        let config = EffectConfig {
            paper_width: u32::MAX,
            ..EffectConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PaperTooLarge { width: u32::MAX, .. })
        ));
    }

    #[test]
    fn test_small_grids_are_valid() {
        for size in 3..10 {
            assert_eq!(EffectConfig::with_grid_size(size).validate(), Ok(()));
        }
    }

    #[test]
    fn test_error_messages() {
        let err = ConfigError::EmptyPaper {
            width: 0,
            height: 800,
        };
        assert_eq!(err.to_string(), "Paper must have a non-zero size, got 0x800");
    }
}
