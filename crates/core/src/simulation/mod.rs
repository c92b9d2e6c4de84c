//! Effect driver: configuration, phase machine and per-frame orchestration

mod config;
mod paper_burn;

pub use config::{
    ConfigError, EffectConfig, DEFAULT_GRID_SIZE, MAX_GRID_SIZE, MAX_PAPER_SIZE,
    MAX_PARTICLE_CAPACITY,
};
pub use paper_burn::{EffectPhase, EffectStats, PaperBurn};
