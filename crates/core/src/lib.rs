//! Paper Burn Core Library
//!
//! A burning sheet of paper on a charcoal backdrop, simulated on a coarse
//! scalar grid. Fire spreads between neighbouring cells, chars the paper and
//! turns it to ash while hot cells throw embers, ash flakes and smoke.
//!
//! ## Pipeline
//!
//! - [`FireGrid`] steps the fire, burn and ash fields (double-buffered gather)
//! - [`ParticleSystem`] integrates a bounded pool of particles
//! - [`Compositor`] turns both into ordered [`DrawCommand`]s
//! - [`PaperBurn`] drives the three per frame and cycles the effect
//!
//! The core never touches a window or a GPU. Hosts replay the draw commands
//! through a [`Rasterizer`] of their own, or through the software
//! [`FrameBuffer`].

// Core types and utilities
pub mod core_types;

// Simulation stages
pub mod grid;
pub mod particles;
pub mod render;

// Effect driver
pub mod simulation;

// Re-export core types
pub use core_types::{Particle, ParticleKind, Rgba, SpeedMultiplier, Vec2};

// Re-export stage types
pub use grid::{FieldData, FireGrid, GridCoord, GridParams, Ignition};
pub use particles::{ParticleParams, ParticleSystem};
pub use render::{
    cell_color, submit, BlendMode, Compositor, DrawCommand, FrameBuffer, PaperLayout,
    PaperTexture, Rasterizer, Rect, Scene, Viewport, TEXEL_SIZE,
};

// Re-export the effect
pub use simulation::{
    ConfigError, EffectConfig, EffectPhase, EffectStats, PaperBurn, DEFAULT_GRID_SIZE,
    MAX_GRID_SIZE, MAX_PAPER_SIZE, MAX_PARTICLE_CAPACITY,
};
