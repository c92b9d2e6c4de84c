//! Core types and utilities

pub mod color;
pub mod particle;
pub mod units;
pub mod vec2;

pub use color::Rgba;
pub use particle::{Particle, ParticleKind};
pub use units::SpeedMultiplier;
pub use vec2::Vec2;
