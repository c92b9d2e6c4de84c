//! Capacity-bounded particle pool for embers, ash and smoke

mod system;

pub use system::{ParticleParams, ParticleSystem};
