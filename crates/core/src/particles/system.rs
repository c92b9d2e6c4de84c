//! Particle pool with per-kind physics
//!
//! The pool never grows past its capacity: once full, further spawn requests
//! are dropped and counted. Dropped particles are purely cosmetic, so this is
//! not reported as an error.
//!
//! # Per-step update
//!
//! For every live particle, in slot order:
//!
//! 1. Integrate position with the current velocity
//! 2. Apply kind forces
//!    - ash: `vy += ash_gravity · k`
//!    - smoke: `vy -= smoke_lift · k`, `vx += sin(wind_phase + slot) · smoke_drift · k`
//! 3. Fade: `life -= fade_rate · k`, and smoke additionally `life -= smoke_extra_fade · k`
//!
//! Then one compaction pass drops every particle whose life reached zero.

use crate::core_types::particle::{Particle, ParticleKind};
use crate::core_types::vec2::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Pool size and per-step physics constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleParams {
    /// Maximum live particles
    pub capacity: usize,
    /// Life lost per step by every particle
    pub fade_rate: f32,
    /// Additional life lost per step by smoke
    pub smoke_extra_fade: f32,
    /// Downward acceleration on ash (pixels/step²)
    pub ash_gravity: f32,
    /// Upward acceleration on smoke (pixels/step²)
    pub smoke_lift: f32,
    /// Amplitude of the horizontal wind sway on smoke
    pub smoke_drift: f32,
    /// Horizontal launch jitter around the spawn origin (pixels)
    pub jitter: f32,
}

impl Default for ParticleParams {
    fn default() -> Self {
        Self {
            capacity: 1000,
            fade_rate: 0.01,
            smoke_extra_fade: 0.005,
            ash_gravity: 0.1,
            smoke_lift: 0.05,
            smoke_drift: 0.2,
            jitter: 5.0,
        }
    }
}

/// Bounded pool of live particles
///
/// Live particles are kept packed at the front of a `Vec` whose capacity is
/// reserved up front, so spawning never reallocates.
pub struct ParticleSystem {
    particles: Vec<Particle>,
    params: ParticleParams,
    dropped: u64,
}

impl ParticleSystem {
    #[must_use]
    pub fn new(params: ParticleParams) -> Self {
        Self {
            particles: Vec::with_capacity(params.capacity),
            params,
            dropped: 0,
        }
    }

    /// Spawn one particle near `origin`
    ///
    /// # Returns
    ///
    /// `false` if the pool is full and the request was dropped.
    pub fn spawn<R: Rng + ?Sized>(&mut self, origin: Vec2, kind: ParticleKind, rng: &mut R) -> bool {
        if self.particles.len() >= self.params.capacity {
            self.dropped += 1;
            return false;
        }
        self.particles
            .push(Particle::launch(origin, kind, self.params.jitter, rng));
        true
    }

    /// Insert an already-built particle, subject to the same capacity rule
    #[cfg(test)]
    fn insert(&mut self, particle: Particle) -> bool {
        if self.particles.len() >= self.params.capacity {
            self.dropped += 1;
            return false;
        }
        self.particles.push(particle);
        true
    }

    /// Advance every particle by one step and drop the dead ones
    ///
    /// `wind_phase` drives the smoke sway; each slot is offset by its index so
    /// neighbouring puffs wiggle out of step.
    pub fn update(&mut self, speed_multiplier: f32, wind_phase: f32) {
        let k = speed_multiplier.max(0.0);
        let p = self.params;

        for (slot, particle) in self.particles.iter_mut().enumerate() {
            particle.position += particle.velocity * k;

            match particle.kind {
                ParticleKind::Ash => {
                    particle.velocity.y += p.ash_gravity * k;
                }
                ParticleKind::Smoke => {
                    particle.velocity.y -= p.smoke_lift * k;
                    particle.velocity.x += (wind_phase + slot as f32).sin() * p.smoke_drift * k;
                }
                ParticleKind::Ember => {}
            }

            particle.life -= p.fade_rate * k;
            if particle.kind == ParticleKind::Smoke {
                particle.life -= p.smoke_extra_fade * k;
            }
        }

        let before = self.particles.len();
        self.particles.retain(Particle::is_alive);
        let expired = before - self.particles.len();
        if expired > 0 {
            debug!(
                "Particle step: {} expired, {} live",
                expired,
                self.particles.len()
            );
        }
    }

    /// Remove every particle and reset the drop counter
    pub fn clear(&mut self) {
        self.particles.clear();
        self.dropped = 0;
    }

    /// Live particles in slot order
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.params.capacity
    }

    /// Spawn requests dropped at capacity since the last clear
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
