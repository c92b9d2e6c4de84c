//! Short-lived visual particles lofted from burning paper
//!
//! Three kinds of particle leave a burning sheet:
//!
//! 1. **Embers** - bright orange sparks thrown upward, fully opaque
//! 2. **Ash** - dark gray flecks that drift and then fall under gravity
//! 3. **Smoke** - pale translucent puffs that keep rising and sway in the wind
//!
//! A particle only carries its own kinematic state. Forces and fade rates
//! live in [`crate::particles::ParticleParams`].

use crate::core_types::color::Rgba;
use crate::core_types::vec2::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Particle species, determining launch ranges, colour and forces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticleKind {
    Ember,
    Ash,
    Smoke,
}

impl ParticleKind {
    pub const ALL: [ParticleKind; 3] = [ParticleKind::Ember, ParticleKind::Ash, ParticleKind::Smoke];

    /// Pick a kind uniformly at random
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// A single particle in screen space
///
/// # Example
///
/// ```
/// use paper_burn_core::{Particle, ParticleKind, Vec2};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let ember = Particle::launch(Vec2::new(300.0, 400.0), ParticleKind::Ember, 5.0, &mut rng);
///
/// assert_eq!(ember.life, 1.0);
/// assert!(ember.velocity.y < 0.0); // thrown upward
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Destination-pixel position
    pub position: Vec2,
    /// Pixels per simulation step
    pub velocity: Vec2,
    /// Remaining life (1 at launch, removed once it reaches 0)
    pub life: f32,
    pub kind: ParticleKind,
    /// Side length in pixels at full life
    pub size: f32,
    pub color: Rgba,
}

impl Particle {
    /// Launch a new particle near `origin`
    ///
    /// Launch ranges (pixels per step):
    /// - horizontal position jittered by up to `±jitter`
    /// - `vx ∈ [-2, 2)` for every kind
    /// - ember `vy ∈ [-3, -1)`, ash `vy ∈ [-0.5, 0.5)`, smoke `vy ∈ [-3.5, -0.5)`
    /// - size 2, 3 or 4 pixels
    pub fn launch<R: Rng + ?Sized>(origin: Vec2, kind: ParticleKind, jitter: f32, rng: &mut R) -> Self {
        let jitter = jitter.abs();
        let position = Vec2::new(origin.x + rng.random_range(-jitter..=jitter), origin.y);

        let vx = rng.random_range(-2.0..2.0);
        let (vy, color) = match kind {
            // Glowing red/orange
            ParticleKind::Ember => (
                rng.random_range(-3.0..-1.0),
                Rgba::new(255, rng.random_range(100..200), 0, 255),
            ),
            // Dark gray, mostly opaque
            ParticleKind::Ash => (
                rng.random_range(-0.5..0.5),
                Rgba::gray(rng.random_range(50..150), 200),
            ),
            // Light gray, translucent, gentler rise
            ParticleKind::Smoke => (
                rng.random_range(-3.5..-0.5),
                Rgba::gray(rng.random_range(150..250), 100),
            ),
        };

        Self {
            position,
            velocity: Vec2::new(vx, vy),
            life: 1.0,
            kind,
            size: f32::from(rng.random_range(2_u8..=4)),
            color,
        }
    }

    /// Whether the particle still has life left
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_launch_ranges_per_kind() {
        let mut rng = StdRng::seed_from_u64(42);
        let origin = Vec2::new(100.0, 200.0);

        for _ in 0..500 {
            for kind in ParticleKind::ALL {
                let p = Particle::launch(origin, kind, 5.0, &mut rng);
                assert!((p.position.x - origin.x).abs() <= 5.0);
                assert_eq!(p.position.y, origin.y);
                assert!((-2.0..2.0).contains(&p.velocity.x));
                assert!((2.0..=4.0).contains(&p.size));
                assert_eq!(p.life, 1.0);
                assert_eq!(p.kind, kind);

                match kind {
                    ParticleKind::Ember => {
                        assert!(p.velocity.y < -1.0 + f32::EPSILON);
                        assert_eq!((p.color.r, p.color.b, p.color.a), (255, 0, 255));
                        assert!((100..200).contains(&p.color.g));
                    }
                    ParticleKind::Ash => {
                        assert!((-0.5..0.5).contains(&p.velocity.y));
                        assert_eq!(p.color.a, 200);
                        assert!((50..150).contains(&p.color.r));
                    }
                    ParticleKind::Smoke => {
                        assert!(p.velocity.y < -0.5 + f32::EPSILON);
                        assert_eq!(p.color.a, 100);
                        assert!((150..250).contains(&p.color.r));
                        assert_eq!(p.color.r, p.color.g);
                    }
                }
            }
        }
    }

    #[test]
    fn test_zero_jitter_spawns_on_origin() {
        let mut rng = StdRng::seed_from_u64(3);
        let p = Particle::launch(Vec2::new(10.0, 20.0), ParticleKind::Smoke, 0.0, &mut rng);
        assert_eq!(p.position, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_random_kind_covers_all() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut seen = [false; 3];
        for _ in 0..200 {
            match ParticleKind::random(&mut rng) {
                ParticleKind::Ember => seen[0] = true,
                ParticleKind::Ash => seen[1] = true,
                ParticleKind::Smoke => seen[2] = true,
            }
        }
        assert!(seen.iter().all(|&s| s));
    }
}
