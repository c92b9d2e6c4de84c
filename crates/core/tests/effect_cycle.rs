//! End-to-end runs of the paper-burn effect

use paper_burn_core::{
    EffectConfig, EffectPhase, ParticleParams, PaperBurn, SpeedMultiplier, Viewport,
};
use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

const DT: f32 = 0.016;

fn effect(seed: u64) -> PaperBurn {
    PaperBurn::seeded(EffectConfig::default(), Viewport::new(800, 900), seed).unwrap()
}

#[test]
fn test_full_cycle_goes_dormant_then_restarts() {
    let mut effect = effect(3);
    let mut phases = vec![effect.phase()];
    let mut peak_particles = 0;

    let mut frames = 0;
    while effect.phase() != EffectPhase::Dormant {
        effect.update(DT, SpeedMultiplier::NORMAL);
        peak_particles = peak_particles.max(effect.particles().len());
        if phases.last() != Some(&effect.phase()) {
            phases.push(effect.phase());
        }
        frames += 1;
        assert!(frames < 2500, "effect never went dormant: {:?}", effect.stats());
    }

    assert_eq!(
        phases,
        [EffectPhase::FadingIn, EffectPhase::Burning, EffectPhase::Dormant]
    );
    assert!(peak_particles > 0);

    let stats = effect.stats();
    assert!(stats.elapsed > 30.0);
    assert_eq!(stats.live_particles, 0);
    assert_eq!(stats.cycles_completed, 1);
    assert!(stats.ash_fraction > 0.99);

    // The next frame starts a fresh sheet
    effect.update(DT, SpeedMultiplier::NORMAL);
    assert_eq!(effect.phase(), EffectPhase::FadingIn);
    assert!(effect.elapsed() < 2.0 * DT);
    assert_eq!(effect.grid().ash().sum(), 0.0);
    assert_eq!(effect.cycles_completed(), 1);
}

#[test]
fn test_speed_shortens_the_cycle() {
    let frames_to_dormant = |speed: f32| {
        let mut effect = effect(11);
        let mut frames = 0;
        while effect.phase() != EffectPhase::Dormant && frames < 5000 {
            effect.update(DT, SpeedMultiplier::new(speed));
            frames += 1;
        }
        frames
    };

    let normal = frames_to_dormant(1.0);
    let fast = frames_to_dormant(3.0);
    assert!(fast < normal, "fast {fast} vs normal {normal}");
}

#[test]
fn test_same_seed_same_frames() {
    let mut a = effect(99);
    let mut b = effect(99);
    for _ in 0..300 {
        a.update(DT, SpeedMultiplier::NORMAL);
        b.update(DT, SpeedMultiplier::NORMAL);
    }
    assert!(!a.particles().is_empty());
    assert_eq!(a.particles().particles(), b.particles().particles());
    assert_eq!(a.render(), b.render());
}

#[test]
fn test_particle_pool_never_overflows() {
    let config = EffectConfig {
        spawn_chance: 1.0,
        particles: ParticleParams {
            capacity: 200,
            ..ParticleParams::default()
        },
        ..EffectConfig::default()
    };
    let mut effect = PaperBurn::seeded(config, Viewport::new(800, 900), 5).unwrap();

    for _ in 0..400 {
        effect.update(DT, SpeedMultiplier::NORMAL);
        assert!(effect.particles().len() <= 200);
    }
    assert!(effect.stats().dropped_particles > 0);
}

#[test]
fn test_stats_reflect_state() {
    let mut effect = effect(1);
    effect.update(DT, SpeedMultiplier::NORMAL);
    let stats = effect.stats();
    assert_eq!(stats.phase, EffectPhase::FadingIn);
    assert!(stats.fire_mass > 0.0);
    assert_eq!(stats.live_particles, effect.particles().len());
}
