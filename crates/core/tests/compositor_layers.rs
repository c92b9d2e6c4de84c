//! Frames of a running effect, checked as commands and as pixels

use paper_burn_core::{
    cell_color, submit, BlendMode, DrawCommand, EffectConfig, FrameBuffer, PaperBurn,
    PaperTexture, Rgba, SpeedMultiplier, Viewport,
};
use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

const VIEWPORT: Viewport = Viewport::new(800, 900);

fn burning_effect(frames: usize) -> PaperBurn {
    let mut effect = PaperBurn::seeded(EffectConfig::default(), VIEWPORT, 2024).unwrap();
    for _ in 0..frames {
        effect.update(0.016, SpeedMultiplier::NORMAL);
    }
    effect
}

fn paper_alphas(effect: &PaperBurn) -> Vec<u8> {
    effect.render()[2..2 + effect.texture().len()]
        .iter()
        .map(|c| match c {
            DrawCommand::FillRect { color, .. } => color.a,
            DrawCommand::SetBlendMode(_) => panic!("paper layer interrupted"),
        })
        .collect()
}

fn additive_marker(commands: &[DrawCommand]) -> usize {
    commands
        .iter()
        .position(|c| *c == DrawCommand::SetBlendMode(BlendMode::Additive))
        .expect("frame has a particle layer")
}

#[test]
fn test_ash_cells_are_drawn_before_particles() {
    let effect = burning_effect(250);
    let commands = effect.render();
    let split = additive_marker(&commands);
    let grid = effect.grid();

    let mut ash_cells = 0;
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let ash = grid.ash().get(x, y);
            if ash == 0.0 {
                continue;
            }
            ash_cells += 1;
            let expected = DrawCommand::FillRect {
                rect: effect.layout().cell_rect(x, y),
                color: cell_color(grid.fire().get(x, y), grid.burn().get(x, y), ash)
                    .expect("ash cells always draw"),
            };
            assert!(
                commands[..split].contains(&expected),
                "missing overlay for ash cell ({x}, {y})"
            );
        }
    }
    assert!(ash_cells > 0);
}

#[test]
fn test_particles_follow_additive_switch() {
    let effect = burning_effect(150);
    let commands = effect.render();
    let split = additive_marker(&commands);

    let particle_fills = commands[split + 1..]
        .iter()
        .filter(|c| matches!(c, DrawCommand::FillRect { .. }))
        .count();
    assert!(particle_fills > 0);
    assert_eq!(particle_fills, effect.particles().len());
    assert_eq!(
        commands.last(),
        Some(&DrawCommand::SetBlendMode(BlendMode::Normal))
    );
}

#[test]
fn test_rasterized_frame() {
    let effect = burning_effect(150);
    let mut frame = FrameBuffer::new(VIEWPORT.width, VIEWPORT.height);
    submit(&effect.render(), &mut frame);

    let charcoal = Rgba::CHARCOAL;
    let paper = Rgba::PAPER;
    // Backdrop corner
    assert_eq!(frame.pixel(0, 0), Some([charcoal.r, charcoal.g, charcoal.b]));
    assert_eq!(frame.pixel(800, 0), None);

    // Untouched top edge of the sheet: paper, at most a grain step darker
    let [r, g, b] = frame.pixel(400, 101).unwrap();
    for (channel, full) in [(r, paper.r), (g, paper.g), (b, paper.b)] {
        assert!(channel <= full && full - channel <= 12, "{channel} vs {full}");
    }
}

#[test]
fn test_paper_fades_in_with_grain() {
    let mut effect = PaperBurn::seeded(EffectConfig::default(), VIEWPORT, 1).unwrap();
    let grain: Vec<u8> = effect
        .texture()
        .texels(effect.layout().paper)
        .map(|(_, alpha)| alpha)
        .collect();
    assert!(grain.iter().all(|&a| a >= PaperTexture::MIN_ALPHA));
    assert!(grain.iter().any(|&a| a < 255));

    assert!(paper_alphas(&effect).iter().all(|&a| a == 0));

    effect.update(1.0, SpeedMultiplier::NORMAL);
    let half = paper_alphas(&effect);
    assert!(half.iter().all(|&a| (122..=127).contains(&a)));
    let expected: Vec<u8> = grain.iter().map(|&a| (f32::from(a) * 0.5) as u8).collect();
    assert_eq!(half, expected);

    effect.update(1.0, SpeedMultiplier::NORMAL);
    assert_eq!(paper_alphas(&effect), grain);
}

#[test]
fn test_same_seed_same_grain() {
    let a = PaperBurn::seeded(EffectConfig::default(), VIEWPORT, 77).unwrap();
    let b = PaperBurn::seeded(EffectConfig::default(), VIEWPORT, 77).unwrap();
    let c = PaperBurn::seeded(EffectConfig::default(), VIEWPORT, 78).unwrap();
    assert_eq!(a.texture(), b.texture());
    assert_ne!(a.texture(), c.texture());
    assert_eq!(a.render(), b.render());
}
