//! Headless paper burn run
//!
//! Steps the effect for a fixed number of frames, prints a progress table
//! (or JSON lines) and optionally rasterizes the last frame to a PPM image.
//!
//! ```bash
//! cargo run --package demo-headless -- --frames 2000 --snapshot burn.ppm
//! RUST_LOG=debug cargo run --package demo-headless -- --json
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use paper_burn_core::{
    submit, EffectConfig, EffectPhase, EffectStats, FrameBuffer, PaperBurn, SpeedMultiplier,
    Viewport, DEFAULT_GRID_SIZE,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Paper burn demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "paper-burn-demo")]
#[command(about = "Headless paper burn effect run", long_about = None)]
struct Args {
    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 2000)]
    frames: u32,

    /// Seconds per frame
    #[arg(long, default_value_t = 0.016)]
    dt: f32,

    /// Speed multiplier (0.1 - 5.0)
    #[arg(short, long, default_value_t = 1.0)]
    speed: f32,

    /// Random seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 900)]
    height: u32,

    /// Grid cells per side
    #[arg(short, long, default_value_t = DEFAULT_GRID_SIZE)]
    grid: usize,

    /// Report every n frames
    #[arg(short, long, default_value_t = 100)]
    report_interval: u32,

    /// Write the final frame as a binary PPM image
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Emit one JSON stats object per report instead of a table
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let speed = SpeedMultiplier::new(args.speed);
    let viewport = Viewport::new(args.width, args.height);

    let config = EffectConfig::with_grid_size(args.grid);
    let mut effect = PaperBurn::seeded(config, viewport, args.seed)
        .context("Failed to create paper burn effect")?;

    info!(
        "Running {} frames at dt={}s, speed {}, seed {}",
        args.frames, args.dt, speed, args.seed
    );

    if !args.json {
        println!("Frame | Time(s) | Phase    | Hot cells | Particles | Burned | Ash");
        println!("------|---------|----------|-----------|-----------|--------|------");
    }

    let interval = args.report_interval.max(1);
    let mut peak_particles = 0;
    let mut peak_hot = 0;
    for frame in 1..=args.frames {
        effect.update(args.dt, speed);

        let stats = effect.stats();
        peak_particles = peak_particles.max(stats.live_particles);
        peak_hot = peak_hot.max(stats.hot_cells);

        if frame % interval == 0 || frame == args.frames {
            report(frame, &stats, args.json)?;
        }
    }

    let stats = effect.stats();
    if !args.json {
        println!("\n=== Run Complete ===");
        println!("Effect time: {:.1}s ({:?})", stats.elapsed, stats.phase);
        println!("Cycles completed: {}", stats.cycles_completed);
        println!("Peak hot cells: {}", peak_hot);
        println!("Peak particles: {}", peak_particles);
        println!("Spawns dropped at capacity: {}", stats.dropped_particles);
    }

    if let Some(path) = &args.snapshot {
        let mut frame = FrameBuffer::new(viewport.width, viewport.height);
        submit(&effect.render(), &mut frame);
        let file = File::create(path)
            .with_context(|| format!("Failed to create snapshot {}", path.display()))?;
        frame
            .write_ppm(BufWriter::new(file))
            .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
        info!("Wrote {}x{} snapshot to {}", frame.width(), frame.height(), path.display());
    }

    Ok(())
}

fn report(frame: u32, stats: &EffectStats, json: bool) -> Result<()> {
    if json {
        let line = serde_json::json!({ "frame": frame, "stats": stats });
        println!("{}", serde_json::to_string(&line)?);
        return Ok(());
    }

    let phase = match stats.phase {
        EffectPhase::FadingIn => "fade-in",
        EffectPhase::Burning => "burning",
        EffectPhase::Dormant => "dormant",
    };
    println!(
        "{:5} | {:7.2} | {:8} | {:9} | {:9} | {:5.1}% | {:4.1}%",
        frame,
        stats.elapsed,
        phase,
        stats.hot_cells,
        stats.live_particles,
        stats.burned_fraction * 100.0,
        stats.ash_fraction * 100.0
    );
    Ok(())
}
