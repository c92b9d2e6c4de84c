//! Terminal screensaver for the paper burn effect
//!
//! Renders the effect into a software frame buffer sized to a virtual
//! viewport, then downsamples it into half-block terminal cells (each cell
//! shows two vertically stacked pixels). The effect loops until any key or
//! mouse button is pressed.
//!
//! # Usage
//!
//! ```bash
//! cargo run --release --package demo-interactive
//! cargo run --release --package demo-interactive -- --speed 2 --log-file burn.log
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use paper_burn_core::{
    submit, EffectConfig, FrameBuffer, PaperBurn, SpeedMultiplier, Viewport, DEFAULT_GRID_SIZE,
};
use ratatui::buffer::Buffer;
use ratatui::crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseEventKind,
};
use ratatui::crossterm::execute;
use ratatui::layout::{Rect, Size};
use ratatui::style::Color;
use ratatui::widgets::Widget;
use ratatui::DefaultTerminal;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Fixed simulation step
const FRAME: Duration = Duration::from_millis(16);

/// Space left around the paper inside the virtual viewport
const MARGIN: f32 = 1.15;

#[derive(Parser, Debug)]
#[command(name = "paper-burn")]
#[command(about = "Burning paper terminal screensaver", long_about = None)]
struct Args {
    /// Speed multiplier (0.1 - 5.0)
    #[arg(short, long, default_value_t = 1.0)]
    speed: f32,

    /// Random seed (OS entropy when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Grid cells per side
    #[arg(short, long, default_value_t = DEFAULT_GRID_SIZE)]
    grid: usize,

    /// Write logs to this file (the terminal is taken by the effect)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }

    let mut terminal = ratatui::init();
    let result = run(&mut terminal, &args);
    let restored = execute!(io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result?;
    restored.context("Failed to release mouse capture")
}

/// Virtual viewport and the pixel block each terminal half-cell covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Projection {
    viewport: Viewport,
    scale: u32,
}

impl Projection {
    fn fit(size: Size, config: &EffectConfig) -> Self {
        let cols = u32::from(size.width.max(1));
        let rows = u32::from(size.height.max(1)) * 2;
        let fit_w = config.paper_width as f32 * MARGIN / cols as f32;
        let fit_h = config.paper_height as f32 * MARGIN / rows as f32;
        let scale = (fit_w.max(fit_h).ceil() as u32).max(1);
        Self {
            viewport: Viewport::new(cols * scale, rows * scale),
            scale,
        }
    }
}

fn run(terminal: &mut DefaultTerminal, args: &Args) -> Result<()> {
    execute!(io::stdout(), EnableMouseCapture).context("Failed to capture mouse")?;

    let config = EffectConfig::with_grid_size(args.grid);
    let speed = SpeedMultiplier::new(args.speed);
    let mut projection = Projection::fit(terminal.size()?, &config);
    let mut effect = match args.seed {
        Some(seed) => PaperBurn::seeded(config, projection.viewport, seed),
        None => PaperBurn::from_entropy(config, projection.viewport),
    }
    .context("Failed to create paper burn effect")?;
    let mut frame_buffer = FrameBuffer::new(projection.viewport.width, projection.viewport.height);
    let mut commands = Vec::new();

    info!("Screensaver started at speed {}", speed);

    let mut last_step = Instant::now();
    loop {
        terminal.draw(|frame| {
            let fitted = Projection::fit(frame.area().as_size(), effect.config());
            if fitted != projection {
                debug!(
                    "Terminal resized, virtual viewport {}x{} at scale {}",
                    fitted.viewport.width, fitted.viewport.height, fitted.scale
                );
                projection = fitted;
                effect.resize(projection.viewport);
                frame_buffer.resize(projection.viewport.width, projection.viewport.height);
            }

            effect.render_into(&mut commands);
            submit(&commands, &mut frame_buffer);
            frame.render_widget(
                HalfBlocks {
                    pixels: &frame_buffer,
                    scale: projection.scale,
                },
                frame.area(),
            );
        })?;

        let timeout = FRAME.saturating_sub(last_step.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => break,
                Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Down(_)) => break,
                _ => {}
            }
        }

        if last_step.elapsed() >= FRAME {
            effect.update(FRAME.as_secs_f32(), speed);
            last_step = Instant::now();
        }
    }

    let stats = effect.stats();
    info!(
        "Screensaver stopped after {} cycles ({:.1}s into the current one)",
        stats.cycles_completed, stats.elapsed
    );
    Ok(())
}

/// Frame buffer shown as `▀` cells: foreground is the upper pixel block,
/// background the lower one
struct HalfBlocks<'a> {
    pixels: &'a FrameBuffer,
    scale: u32,
}

impl HalfBlocks<'_> {
    /// Mean colour of the `scale × scale` block at block coordinates (bx, by)
    fn block(&self, bx: u32, by: u32) -> Color {
        let mut sum = [0_u32; 3];
        let mut count = 0_u32;
        for y in by * self.scale..(by + 1) * self.scale {
            for x in bx * self.scale..(bx + 1) * self.scale {
                if let Some(px) = self.pixels.pixel(x, y) {
                    for (acc, channel) in sum.iter_mut().zip(px) {
                        *acc += u32::from(channel);
                    }
                    count += 1;
                }
            }
        }
        if count == 0 {
            return Color::Black;
        }
        Color::Rgb(
            (sum[0] / count) as u8,
            (sum[1] / count) as u8,
            (sum[2] / count) as u8,
        )
    }
}

impl Widget for HalfBlocks<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            for col in 0..area.width {
                let top = self.block(u32::from(col), u32::from(row) * 2);
                let bottom = self.block(u32::from(col), u32::from(row) * 2 + 1);
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_symbol("▀").set_fg(top).set_bg(bottom);
                }
            }
        }
    }
}
