mod cli;

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use easel_engine::coords::{Rect, Size};
use easel_engine::logging::{LoggingConfig, init_logging};
use easel_engine::paint::Color;
use easel_engine::platform::desktop::DesktopToolkit;
use easel_engine::platform::headless::HeadlessToolkit;
use easel_engine::{GraphicsEngine, Icon};

use cli::Cli;

const BOX: u32 = 48;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(if cli.verbose {
        LoggingConfig::verbose()
    } else {
        LoggingConfig::default()
    });

    let config = cli.engine_config();
    let mut engine = if cli.headless {
        GraphicsEngine::with_toolkit(&HeadlessToolkit::default(), config)?
    } else {
        let toolkit = DesktopToolkit::new()?;
        GraphicsEngine::with_toolkit(&toolkit, config)?
    };
    log::info!("running {}", engine.description());

    if let Some(path) = &cli.icon {
        let icon = Icon::load(path).with_context(|| format!("loading icon {}", path.display()))?;
        engine.set_icon(icon);
    }

    let stats = run(&mut engine, &cli)?;
    log::info!(
        "{} frames presented, {} dropped in {:.2?}",
        stats.presented,
        stats.dropped,
        stats.elapsed
    );

    engine.cleanup()?;
    Ok(())
}

#[derive(Debug, Default)]
struct Stats {
    presented: u64,
    dropped: u64,
    elapsed: Duration,
}

/// A box bouncing off the edges of the client area.
struct Bouncer {
    pos: (i32, i32),
    vel: (i32, i32),
}

impl Bouncer {
    fn step(&mut self, area: Size) {
        let max_x = area.width.saturating_sub(BOX) as i32;
        let max_y = area.height.saturating_sub(BOX) as i32;

        self.pos.0 += self.vel.0;
        self.pos.1 += self.vel.1;
        if self.pos.0 <= 0 || self.pos.0 >= max_x {
            self.vel.0 = -self.vel.0;
            self.pos.0 = self.pos.0.clamp(0, max_x);
        }
        if self.pos.1 <= 0 || self.pos.1 >= max_y {
            self.vel.1 = -self.vel.1;
            self.pos.1 = self.pos.1.clamp(0, max_y);
        }
    }
}

fn run(engine: &mut GraphicsEngine, cli: &Cli) -> Result<Stats> {
    let frame_time = if engine.is_vsync() || cli.fps == 0 {
        Duration::ZERO
    } else {
        Duration::from_secs(1) / cli.fps
    };

    let mut stats = Stats::default();
    let mut bouncer = Bouncer { pos: (0, 0), vel: (4, 3) };
    let started = Instant::now();
    let mut frame = 0u64;

    while cli.frames == 0 || frame < cli.frames {
        let frame_start = Instant::now();
        bouncer.step(engine.size());

        let g = engine.back_buffer()?;
        g.clear(Color::rgb(24, 26, 33));
        g.fill_rect(
            Rect::new(bouncer.pos.0, bouncer.pos.1, BOX, BOX),
            Color::rgb(230, 120, 40),
        );

        if engine.flip()? {
            stats.presented += 1;
        } else {
            stats.dropped += 1;
        }
        frame += 1;

        if let Some(rest) = frame_time.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    stats.elapsed = started.elapsed();
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bouncer_reverses_at_edges() {
        let mut b = Bouncer { pos: (0, 0), vel: (-4, 3) };
        b.step(Size::new(100, 100));
        assert_eq!(b.pos, (0, 3));
        assert_eq!(b.vel, (4, 3));
    }

    #[test]
    fn bouncer_stays_inside_area() {
        let mut b = Bouncer { pos: (50, 50), vel: (7, 5) };
        for _ in 0..1000 {
            b.step(Size::new(120, 90));
            assert!((0..=120 - BOX as i32).contains(&b.pos.0));
            assert!((0..=90 - BOX as i32).contains(&b.pos.1));
        }
    }
}
