mod color;
mod config;
mod error;
mod graphics;
mod math;
mod renderer;
mod sphere;
mod state;
mod vertex;
mod widget;

use anyhow::Context;
use clap::Parser;
use config::Args;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal::{
    self, DisableLineWrap, EnableLineWrap, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{cursor, execute, style::ResetColor};
use log::{info, warn, LevelFilter};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use widget::SphereWidget;

/// Fallback when the terminal size cannot be queried
const DEFAULT_TERMINAL_SIZE: (u16, u16) = (80, 24);

/// Restores the terminal and the log level when dropped, including on early returns
struct TerminalGuard {
    saved_level: LevelFilter,
}

impl TerminalGuard {
    fn enter(out: &mut impl Write, logs_to_file: bool) -> io::Result<Self> {
        let saved_level = log::max_level();
        log::set_max_level(level_while_drawing(saved_level, logs_to_file));
        let guard = TerminalGuard { saved_level };
        terminal::enable_raw_mode()?;
        execute!(
            out,
            EnterAlternateScreen,
            EnableMouseCapture,
            DisableLineWrap,
            cursor::Hide
        )?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        log::set_max_level(self.saved_level);
        let mut out = io::stdout();
        let _ = execute!(
            out,
            ResetColor,
            cursor::Show,
            EnableLineWrap,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}

/// Stderr shares the screen with the frame, so only errors get through there
fn level_while_drawing(level: LevelFilter, logs_to_file: bool) -> LevelFilter {
    if logs_to_file {
        level
    } else {
        level.min(LevelFilter::Error)
    }
}

fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn terminal_size() -> (u16, u16) {
    termsize::get()
        .map(|size| (size.cols, size.rows))
        .or_else(|| terminal::size().ok())
        .filter(|&(cols, rows)| cols > 0 && rows > 0)
        .unwrap_or(DEFAULT_TERMINAL_SIZE)
}

/// Wall clock in milliseconds, the time base of the color cycle
fn wall_clock_ms() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

fn run(widget: &mut SphereWidget, fps: u32, frame_limit: Option<u64>) -> anyhow::Result<()> {
    let frame_duration = Duration::from_secs_f64(1.0 / fps as f64);
    let mut stdout = io::stdout();
    let mut frames: u64 = 0;

    while !widget.should_quit() {
        let frame_start = Instant::now();

        while event::poll(Duration::ZERO)? {
            widget.handle_event(&event::read()?);
        }

        widget.update(wall_clock_ms());
        widget.paint(&mut stdout)?;

        frames += 1;
        if frame_limit.is_some_and(|limit| frames >= limit) {
            break;
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_duration {
            std::thread::sleep(frame_duration - elapsed);
        }
    }

    info!("stopped after {} frames", frames);
    Ok(())
}

/// Main function
fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let scene = match args.scene_config() {
        Ok(scene) => scene,
        Err(e) => {
            warn!("rejected configuration: {}", e);
            return Err(e.into());
        }
    };
    let config = args.render_config();
    info!(
        "starting: {} points, radius {}, camera distance {}, color {}, style {}",
        scene.num_points,
        scene.sphere_radius,
        scene.camera_distance,
        config.neon_color,
        config.trail_style.label()
    );

    let (cols, rows) = terminal_size();
    let mut widget = SphereWidget::new(&scene, config, cols, rows);

    let mut stdout = io::stdout();
    let guard = TerminalGuard::enter(&mut stdout, args.log_file.is_some())
        .context("failed to set up the terminal")?;
    let result = run(&mut widget, args.fps, args.frames);
    drop(guard);

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_logging_is_capped_while_drawing() {
        assert_eq!(
            level_while_drawing(LevelFilter::Debug, false),
            LevelFilter::Error
        );
        assert_eq!(level_while_drawing(LevelFilter::Off, false), LevelFilter::Off);
        assert_eq!(level_while_drawing(LevelFilter::Trace, true), LevelFilter::Trace);
    }
}
