use crate::color::{NeonColor, Rgb};
use crate::config::{RenderConfig, SceneConfig, MAX_TRAIL_LENGTH};
use crate::error::Result;
use crate::graphics::Canvas;
use crate::renderer::{FrameInfo, FrameRenderer, Viewport};
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::style::{Color, Print, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{BeginSynchronizedUpdate, EndSynchronizedUpdate};
use crossterm::{cursor, queue};
use log::{debug, info};
use std::io::Write;
use std::time::Instant;

/// Upper half block: foreground paints the top pixel, background the bottom one
const HALF_BLOCK: char = '\u{2580}';
/// Radians applied per arrow key press
const NUDGE_ANGLE: f64 = 0.1;
const BEAM_SPEED_STEP: f64 = 0.5;
const ROTATION_SPEED_STEP: f64 = 0.1;
const TRAIL_LENGTH_STEP: usize = 10;
/// Fixed color restored when cycling is switched off
const DEFAULT_FIXED_COLOR: Rgb = Rgb::new(0, 255, 255);

fn to_term_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Terminal sphere widget
pub struct SphereWidget {
    renderer: FrameRenderer,
    config: RenderConfig,
    canvas: Canvas,
    viewport: Viewport,
    /// Terminal size in cells
    cols: u16,
    rows: u16,
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    fps: f64,
    /// Is the user currently dragging for rotation?
    dragging: bool,
    /// Last mouse position in cells
    last_mouse_pos: (u16, u16),
    /// Last fixed color, restored when cycling is switched off
    fixed_color: Rgb,
    last_frame: Option<FrameInfo>,
    debug: bool,
    paused: bool,
    quit: bool,
}

impl SphereWidget {
    pub fn new(scene: &SceneConfig, config: RenderConfig, cols: u16, rows: u16) -> Self {
        let fixed_color = match config.neon_color {
            NeonColor::Fixed(rgb) => rgb,
            NeonColor::Cycle => DEFAULT_FIXED_COLOR,
        };
        let mut widget = SphereWidget {
            renderer: FrameRenderer::new(scene),
            config,
            canvas: Canvas::new(0, 0),
            viewport: Viewport::new(0.0, 0.0, 1.0),
            cols: 0,
            rows: 0,
            frames_since_last_update: 0,
            last_fps_calculation: Instant::now(),
            fps: 0.0,
            dragging: false,
            last_mouse_pos: (0, 0),
            fixed_color,
            last_frame: None,
            debug: false,
            paused: false,
            quit: false,
        };
        widget.resize(cols, rows);
        widget
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    #[cfg(test)]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    #[cfg(test)]
    pub fn renderer(&self) -> &FrameRenderer {
        &self.renderer
    }

    /// Resizes the canvas to two pixels per terminal row
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        let width = cols as usize;
        let height = rows as usize * 2;
        self.canvas.resize(width, height);
        self.viewport = Viewport::fit(
            width as f64,
            height as f64,
            self.renderer.sphere_radius(),
            self.renderer.camera_distance(),
        );
        debug!(
            "resized to {}x{} cells, canvas {}x{}, scale {:.4}",
            cols, rows, width, height, self.viewport.scale
        );
    }

    /// Handle events for the sphere widget
    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Key(key_event) => self.handle_key(key_event),
            Event::Mouse(mouse_event) => self.handle_mouse(mouse_event),
            Event::Resize(cols, rows) => self.resize(*cols, *rows),
            _ => {}
        }
    }

    fn handle_key(&mut self, key_event: &KeyEvent) {
        if key_event.kind == KeyEventKind::Release {
            return;
        }
        let rotation = &mut self.renderer.session_mut().rotation;
        match key_event.code {
            KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('d') | KeyCode::Char('D') => self.debug = !self.debug,
            KeyCode::Char('p') | KeyCode::Char('P') => {
                self.paused = !self.paused;
                // Reset any drag that was in progress
                self.dragging = false;
                info!("{}", if self.paused { "paused" } else { "resumed" });
            }
            KeyCode::Char('t') | KeyCode::Char('T') => {
                self.config.trail_style = self.config.trail_style.toggle();
                info!("trail style: {}", self.config.trail_style.label());
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                self.config.neon_color = match self.config.neon_color {
                    NeonColor::Cycle => NeonColor::Fixed(self.fixed_color),
                    NeonColor::Fixed(_) => NeonColor::Cycle,
                };
                info!("neon color: {}", self.config.neon_color);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.config.beam_speed += BEAM_SPEED_STEP,
            KeyCode::Char('-') | KeyCode::Char('_') => self.config.beam_speed -= BEAM_SPEED_STEP,
            KeyCode::Char(']') => {
                let longer = self.config.trail_length.saturating_add(TRAIL_LENGTH_STEP);
                self.config.trail_length = longer.min(MAX_TRAIL_LENGTH);
            }
            KeyCode::Char('[') => {
                let shorter = self.config.trail_length.saturating_sub(TRAIL_LENGTH_STEP);
                self.config.trail_length = shorter;
            }
            KeyCode::Char('>') | KeyCode::Char('.') => {
                self.config.rotation_speed += ROTATION_SPEED_STEP
            }
            KeyCode::Char('<') | KeyCode::Char(',') => {
                self.config.rotation_speed -= ROTATION_SPEED_STEP
            }
            KeyCode::Up => rotation.nudge(-NUDGE_ANGLE, 0.0),
            KeyCode::Down => rotation.nudge(NUDGE_ANGLE, 0.0),
            KeyCode::Left => rotation.nudge(0.0, -NUDGE_ANGLE),
            KeyCode::Right => rotation.nudge(0.0, NUDGE_ANGLE),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse_event: &MouseEvent) {
        if self.paused {
            return;
        }
        let pos = (mouse_event.column, mouse_event.row);
        match mouse_event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.dragging = true;
                self.last_mouse_pos = pos;
            }
            MouseEventKind::Drag(MouseButton::Left) if self.dragging => {
                // One cell is one pixel wide and two pixels tall
                let dx = pos.0 as f64 - self.last_mouse_pos.0 as f64;
                let dy = (pos.1 as f64 - self.last_mouse_pos.1 as f64) * 2.0;
                let scale = self.viewport.scale;
                self.renderer
                    .session_mut()
                    .rotation
                    .drag(dx / scale, dy / scale);
                self.last_mouse_pos = pos;
            }
            MouseEventKind::Up(MouseButton::Left) => self.dragging = false,
            _ => {}
        }
    }

    /// Advances and draws one frame unless paused
    pub fn update(&mut self, time_ms: f64) {
        if self.paused {
            return;
        }
        let info = self
            .renderer
            .tick(&self.config, time_ms, &self.viewport, &mut self.canvas);
        self.last_frame = Some(info);
    }

    fn update_fps(&mut self) {
        self.frames_since_last_update += 1;
        let now = Instant::now();
        let duration = now.duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
            debug!("FPS: {:.1}", self.fps);
        }
    }

    /// Paint the canvas and overlays to the terminal
    pub fn paint<W: Write>(&mut self, out: &mut W) -> Result<()> {
        self.update_fps();
        queue!(out, BeginSynchronizedUpdate)?;

        for row in 0..self.canvas.height() / 2 {
            queue!(out, cursor::MoveTo(0, row as u16))?;
            let mut current: Option<(Rgb, Rgb)> = None;
            for col in 0..self.canvas.width() {
                let top = self.canvas.pixel(col, row * 2).unwrap_or(Rgb::BLACK);
                let bottom = self.canvas.pixel(col, row * 2 + 1).unwrap_or(Rgb::BLACK);
                if current != Some((top, bottom)) {
                    queue!(
                        out,
                        SetForegroundColor(to_term_color(top)),
                        SetBackgroundColor(to_term_color(bottom))
                    )?;
                    current = Some((top, bottom));
                }
                queue!(out, Print(HALF_BLOCK))?;
            }
        }

        queue!(
            out,
            SetForegroundColor(to_term_color(Rgb::WHITE)),
            SetBackgroundColor(to_term_color(Rgb::BLACK))
        )?;
        if self.debug {
            for (row, line) in self.hud_lines().iter().enumerate() {
                queue!(out, cursor::MoveTo(1, row as u16), Print(line))?;
            }
        }
        if self.paused {
            let text = " Paused ";
            let col = (self.cols as usize).saturating_sub(text.len()) / 2;
            queue!(out, cursor::MoveTo(col as u16, self.rows / 2), Print(text))?;
        }

        queue!(out, EndSynchronizedUpdate)?;
        out.flush()?;
        Ok(())
    }

    /// Debug overlay text
    pub fn hud_lines(&self) -> Vec<String> {
        let session = self.renderer.session();
        let (angle_x, angle_y) = session.rotation.angles();
        let color = self
            .last_frame
            .map_or_else(|| "-".to_string(), |f| f.color.to_string());
        vec![
            format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            format!("Angle X: {:.2}, Angle Y: {:.2}", angle_x, angle_y),
            format!("Beam: {:.2}", session.beam.progress),
            format!(
                "Color: {} ({}), Style: {}",
                self.config.neon_color,
                color,
                self.config.trail_style.label()
            ),
            format!(
                "Trail: {}, Beam speed: {:.2}, Rotation speed: {:.2}",
                self.config.trail_length, self.config.beam_speed, self.config.rotation_speed
            ),
            format!("FPS: {:.2}", self.fps),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrailStyle;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn widget() -> SphereWidget {
        let scene = SceneConfig {
            num_points: 50,
            ..SceneConfig::default()
        };
        SphereWidget::new(&scene, RenderConfig::default(), 40, 12)
    }

    #[test]
    fn test_quit_keys() {
        for code in [KeyCode::Char('q'), KeyCode::Esc] {
            let mut w = widget();
            w.handle_event(&key(code));
            assert!(w.should_quit());
        }
        let mut w = widget();
        w.handle_event(&Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(w.should_quit());
    }

    #[test]
    fn test_toggles() {
        let mut w = widget();
        w.handle_event(&key(KeyCode::Char('t')));
        assert_eq!(w.config().trail_style, TrailStyle::Stroke);
        w.handle_event(&key(KeyCode::Char('c')));
        assert_eq!(w.config().neon_color, NeonColor::Fixed(DEFAULT_FIXED_COLOR));
        w.handle_event(&key(KeyCode::Char('c')));
        assert_eq!(w.config().neon_color, NeonColor::Cycle);
        w.handle_event(&key(KeyCode::Char('[')));
        assert_eq!(w.config().trail_length, 50);
        w.handle_event(&key(KeyCode::Char('+')));
        assert_eq!(w.config().beam_speed, 1.5);
    }

    #[test]
    fn test_trail_length_key_stops_at_limit() {
        let mut w = widget();
        for _ in 0..(MAX_TRAIL_LENGTH / TRAIL_LENGTH_STEP + 5) {
            w.handle_event(&key(KeyCode::Char(']')));
        }
        assert_eq!(w.config().trail_length, MAX_TRAIL_LENGTH);
        w.update(0.0);
        assert_eq!(w.last_frame.map(|f| f.trail_samples), Some(MAX_TRAIL_LENGTH + 1));
    }

    #[test]
    fn test_pause_stops_the_animation() {
        let mut w = widget();
        w.update(0.0);
        w.handle_event(&key(KeyCode::Char('p')));
        w.update(16.0);
        w.update(32.0);
        assert_eq!(w.renderer().session().frame, 1);
        w.handle_event(&key(KeyCode::Char('p')));
        w.update(48.0);
        assert_eq!(w.renderer().session().frame, 2);
    }

    #[test]
    fn test_mouse_drag_rotates() {
        let mut w = widget();
        w.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 10, 5));
        w.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 14, 5));
        w.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 14, 5));
        w.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 30, 9));
        let rotation = w.renderer().session().rotation;
        assert!(rotation.user_y > 0.0);
        assert_eq!(rotation.user_x, 0.0);
    }

    #[test]
    fn test_arrow_keys_nudge() {
        let mut w = widget();
        w.handle_event(&key(KeyCode::Right));
        w.handle_event(&key(KeyCode::Up));
        let rotation = w.renderer().session().rotation;
        assert_eq!(rotation.user_y, NUDGE_ANGLE);
        assert_eq!(rotation.user_x, -NUDGE_ANGLE);
    }

    #[test]
    fn test_resize_tracks_terminal() {
        let mut w = widget();
        w.handle_event(&Event::Resize(100, 30));
        assert_eq!(w.canvas.width(), 100);
        assert_eq!(w.canvas.height(), 60);
        assert_eq!(w.viewport.center().x, 50.0);
    }

    #[test]
    fn test_paint_writes_every_row() {
        let mut w = widget();
        w.update(0.0);
        let mut out = Vec::new();
        w.paint(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches(HALF_BLOCK).count(), 40 * 12);
    }

    #[test]
    fn test_hud_lines() {
        let mut w = widget();
        w.update(0.0);
        let lines = w.hud_lines();
        assert!(lines[0].starts_with("holosphere "));
        assert!(lines[3].contains("cycle"));
    }
}
