use crate::color::NeonColor;
use crate::error::{HolosphereError, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Longest trail accepted on the command line or reachable from the keyboard
pub const MAX_TRAIL_LENGTH: usize = 1000;

/// Command line arguments
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Neon color: a name (cyan, magenta, lime, ...), #rrggbb, or "cycle"
    #[arg(long, default_value = "cycle", value_parser = parse_neon_color)]
    pub color: NeonColor,

    /// Speed of the hue cycle when the color is "cycle"
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub color_cycle_speed: f64,

    /// Beam speed; the beam advances by 0.005 per unit each frame
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub beam_speed: f64,

    /// Sphere rotation speed; the sphere turns by 0.01 rad per unit each frame
    #[arg(long, default_value_t = 0.2, allow_negative_numbers = true)]
    pub rotation_speed: f64,

    /// Number of trail samples behind the beam head (at most 1000)
    #[arg(long, default_value_t = 60)]
    pub trail_length: usize,

    /// Trail presentation
    #[arg(long, value_enum, default_value_t = TrailStyle::Faded)]
    pub style: TrailStyle,

    /// Number of points on the sphere
    #[arg(long, default_value_t = 500)]
    pub points: usize,

    /// Sphere radius in projection units
    #[arg(long, default_value_t = 150.0)]
    pub radius: f64,

    /// Distance from the camera to the sphere center
    #[arg(long, default_value_t = 400.0)]
    pub camera_distance: f64,

    /// Target frames per second
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Exit after this many frames
    #[arg(long)]
    pub frames: Option<u64>,

    /// Write log output to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

fn parse_neon_color(s: &str) -> std::result::Result<NeonColor, String> {
    s.parse().map_err(|e: HolosphereError| e.to_string())
}

/// How the beam trail is drawn
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrailStyle {
    /// One connected polyline through every sample
    Stroke,
    /// Independent dots shrinking and fading towards the tail
    Faded,
}

impl TrailStyle {
    pub fn toggle(self) -> Self {
        match self {
            TrailStyle::Stroke => TrailStyle::Faded,
            TrailStyle::Faded => TrailStyle::Stroke,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TrailStyle::Stroke => "stroke",
            TrailStyle::Faded => "faded",
        }
    }

    /// Progress distance between consecutive trail samples
    pub fn beam_delta(self) -> f64 {
        match self {
            TrailStyle::Stroke => 0.02,
            TrailStyle::Faded => 0.01,
        }
    }

    /// Radius of the beam head glow in projection units
    pub fn head_radius(self) -> f64 {
        match self {
            TrailStyle::Stroke => 14.0,
            TrailStyle::Faded => 10.0,
        }
    }

    /// Fraction of the head radius drawn at full intensity before fading
    pub fn head_core(self) -> f64 {
        match self {
            TrailStyle::Stroke => 0.4,
            TrailStyle::Faded => 0.0,
        }
    }
}

/// Live control values read by the renderer once per frame
pub trait ConfigProvider {
    fn neon_color(&self) -> NeonColor;
    fn color_cycle_speed(&self) -> f64;
    fn beam_speed(&self) -> f64;
    fn rotation_speed(&self) -> f64;
    fn trail_length(&self) -> usize;
    fn trail_style(&self) -> TrailStyle;
}

/// Control values adjustable while running
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderConfig {
    pub neon_color: NeonColor,
    pub color_cycle_speed: f64,
    pub beam_speed: f64,
    pub rotation_speed: f64,
    pub trail_length: usize,
    pub trail_style: TrailStyle,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            neon_color: NeonColor::Cycle,
            color_cycle_speed: 1.0,
            beam_speed: 1.0,
            rotation_speed: 0.2,
            trail_length: 60,
            trail_style: TrailStyle::Faded,
        }
    }
}

impl ConfigProvider for RenderConfig {
    fn neon_color(&self) -> NeonColor {
        self.neon_color
    }

    fn color_cycle_speed(&self) -> f64 {
        self.color_cycle_speed
    }

    fn beam_speed(&self) -> f64 {
        self.beam_speed
    }

    fn rotation_speed(&self) -> f64 {
        self.rotation_speed
    }

    fn trail_length(&self) -> usize {
        self.trail_length
    }

    fn trail_style(&self) -> TrailStyle {
        self.trail_style
    }
}

/// Fixed sphere geometry, chosen once at startup
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneConfig {
    pub num_points: usize,
    pub sphere_radius: f64,
    pub camera_distance: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            num_points: 500,
            sphere_radius: 150.0,
            camera_distance: 400.0,
        }
    }
}

impl Args {
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            neon_color: self.color,
            color_cycle_speed: self.color_cycle_speed,
            beam_speed: self.beam_speed,
            rotation_speed: self.rotation_speed,
            trail_length: self.trail_length,
            trail_style: self.style,
        }
    }

    /// Validates the structural parameters and returns the scene geometry
    pub fn scene_config(&self) -> Result<SceneConfig> {
        if self.points == 0 {
            return Err(HolosphereError::InvalidConfig(
                "--points must be at least 1".to_string(),
            ));
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(HolosphereError::InvalidConfig(format!(
                "--radius must be a positive number, got {}",
                self.radius
            )));
        }
        if !(self.camera_distance.is_finite() && self.camera_distance > 0.0) {
            return Err(HolosphereError::InvalidConfig(format!(
                "--camera-distance must be a positive number, got {}",
                self.camera_distance
            )));
        }
        if self.trail_length > MAX_TRAIL_LENGTH {
            return Err(HolosphereError::InvalidConfig(format!(
                "--trail-length must be at most {}, got {}",
                MAX_TRAIL_LENGTH, self.trail_length
            )));
        }
        if self.fps == 0 {
            return Err(HolosphereError::InvalidConfig(
                "--fps must be at least 1".to_string(),
            ));
        }
        Ok(SceneConfig {
            num_points: self.points,
            sphere_radius: self.radius,
            camera_distance: self.camera_distance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    #[test]
    fn test_default_args_match_defaults() {
        let args = Args::parse_from(["holosphere"]);
        assert_eq!(args.render_config(), RenderConfig::default());
        assert_eq!(args.scene_config().unwrap(), SceneConfig::default());
        assert_eq!(args.fps, 60);
        assert!(args.frames.is_none());
    }

    #[test]
    fn test_parse_full_args() {
        let args = Args::parse_from([
            "holosphere",
            "--color",
            "magenta",
            "--beam-speed",
            "2.5",
            "--rotation-speed",
            "-1",
            "--trail-length",
            "120",
            "--style",
            "stroke",
            "--points",
            "42",
            "--frames",
            "10",
        ]);
        let config = args.render_config();
        assert_eq!(config.neon_color, NeonColor::Fixed(Rgb::new(255, 0, 255)));
        assert_eq!(config.beam_speed, 2.5);
        assert_eq!(config.rotation_speed, -1.0);
        assert_eq!(config.trail_length, 120);
        assert_eq!(config.trail_style, TrailStyle::Stroke);
        assert_eq!(args.scene_config().unwrap().num_points, 42);
        assert_eq!(args.frames, Some(10));
    }

    #[test]
    fn test_rejects_bad_color() {
        assert!(Args::try_parse_from(["holosphere", "--color", "mauve-ish"]).is_err());
    }

    #[test]
    fn test_rejects_non_numeric_speed() {
        assert!(Args::try_parse_from(["holosphere", "--beam-speed", "fast"]).is_err());
    }

    #[test]
    fn test_scene_validation() {
        let zero_points = Args::parse_from(["holosphere", "--points", "0"]);
        assert!(matches!(
            zero_points.scene_config(),
            Err(HolosphereError::InvalidConfig(_))
        ));
        let bad_radius = Args::parse_from(["holosphere", "--radius", "0"]);
        assert!(bad_radius.scene_config().is_err());
        let bad_camera = Args::parse_from(["holosphere", "--camera-distance=-5"]);
        assert!(bad_camera.scene_config().is_err());
        let bad_fps = Args::parse_from(["holosphere", "--fps", "0"]);
        assert!(bad_fps.scene_config().is_err());
    }

    #[test]
    fn test_trail_length_is_bounded() {
        let longest = Args::parse_from(["holosphere", "--trail-length", "1000"]);
        assert!(longest.scene_config().is_ok());
        let too_long = Args::parse_from(["holosphere", "--trail-length", "1001"]);
        assert!(matches!(
            too_long.scene_config(),
            Err(HolosphereError::InvalidConfig(_))
        ));
        let max = usize::MAX.to_string();
        let huge = Args::parse_from(["holosphere", "--trail-length", max.as_str()]);
        assert!(huge.scene_config().is_err());
    }

    #[test]
    fn test_style_presets() {
        assert_eq!(TrailStyle::Stroke.beam_delta(), 0.02);
        assert_eq!(TrailStyle::Faded.beam_delta(), 0.01);
        assert_eq!(TrailStyle::Stroke.toggle(), TrailStyle::Faded);
        assert_eq!(TrailStyle::Faded.toggle().label(), "stroke");
    }
}
