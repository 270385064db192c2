use crate::error::{HolosphereError, Result};
use std::fmt;
use std::str::FromStr;

/// 8-bit RGB color
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Converts HSL (hue in degrees, saturation and lightness in [0, 1]) to RGB
    pub fn from_hsl(hue: f64, saturation: f64, lightness: f64) -> Self {
        let hue = hue.rem_euclid(360.0);
        let s = saturation.clamp(0.0, 1.0);
        let l = lightness.clamp(0.0, 1.0);

        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let h = hue / 60.0;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = l - chroma / 2.0;
        let to_u8 = |c: f64| ((c + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Rgb::new(to_u8(r), to_u8(g), to_u8(b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Named neon colors accepted on the command line
const NAMED_COLORS: [(&str, Rgb); 11] = [
    ("cyan", Rgb::new(0, 255, 255)),
    ("magenta", Rgb::new(255, 0, 255)),
    ("lime", Rgb::new(0, 255, 0)),
    ("green", Rgb::new(57, 255, 20)),
    ("blue", Rgb::new(31, 81, 255)),
    ("red", Rgb::new(255, 7, 58)),
    ("orange", Rgb::new(255, 95, 31)),
    ("yellow", Rgb::new(255, 255, 51)),
    ("pink", Rgb::new(255, 16, 240)),
    ("purple", Rgb::new(188, 19, 254)),
    ("white", Rgb::WHITE),
];

/// Sphere color: fixed, or cycling through the hue wheel over time
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NeonColor {
    Fixed(Rgb),
    Cycle,
}

impl NeonColor {
    /// Resolves the color to draw with at `time_ms` (wall clock, milliseconds)
    pub fn resolve(&self, time_ms: f64, cycle_speed: f64) -> Rgb {
        match self {
            NeonColor::Fixed(rgb) => *rgb,
            NeonColor::Cycle => Rgb::from_hsl(cycle_hue(time_ms, cycle_speed), 1.0, 0.5),
        }
    }
}

/// Hue in degrees for the color cycle
pub fn cycle_hue(time_ms: f64, cycle_speed: f64) -> f64 {
    (time_ms * cycle_speed * 0.002).rem_euclid(360.0)
}

impl FromStr for NeonColor {
    type Err = HolosphereError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        if name == "cycle" {
            return Ok(NeonColor::Cycle);
        }
        if let Some(hex) = name.strip_prefix('#') {
            if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
                let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
                if let (Ok(r), Ok(g), Ok(b)) = (channel(0), channel(2), channel(4)) {
                    return Ok(NeonColor::Fixed(Rgb::new(r, g, b)));
                }
            }
            return Err(HolosphereError::InvalidColor(s.to_string()));
        }
        NAMED_COLORS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, rgb)| NeonColor::Fixed(*rgb))
            .ok_or_else(|| HolosphereError::InvalidColor(s.to_string()))
    }
}

impl fmt::Display for NeonColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NeonColor::Fixed(rgb) => write!(f, "{}", rgb),
            NeonColor::Cycle => write!(f, "cycle"),
        }
    }
}
