use std::fs;

use lazy_static::lazy_static;

use rusle::constants::NODATAVAL;

use crate::common::helpers::RusleError;

#[derive(Debug, Clone, Copy)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

lazy_static! {
    // hypsometric tints, low to high elevation
    static ref ELEVATION_RAMP: Vec<Color> = vec![
        Color { r: 50, g: 120, b: 70, a: 255 },
        Color { r: 120, g: 170, b: 80, a: 255 },
        Color { r: 220, g: 205, b: 125, a: 255 },
        Color { r: 180, g: 130, b: 70, a: 255 },
        Color { r: 135, g: 90, b: 60, a: 255 },
        Color { r: 245, g: 245, b: 245, a: 255 },
    ];
}

/// Value to colour mapping: `colors[i]` covers `bounds[i] <= value < bounds[i + 1]`
#[derive(Debug, Clone)]
pub struct Palette {
    bounds: Vec<f32>,
    colors: Vec<Color>,
}

impl Palette {
    /// Continuous elevation palette over the given value range
    pub fn elevation(min: f32, max: f32) -> Self {
        let mut palette = Self {
            bounds: vec![NODATAVAL],
            colors: vec![Color { r: 0, g: 0, b: 0, a: 0 }],
        };

        let steps = 255;
        let span = if max > min { max - min } else { 1.0 };
        for i in 0..steps {
            let fraction = i as f32 / (steps - 1) as f32;
            palette.bounds.push(min + fraction * span);
            palette.colors.push(interpolate_ramp(&ELEVATION_RAMP, fraction));
        }
        palette
    }

    /// Load a palette file: one `value r g b a` entry per line, `#` comments
    pub fn load_palette(palette_file: &str) -> Result<Self, RusleError> {
        let contents = fs::read_to_string(palette_file)
            .map_err(|err| format!("cannot read palette file {palette_file}: {err}."))?;

        let mut bounds: Vec<f32> = Vec::new();
        let mut colors: Vec<Color> = Vec::new();

        for line in contents.lines() {
            let line = line.trim();
            if line.starts_with('#') || line.is_empty() {
                continue;
            }
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() != 5 {
                return Err(format!("invalid palette entry: {line}").into());
            }
            let val: f32 = parse_component(parts[0], line)?;
            let r: u8 = parse_component(parts[1], line)?;
            let g: u8 = parse_component(parts[2], line)?;
            let b: u8 = parse_component(parts[3], line)?;
            let a: u8 = parse_component(parts[4], line)?;

            bounds.push(val);
            colors.push(Color { r, g, b, a });
        }
        if bounds.is_empty() {
            return Err(format!("palette file {palette_file} has no entries").into());
        }
        Ok(Self { bounds, colors })
    }

    pub fn get_color(&self, val: f32) -> Color {
        for (idx, bound) in self.bounds.iter().enumerate().take(self.bounds.len() - 1) {
            if val >= *bound && val < self.bounds[idx + 1] {
                return self.colors[idx];
            }
        }
        self.colors[self.bounds.len() - 1]
    }
}

fn parse_component<T: std::str::FromStr>(part: &str, line: &str) -> Result<T, RusleError> {
    part.parse()
        .map_err(|_| format!("invalid palette entry: {line}").into())
}

fn interpolate_ramp(ramp: &[Color], fraction: f32) -> Color {
    let scaled = fraction.clamp(0.0, 1.0) * (ramp.len() - 1) as f32;
    let idx = (scaled.floor() as usize).min(ramp.len() - 2);
    let t = scaled - idx as f32;
    let (lo, hi) = (ramp[idx], ramp[idx + 1]);
    let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    Color {
        r: lerp(lo.r, hi.r),
        g: lerp(lo.g, hi.g),
        b: lerp(lo.b, hi.b),
        a: lerp(lo.a, hi.a),
    }
}
