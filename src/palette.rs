use tracing::warn;

use crate::fractal::FractalPoint;

pub type Rgb = [u8; 3];

pub const PALETTE_NAMES: &[&str] = &["fire", "ocean", "cosmic", "forest", "sunset"];
pub const DEFAULT_PALETTE: &str = "fire";

const FIRE: &[Rgb] = &[
    [0, 0, 0], [64, 0, 0], [128, 0, 0], [255, 0, 0],
    [255, 128, 0], [255, 255, 0], [255, 255, 255],
];
const OCEAN: &[Rgb] = &[
    [0, 0, 64], [0, 64, 128], [0, 128, 255],
    [64, 192, 255], [128, 224, 255], [255, 255, 255],
];
const COSMIC: &[Rgb] = &[
    [0, 0, 0], [32, 0, 64], [64, 0, 128], [128, 0, 255],
    [255, 0, 255], [255, 128, 255], [255, 255, 255],
];
const FOREST: &[Rgb] = &[
    [0, 32, 0], [0, 64, 0], [0, 128, 0], [64, 192, 64],
    [128, 255, 128], [192, 255, 192], [255, 255, 255],
];
const SUNSET: &[Rgb] = &[
    [64, 0, 64], [128, 0, 64], [255, 64, 0],
    [255, 128, 0], [255, 192, 64], [255, 255, 128],
];

#[derive(Clone, Debug, PartialEq)]
pub struct ColorPalette {
    pub name: &'static str,
    pub colors: &'static [Rgb],
}

impl ColorPalette {
    pub fn by_name(name: &str) -> Option<ColorPalette> {
        let (name, colors) = match name.to_lowercase().as_str() {
            "fire" => ("Fire", FIRE),
            "ocean" => ("Ocean", OCEAN),
            "cosmic" => ("Cosmic", COSMIC),
            "forest" => ("Forest", FOREST),
            "sunset" => ("Sunset", SUNSET),
            _ => return None,
        };
        Some(ColorPalette { name, colors })
    }

    /// Like [`ColorPalette::by_name`] but falls back to fire.
    pub fn named_or_default(name: &str) -> ColorPalette {
        ColorPalette::by_name(name).unwrap_or_else(|| {
            warn!(palette = name, "unknown palette, using {}", DEFAULT_PALETTE);
            ColorPalette::fire()
        })
    }

    pub fn fire() -> ColorPalette {
        ColorPalette { name: "Fire", colors: FIRE }
    }

    /// Linear interpolation between neighbouring stops, `t` clamped to [0, 1].
    pub fn color_at(&self, t: f64) -> Rgb {
        match self.colors {
            [] => return [0, 0, 0],
            [only] => return *only,
            _ => {}
        }

        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let scaled = t * (self.colors.len() - 1) as f64;
        let idx = scaled as usize;
        let frac = scaled - idx as f64;

        if idx >= self.colors.len() - 1 {
            return self.colors[self.colors.len() - 1];
        }

        let (c1, c2) = (self.colors[idx], self.colors[idx + 1]);
        let lerp = |a: u8, b: u8| (a as f64 + frac * (b as f64 - a as f64)) as u8;
        [lerp(c1[0], c2[0]), lerp(c1[1], c2[1]), lerp(c1[2], c2[2])]
    }

    /// Colour for an evaluated pixel: escaped points shade by iteration count
    /// nudged by magnitude, interior points take the first stop.
    pub fn shade(&self, point: &FractalPoint, max_iter: u32) -> Rgb {
        let t = if point.escaped && max_iter > 0 {
            (point.iterations as f64 / max_iter as f64 + point.magnitude * 0.1) % 1.0
        } else {
            0.0
        };
        self.color_at(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_named_palettes_exist() {
        for name in PALETTE_NAMES {
            assert!(ColorPalette::by_name(name).is_some(), "{}", name);
        }
        assert!(ColorPalette::by_name("mauve").is_none());
        assert_eq!(ColorPalette::named_or_default("mauve").name, "Fire");
    }

    #[test]
    fn endpoints_and_clamping() {
        let fire = ColorPalette::fire();
        assert_eq!(fire.color_at(0.0), [0, 0, 0]);
        assert_eq!(fire.color_at(1.0), [255, 255, 255]);
        assert_eq!(fire.color_at(-3.0), [0, 0, 0]);
        assert_eq!(fire.color_at(7.0), [255, 255, 255]);
    }

    #[test]
    fn interpolates_between_stops() {
        let fire = ColorPalette::fire();
        // 6 intervals: t = 0.25 sits halfway between [64,0,0] and [128,0,0].
        assert_eq!(fire.color_at(0.25), [96, 0, 0]);
    }

    #[test]
    fn single_and_empty_palettes() {
        let one = ColorPalette { name: "one", colors: &[[1, 2, 3]] };
        assert_eq!(one.color_at(0.7), [1, 2, 3]);
        let none = ColorPalette { name: "none", colors: &[] };
        assert_eq!(none.color_at(0.7), [0, 0, 0]);
    }

    #[test]
    fn interior_points_take_first_stop() {
        let ocean = ColorPalette::by_name("ocean").unwrap();
        let p = FractalPoint { x: 0.0, y: 0.0, iterations: 100, escaped: false, magnitude: 0.0 };
        assert_eq!(ocean.shade(&p, 100), [0, 0, 64]);
    }
}
