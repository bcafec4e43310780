// Text renderers: ASCII ramps, poem overlay, ANSI colour blocks and the
// trigonometric mandala.

use crate::error::Result;
use crate::fractal::{FractalFamily, FractalPoint};
use crate::grid::{Viewport, evaluate_grid};

pub const GRADIENT_RAMP: &str = r#" .'`^",:;Il!i><~+_-?][}{1)(|\/*tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$"#;
pub const BLOCKS_RAMP: &str = " ░▒▓█";
pub const DOTS_RAMP: &str = " ·•○●";
pub const SIMPLE_RAMP: &str = " .-=+*#";

const ANSI_RESET: &str = "\x1b[0m";
const ANSI_BLACK_BG: &str = "\x1b[40m";
const ANSI_HUES: [u8; 6] = [31, 33, 32, 36, 34, 35];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AsciiStyle {
    #[default]
    Gradient,
    Blocks,
    Dots,
    Simple,
}

impl AsciiStyle {
    /// Unrecognised names map to the simple ramp.
    pub fn from_name(name: &str) -> AsciiStyle {
        match name.to_lowercase().as_str() {
            "gradient" => AsciiStyle::Gradient,
            "blocks" => AsciiStyle::Blocks,
            "dots" => AsciiStyle::Dots,
            _ => AsciiStyle::Simple,
        }
    }

    pub fn ramp(&self) -> Vec<char> {
        let s = match self {
            AsciiStyle::Gradient => GRADIENT_RAMP,
            AsciiStyle::Blocks => BLOCKS_RAMP,
            AsciiStyle::Dots => DOTS_RAMP,
            AsciiStyle::Simple => SIMPLE_RAMP,
        };
        s.chars().collect()
    }
}

/// Ramp character for a point: escaped points scale by iteration count,
/// interior points take the densest glyph.
pub fn glyph_for(point: &FractalPoint, max_iter: u32, ramp: &[char]) -> char {
    let Some(&last) = ramp.last() else { return ' ' };
    if point.escaped && max_iter > 0 {
        let idx = point.iterations as usize * ramp.len() / max_iter as usize;
        ramp[idx.min(ramp.len() - 1)]
    } else {
        last
    }
}

pub fn render_ascii(
    family: &FractalFamily,
    viewport: &Viewport,
    width: usize,
    height: usize,
    max_iter: u32,
    style: AsciiStyle,
) -> Result<Vec<String>> {
    let ramp = style.ramp();
    let grid = evaluate_grid(family, viewport, width, height, max_iter)?;
    Ok(grid
        .iter()
        .map(|row| row.iter().map(|p| glyph_for(p, max_iter, &ramp)).collect())
        .collect())
}

/// Replace evenly spaced rows of a rendering with centred poem lines.
pub fn overlay_poem(fractal_lines: &[String], poem_lines: &[&str], width: usize) -> String {
    let interval = fractal_lines.len() / poem_lines.len().max(1);
    let mut next = 0;
    let mut out = Vec::with_capacity(fractal_lines.len());

    for (i, line) in fractal_lines.iter().enumerate() {
        if interval > 0 && i % interval == 0 && next < poem_lines.len() {
            let poem_line = fit_width(poem_lines[next], width);
            let padding = width.saturating_sub(poem_line.chars().count()) / 2;
            out.push(format!("{}{}", " ".repeat(padding), poem_line));
            next += 1;
        } else {
            out.push(line.clone());
        }
    }
    out.join("\n")
}

fn fit_width(line: &str, width: usize) -> String {
    if line.chars().count() > width {
        let kept: String = line.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        line.to_string()
    }
}

/// Map an HSV colour onto the six basic ANSI foreground hues.
pub fn hsv_to_ansi(h: f64, _s: f64, v: f64) -> String {
    if v < 0.1 {
        return ANSI_BLACK_BG.to_string();
    }
    let idx = ((h * ANSI_HUES.len() as f64).floor() as i64).rem_euclid(ANSI_HUES.len() as i64) as usize;
    let code = ANSI_HUES[idx];
    if v > 0.7 {
        format!("\x1b[1;{}m", code)
    } else {
        format!("\x1b[{}m", code)
    }
}

pub fn ansi_cell(point: &FractalPoint, max_iter: u32) -> String {
    let (hue, saturation, value) = if point.escaped && max_iter > 0 {
        (
            (point.iterations as f64 / max_iter as f64) % 1.0,
            (point.magnitude / 2.0).min(1.0),
            0.8,
        )
    } else {
        (point.magnitude % 1.0, 0.5, 0.3)
    };
    format!("{}█{}", hsv_to_ansi(hue, saturation, value), ANSI_RESET)
}

pub fn render_ansi(
    family: &FractalFamily,
    viewport: &Viewport,
    width: usize,
    height: usize,
    max_iter: u32,
) -> Result<String> {
    let grid = evaluate_grid(family, viewport, width, height, max_iter)?;
    Ok(grid
        .iter()
        .map(|row| row.iter().map(|p| ansi_cell(p, max_iter)).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n"))
}

pub fn mandala(size: usize) -> String {
    let center = (size / 2) as f64;
    let mut rows = Vec::with_capacity(size);

    for row in 0..size {
        let mut line = String::with_capacity(size * 3);
        for col in 0..size {
            let dx = col as f64 - center;
            let dy = row as f64 - center;
            let distance = dx.hypot(dy);
            let angle = dy.atan2(dx);

            let v = (distance * 0.5).sin() * (angle * 3.0).cos() * (angle * 5.0 + distance * 0.3).sin();
            line.push(match v {
                v if v > 0.3 => '●',
                v if v > 0.0 => '○',
                v if v > -0.3 => '·',
                _ => ' ',
            });
        }
        rows.push(line);
    }
    rows.join("\n")
}
