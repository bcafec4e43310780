use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::math::C;

pub const ESCAPE_RADIUS: f64 = 2.0;
pub const DEFAULT_MAX_ITER: u32 = 100;

pub const DEFAULT_JULIA: C = C { re: -0.7, im: 0.27015 };
pub const JULIA_SPIRAL: C = C { re: -0.8, im: 0.156 };
pub const JULIA_DRAGON: C = C { re: 0.285, im: 0.01 };
pub const JULIA_SNOWFLAKE: C = C { re: -0.4, im: 0.6 };

/// Identifiers accepted by [`resolve_family`], in display order.
pub const FAMILY_NAMES: &[&str] = &[
    "mandelbrot",
    "julia",
    "julia_spiral",
    "julia_dragon",
    "julia_snowflake",
];

/// One evaluated point of the complex plane.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FractalPoint {
    pub x: f64,
    pub y: f64,
    pub iterations: u32,
    pub escaped: bool,
    /// `ln|z|` at escape, or the raw `|z|` at the iteration cap.
    pub magnitude: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FractalFamily {
    Mandelbrot,
    Julia(C),
}

impl FractalFamily {
    pub fn julia(re: f64, im: f64) -> Self {
        FractalFamily::Julia(C::new(re, im))
    }

    pub fn evaluate(&self, x: f64, y: f64, max_iter: u32) -> FractalPoint {
        evaluate(x, y, self, max_iter)
    }

    pub fn name(&self) -> String {
        match self {
            FractalFamily::Mandelbrot => "Mandelbrot".to_string(),
            FractalFamily::Julia(c) => format!("Julia({})", c),
        }
    }
}

/// Escape-time iteration of `z -> z² + c`.
///
/// Mandelbrot starts from `z = 0` with `c` the point itself; Julia starts from
/// the point with `c` fixed by the family. The escape check runs before each
/// update, so `iterations` is the index of the step whose check fired.
pub fn evaluate(x: f64, y: f64, family: &FractalFamily, max_iter: u32) -> FractalPoint {
    let point = C::new(x, y);
    let (mut z, c) = match family {
        FractalFamily::Mandelbrot => (C::ZERO, point),
        FractalFamily::Julia(k) => (point, *k),
    };

    for i in 0..max_iter {
        let modulus = z.abs();
        if modulus > ESCAPE_RADIUS {
            let magnitude = if modulus > 0.0 { modulus.ln() } else { 0.0 };
            return FractalPoint { x, y, iterations: i, escaped: true, magnitude };
        }
        z = z.square().add(c);
    }

    FractalPoint { x, y, iterations: max_iter, escaped: false, magnitude: z.abs() }
}

/// Map a family identifier to its evaluation rule.
pub fn resolve_family(name: &str) -> Result<FractalFamily> {
    match name.trim().to_lowercase().as_str() {
        "mandelbrot" => Ok(FractalFamily::Mandelbrot),
        "julia" => Ok(FractalFamily::Julia(DEFAULT_JULIA)),
        "julia_spiral" | "julia2" => Ok(FractalFamily::Julia(JULIA_SPIRAL)),
        "julia_dragon" | "julia3" => Ok(FractalFamily::Julia(JULIA_DRAGON)),
        "julia_snowflake" => Ok(FractalFamily::Julia(JULIA_SNOWFLAKE)),
        _ => Err(Error::UnknownEngine(name.to_string())),
    }
}
