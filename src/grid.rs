use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::fractal::{FractalFamily, FractalPoint};
use crate::sampler::{BASE_HALF_SIZE, validate_zoom};

/// Rectangular window of the complex plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport { x_min: -2.0, x_max: 2.0, y_min: -2.0, y_max: 2.0 }
    }
}

impl Viewport {
    pub fn around(center_x: f64, center_y: f64, zoom: f64) -> Result<Self> {
        validate_zoom(zoom)?;
        let size = BASE_HALF_SIZE / zoom;
        Ok(Viewport {
            x_min: center_x - size,
            x_max: center_x + size,
            y_min: center_y - size,
            y_max: center_y + size,
        })
    }

    pub fn x_at(&self, col: usize, width: usize) -> f64 {
        self.x_min + (self.x_max - self.x_min) * col as f64 / width as f64
    }

    pub fn y_at(&self, row: usize, height: usize) -> f64 {
        self.y_min + (self.y_max - self.y_min) * row as f64 / height as f64
    }
}

/// Evaluate one point per cell, row-major. Rows run in parallel.
pub fn evaluate_grid(
    family: &FractalFamily,
    viewport: &Viewport,
    width: usize,
    height: usize,
    max_iter: u32,
) -> Result<Vec<Vec<FractalPoint>>> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidParameter(format!(
            "grid dimensions must be positive, got {}x{}",
            width, height
        )));
    }

    Ok((0..height)
        .into_par_iter()
        .map(|row| {
            let y = viewport.y_at(row, height);
            (0..width)
                .map(|col| family.evaluate(viewport.x_at(col, width), y, max_iter))
                .collect()
        })
        .collect())
}
