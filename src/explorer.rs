use rand::Rng;

use crate::error::Result;
use crate::fractal::{DEFAULT_MAX_ITER, FractalPoint, resolve_family};
use crate::grid::Viewport;
use crate::render::{AsciiStyle, render_ansi, render_ascii};
use crate::sampler::{BASE_HALF_SIZE, validate_zoom};

const PREVIEW_ITER: u32 = 30;
const ASCII_PREVIEW_ROWS: usize = 8;
const ESSENCE_SAMPLES: usize = 3;

/// A fixed stop on the guided tour.
pub struct TourStop {
    pub engine: &'static str,
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
    pub description: &'static str,
}

pub const TOUR_STOPS: &[TourStop] = &[
    TourStop { engine: "mandelbrot", x: 0.0, y: 0.0, zoom: 1.0, description: "The Classic Mandelbrot Set" },
    TourStop { engine: "mandelbrot", x: -0.7, y: 0.0, zoom: 4.0, description: "The Seahorse Valley" },
    TourStop { engine: "mandelbrot", x: -0.16, y: 1.04, zoom: 20.0, description: "Spiral Patterns" },
    TourStop { engine: "julia", x: 0.0, y: 0.0, zoom: 1.0, description: "Julia Set Beauty" },
    TourStop { engine: "julia2", x: 0.0, y: 0.0, zoom: 1.0, description: "Alternative Julia" },
];

/// Renders a region as a short essence line plus ASCII and colour previews.
#[derive(Clone, Debug)]
pub struct Explorer {
    pub ascii_size: (usize, usize),
    pub color_size: (usize, usize),
}

impl Default for Explorer {
    fn default() -> Self {
        Explorer { ascii_size: (60, 15), color_size: (40, 12) }
    }
}

pub fn essence_fragment(point: &FractalPoint) -> &'static str {
    match (point.escaped, point.iterations) {
        (false, _) => "infinite depth",
        (true, i) if i < 10 => "chaos blooms",
        (true, i) if i < 30 => "patterns dance",
        (true, _) => "order emerges",
    }
}

impl Explorer {
    pub fn explore_region<R: Rng + ?Sized>(
        &self,
        engine: &str,
        x: f64,
        y: f64,
        zoom: f64,
        rng: &mut R,
    ) -> Result<String> {
        let family = resolve_family(engine)?;
        validate_zoom(zoom)?;
        let size = BASE_HALF_SIZE / zoom;
        let viewport = Viewport::around(x, y, zoom)?;

        let fragments: Vec<&str> = (0..ESSENCE_SAMPLES)
            .map(|_| {
                let px = x + rng.gen_range(-size / 2.0..=size / 2.0);
                let py = y + rng.gen_range(-size / 2.0..=size / 2.0);
                essence_fragment(&family.evaluate(px, py, DEFAULT_MAX_ITER))
            })
            .collect();

        let (aw, ah) = self.ascii_size;
        let ascii = render_ascii(&family, &viewport, aw, ah, PREVIEW_ITER, AsciiStyle::Gradient)?;
        let (cw, ch) = self.color_size;
        let colored = render_ansi(&family, &viewport, cw, ch, PREVIEW_ITER)?;

        let rule = "=".repeat(60);
        let mut out = format!(
            "\n🔍 Exploring {} at ({:.3}, {:.3}) zoom {:.1}x\n",
            family.name(), x, y, zoom
        );
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&format!("Poetry essence: {}\n\n", fragments.join(" • ")));
        out.push_str("ASCII Fractal:\n");
        out.push_str(&ascii.iter().take(ASCII_PREVIEW_ROWS).cloned().collect::<Vec<_>>().join("\n"));
        out.push_str("\n\nColored Fractal:\n");
        out.push_str(&colored);
        out.push('\n');
        out.push_str(&rule);
        Ok(out)
    }

    pub fn guided_tour<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<String> {
        let mut out = String::from("\n🌟 FRACTAL POETRY TOUR 🌟\n");
        out.push_str(&"=".repeat(50));
        out.push('\n');

        for stop in TOUR_STOPS {
            out.push_str(&format!("\n📍 {}\n", stop.description));
            out.push_str(&self.explore_region(stop.engine, stop.x, stop.y, stop.zoom, rng)?);
            out.push('\n');
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn escaped(iterations: u32) -> FractalPoint {
        FractalPoint { x: 0.0, y: 0.0, iterations, escaped: true, magnitude: 1.0 }
    }

    #[test]
    fn fragments_by_depth() {
        assert_eq!(essence_fragment(&escaped(3)), "chaos blooms");
        assert_eq!(essence_fragment(&escaped(10)), "patterns dance");
        assert_eq!(essence_fragment(&escaped(30)), "order emerges");
        let inside = FractalPoint { escaped: false, iterations: 100, ..escaped(0) };
        assert_eq!(essence_fragment(&inside), "infinite depth");
    }

    #[test]
    fn exploration_report_layout() {
        let mut rng = StdRng::seed_from_u64(11);
        let out = Explorer::default().explore_region("mandelbrot", -0.5, 0.0, 2.0, &mut rng).unwrap();
        assert!(out.contains("Exploring Mandelbrot at (-0.500, 0.000) zoom 2.0x"));
        assert!(out.contains("Poetry essence: "));
        assert_eq!(out.matches(" • ").count(), 2);
        let ascii: Vec<&str> = out
            .split("ASCII Fractal:\n")
            .nth(1)
            .unwrap()
            .split("\n\nColored Fractal:")
            .next()
            .unwrap()
            .lines()
            .collect();
        assert_eq!(ascii.len(), 8);
        assert_eq!(out.matches("\x1b[0m").count(), 40 * 12);
    }

    #[test]
    fn unknown_engine_is_an_error() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = Explorer::default().explore_region("lyapunov", 0.0, 0.0, 1.0, &mut rng).unwrap_err();
        assert!(matches!(err, Error::UnknownEngine(_)));
    }

    #[test]
    fn tour_visits_every_stop() {
        let mut rng = StdRng::seed_from_u64(5);
        let explorer = Explorer { ascii_size: (10, 4), color_size: (6, 3) };
        let out = explorer.guided_tour(&mut rng).unwrap();
        for stop in TOUR_STOPS {
            assert!(out.contains(stop.description));
        }
        assert!(out.contains("Julia(-0.800+0.156i)"));
    }
}
