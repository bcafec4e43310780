// Region sampling: random draws from a square window of the complex plane,
// and the zooming "journey" built on top of it.

use rand::Rng;
use rayon::prelude::*;
use tracing::debug;

use crate::error::{Error, Result};
use crate::fractal::{FractalFamily, FractalPoint, resolve_family};

/// Half-width of the sampling window at zoom 1.
pub const BASE_HALF_SIZE: f64 = 2.0;
pub const JOURNEY_BATCH: usize = 2;
/// Journeys stop doubling here; a finite cap keeps every stop a valid region.
pub const MAX_ZOOM: f64 = 1e300;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
    pub center_x: f64,
    pub center_y: f64,
    pub zoom: f64,
}

impl Region {
    pub fn new(center_x: f64, center_y: f64, zoom: f64) -> Result<Self> {
        validate_zoom(zoom)?;
        Ok(Region { center_x, center_y, zoom })
    }

    pub fn half_size(&self) -> f64 {
        BASE_HALF_SIZE / self.zoom
    }
}

/// The sampling window `[-BASE_HALF_SIZE / zoom, BASE_HALF_SIZE / zoom]` must
/// have a finite width, which rules out zooms below about 2.2e-308.
pub fn validate_zoom(zoom: f64) -> Result<()> {
    if zoom.is_finite() && zoom > 0.0 && (2.0 * (BASE_HALF_SIZE / zoom)).is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!("zoom must be positive and finite, got {}", zoom)))
    }
}

/// Draw `count` points uniformly from the region and evaluate each.
///
/// All coordinates are drawn before any evaluation, so a seeded source yields
/// the same points regardless of how evaluation is scheduled.
pub fn sample_region<R: Rng + ?Sized>(
    family: &FractalFamily,
    region: &Region,
    count: usize,
    max_iter: u32,
    rng: &mut R,
) -> Result<Vec<FractalPoint>> {
    validate_zoom(region.zoom)?;
    if count == 0 {
        return Err(Error::InvalidParameter("sample count must be positive".to_string()));
    }

    let half = region.half_size();
    let coords: Vec<(f64, f64)> = (0..count)
        .map(|_| {
            let x = region.center_x + rng.gen_range(-half..=half);
            let y = region.center_y + rng.gen_range(-half..=half);
            (x, y)
        })
        .collect();

    debug!(family = %family.name(), count, max_iter, zoom = region.zoom, "sampling region");

    Ok(coords
        .into_par_iter()
        .map(|(x, y)| family.evaluate(x, y, max_iter))
        .collect())
}

/// Name-based entry point: resolves the family first, so an unknown name
/// fails before any random draw.
pub fn sample_fractal_region<R: Rng + ?Sized>(
    family_name: &str,
    center_x: f64,
    center_y: f64,
    zoom: f64,
    count: usize,
    max_iter: u32,
    rng: &mut R,
) -> Result<Vec<FractalPoint>> {
    let family = resolve_family(family_name)?;
    let region = Region::new(center_x, center_y, zoom)?;
    sample_region(&family, &region, count, max_iter, rng)
}

/// Where a journey moves next.
///
/// Non-escaped points rank by iteration count, escaped points rank as 0, and
/// the first maximum in draw order wins. When every point escaped this picks
/// the first point drawn, whatever its iteration count.
pub fn pick_recenter(points: &[FractalPoint]) -> Option<&FractalPoint> {
    let mut best: Option<(&FractalPoint, u32)> = None;
    for p in points {
        let key = if p.escaped { 0 } else { p.iterations };
        match best {
            Some((_, k)) if key <= k => {}
            _ => best = Some((p, key)),
        }
    }
    best.map(|(p, _)| p)
}

#[derive(Clone, Debug)]
pub struct Journey {
    pub points: Vec<FractalPoint>,
    /// Region sampled at each step, in order.
    pub stops: Vec<Region>,
}

/// Start at the origin with zoom 1, sample a batch, move to the most
/// interesting sample and double the zoom; repeat `steps` times. The zoom
/// saturates at [`MAX_ZOOM`], so long journeys keep sampling the same depth.
pub fn journey<R: Rng + ?Sized>(
    family: &FractalFamily,
    steps: usize,
    batch: usize,
    max_iter: u32,
    rng: &mut R,
) -> Result<Journey> {
    if steps == 0 {
        return Err(Error::InvalidParameter("journey needs at least one step".to_string()));
    }

    let mut region = Region::new(0.0, 0.0, 1.0)?;
    let mut points = Vec::with_capacity(steps * batch);
    let mut stops = Vec::with_capacity(steps);

    for step in 0..steps {
        let sampled = sample_region(family, &region, batch, max_iter, rng)?;
        stops.push(region);

        if let Some(next) = pick_recenter(&sampled) {
            let zoom = (region.zoom * 2.0).min(MAX_ZOOM);
            debug!(step, x = next.x, y = next.y, zoom, "journey re-centers");
            region = Region::new(next.x, next.y, zoom)?;
        }
        points.extend(sampled);
    }

    Ok(Journey { points, stops })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fractal::DEFAULT_JULIA;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn point(iterations: u32, escaped: bool, x: f64) -> FractalPoint {
        FractalPoint { x, y: 0.0, iterations, escaped, magnitude: 0.0 }
    }

    #[test]
    fn samples_stay_inside_the_window() {
        let mut rng = StdRng::seed_from_u64(7);
        let region = Region::new(-0.5, 0.25, 4.0).unwrap();
        let points = sample_region(&FractalFamily::Mandelbrot, &region, 64, 50, &mut rng).unwrap();
        assert_eq!(points.len(), 64);
        for p in &points {
            assert!((p.x - -0.5).abs() <= 0.5);
            assert!((p.y - 0.25).abs() <= 0.5);
            assert!(p.iterations <= 50);
        }
    }

    #[test]
    fn seeded_sampling_is_reproducible() {
        let family = FractalFamily::Julia(DEFAULT_JULIA);
        let region = Region::new(0.0, 0.0, 1.0).unwrap();
        let a = sample_region(&family, &region, 16, 100, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = sample_region(&family, &region, 16, 100, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_family_fails_before_drawing() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut untouched = StdRng::seed_from_u64(1);
        let err = sample_fractal_region("newton", 0.0, 0.0, 1.0, 10, 100, &mut rng).unwrap_err();
        assert!(matches!(err, Error::UnknownEngine(ref n) if n == "newton"));
        assert_eq!(rng.r#gen::<u64>(), untouched.r#gen::<u64>());
    }

    #[test]
    fn rejects_degenerate_parameters() {
        let mut rng = StdRng::seed_from_u64(1);
        for zoom in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = sample_fractal_region("mandelbrot", 0.0, 0.0, zoom, 10, 100, &mut rng).unwrap_err();
            assert!(matches!(err, Error::InvalidParameter(_)));
        }
        let err = sample_fractal_region("mandelbrot", 0.0, 0.0, 1.0, 0, 100, &mut rng).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn rejects_zooms_too_small_for_a_finite_window() {
        let mut rng = StdRng::seed_from_u64(1);
        for zoom in [1e-308, f64::MIN_POSITIVE, 2f64.powi(-1023)] {
            let err = sample_fractal_region("mandelbrot", 0.0, 0.0, zoom, 4, 10, &mut rng).unwrap_err();
            assert!(matches!(err, Error::InvalidParameter(_)), "zoom {zoom:e}");
        }
        // The smallest zoom whose window still has a finite width.
        assert!(sample_fractal_region("mandelbrot", 0.0, 0.0, 1e-307, 4, 10, &mut rng).is_ok());
        assert!(sample_fractal_region("mandelbrot", 0.0, 0.0, f64::MAX, 4, 10, &mut rng).is_ok());
    }

    #[test]
    fn recenter_prefers_most_iterations_then_draw_order() {
        let points = [
            point(3, true, 0.1),
            point(40, false, 0.2),
            point(100, false, 0.3),
            point(100, false, 0.4),
        ];
        assert_eq!(pick_recenter(&points).unwrap().x, 0.3);
    }

    #[test]
    fn recenter_falls_back_to_first_draw_when_all_escaped() {
        // Escaped points all rank 0, so the deepest escape does not win.
        let points = [point(2, true, 0.1), point(90, true, 0.2), point(40, true, 0.3)];
        assert_eq!(pick_recenter(&points).unwrap().x, 0.1);
        assert!(pick_recenter(&[]).is_none());
    }

    #[test]
    fn journey_doubles_zoom_each_step() {
        let mut rng = StdRng::seed_from_u64(3);
        let j = journey(&FractalFamily::Mandelbrot, 5, JOURNEY_BATCH, 100, &mut rng).unwrap();
        assert_eq!(j.points.len(), 10);
        let zooms: Vec<f64> = j.stops.iter().map(|r| r.zoom).collect();
        assert_eq!(zooms, vec![1.0, 2.0, 4.0, 8.0, 16.0]);
        assert_eq!((j.stops[0].center_x, j.stops[0].center_y), (0.0, 0.0));
        for (i, stop) in j.stops.iter().enumerate().skip(1) {
            let batch = &j.points[(i - 1) * 2..i * 2];
            let expected = pick_recenter(batch).unwrap();
            assert_eq!((stop.center_x, stop.center_y), (expected.x, expected.y));
        }
    }

    #[test]
    fn long_journeys_saturate_the_zoom() {
        let mut rng = StdRng::seed_from_u64(5);
        let j = journey(&FractalFamily::Mandelbrot, 1100, 1, 10, &mut rng).unwrap();
        assert_eq!(j.stops.len(), 1100);
        assert!(j.stops.iter().all(|r| r.zoom.is_finite() && r.zoom <= MAX_ZOOM));
        assert_eq!(j.stops.last().unwrap().zoom, MAX_ZOOM);
    }
}
