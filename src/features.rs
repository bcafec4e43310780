use crate::fractal::FractalPoint;

/// Iteration count at which complexity saturates. Fixed so that poems stay
/// comparable across runs with different iteration caps.
pub const COMPLEXITY_SCALE: f64 = 100.0;

/// Bounded poetic reading of an evaluated point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoeticFeatures {
    /// `[0, 1]`
    pub complexity: f64,
    /// `>= 0`, passthrough of the point's magnitude.
    pub intensity: f64,
    /// `0.0` or `1.0`
    pub chaos: f64,
    /// `[0, 1)`
    pub rhythm: f64,
}

pub fn extract(point: &FractalPoint) -> PoeticFeatures {
    PoeticFeatures {
        complexity: (point.iterations as f64 / COMPLEXITY_SCALE).min(1.0),
        intensity: point.magnitude,
        chaos: if point.escaped { 1.0 } else { 0.0 },
        rhythm: floor_mod_one(point.x + point.y),
    }
}

impl FractalPoint {
    pub fn features(&self) -> PoeticFeatures {
        extract(self)
    }
}

fn floor_mod_one(v: f64) -> f64 {
    let r = v.rem_euclid(1.0);
    // rem_euclid rounds tiny negatives up to exactly 1.0
    if r >= 1.0 { 0.0 } else { r }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn point(x: f64, y: f64, iterations: u32, escaped: bool, magnitude: f64) -> FractalPoint {
        FractalPoint { x, y, iterations, escaped, magnitude }
    }

    #[test]
    fn complexity_saturates_at_one_hundred_iterations() {
        assert_eq!(extract(&point(0.0, 0.0, 50, true, 1.0)).complexity, 0.5);
        assert_eq!(extract(&point(0.0, 0.0, 100, false, 0.0)).complexity, 1.0);
        assert_eq!(extract(&point(0.0, 0.0, 400, false, 0.0)).complexity, 1.0);
    }

    #[test]
    fn chaos_and_intensity_follow_the_point() {
        let f = extract(&point(0.1, 0.2, 3, true, 1.75));
        assert_eq!(f.chaos, 1.0);
        assert_eq!(f.intensity, 1.75);

        let f = extract(&point(0.1, 0.2, 100, false, 0.4));
        assert_eq!(f.chaos, 0.0);
        assert_eq!(f.intensity, 0.4);
    }

    #[test]
    fn rhythm_uses_floor_mod_for_negative_sums() {
        let f = extract(&point(-0.3, -0.4, 0, false, 0.0));
        assert!((f.rhythm - 0.3).abs() < 1e-12);

        let f = extract(&point(1.25, 0.5, 0, false, 0.0));
        assert!((f.rhythm - 0.75).abs() < 1e-12);
    }

    #[test]
    fn rhythm_never_reaches_one() {
        assert_eq!(floor_mod_one(-1e-20), 0.0);
        assert_eq!(floor_mod_one(-2.0), 0.0);
    }

    proptest! {
        #[test]
        fn features_stay_in_range(
            x in -10.0f64..10.0,
            y in -10.0f64..10.0,
            iterations in 0u32..1000,
            escaped in any::<bool>(),
            magnitude in 0.0f64..10.0,
        ) {
            let f = extract(&point(x, y, iterations, escaped, magnitude));
            prop_assert!((0.0..=1.0).contains(&f.complexity));
            prop_assert!((0.0..1.0).contains(&f.rhythm));
            prop_assert!(f.chaos == 0.0 || f.chaos == 1.0);
            prop_assert!(f.intensity >= 0.0);
        }
    }
}
