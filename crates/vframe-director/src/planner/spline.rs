//! Clamped cubic spline interpolation.
//!
//! One spline per camera axis (centre x, centre y, zoom) is fitted through the
//! keyframe times with zero first derivative at both ends, so the camera
//! starts and ends at rest instead of extrapolating past the boundary knots.

use crate::error::{DirectorError, DirectorResult};

use super::easing::ease_in_out_cubic;

/// Minimum knot spacing accepted by the fit (seconds).
const MIN_KNOT_SPACING: f64 = 1e-6;

/// Pivots smaller than this make the tridiagonal system singular.
const PIVOT_EPSILON: f64 = 1e-12;

/// Interpolating cubic spline with clamped (zero-slope) boundary conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct ClampedCubicSpline {
    knots: Vec<f64>,
    values: Vec<f64>,
    /// Second derivative at each knot
    moments: Vec<f64>,
}

impl ClampedCubicSpline {
    /// Fit through `(knots[i], values[i])`.
    ///
    /// Knots must be finite, strictly increasing and at least two.
    pub fn fit(knots: &[f64], values: &[f64]) -> DirectorResult<Self> {
        let n = knots.len();
        if n < 2 {
            return Err(DirectorError::spline_fit(format!("need at least 2 knots, got {}", n)));
        }
        if values.len() != n {
            return Err(DirectorError::spline_fit(format!(
                "{} knots but {} values",
                n,
                values.len()
            )));
        }
        if knots.iter().chain(values).any(|v| !v.is_finite()) {
            return Err(DirectorError::spline_fit("non-finite knot or value"));
        }
        if let Some(w) = knots.windows(2).find(|w| w[1] - w[0] < MIN_KNOT_SPACING) {
            return Err(DirectorError::spline_fit(format!(
                "knots not strictly increasing at {:.6} -> {:.6}",
                w[0], w[1]
            )));
        }

        let h: Vec<f64> = knots.windows(2).map(|w| w[1] - w[0]).collect();
        let slope: Vec<f64> = (0..n - 1).map(|i| (values[i + 1] - values[i]) / h[i]).collect();

        // Tridiagonal system for the knot moments
        let mut sub = vec![0.0; n];
        let mut diag = vec![0.0; n];
        let mut sup = vec![0.0; n];
        let mut rhs = vec![0.0; n];

        diag[0] = 2.0 * h[0];
        sup[0] = h[0];
        rhs[0] = 6.0 * slope[0];

        for i in 1..n - 1 {
            sub[i] = h[i - 1];
            diag[i] = 2.0 * (h[i - 1] + h[i]);
            sup[i] = h[i];
            rhs[i] = 6.0 * (slope[i] - slope[i - 1]);
        }

        sub[n - 1] = h[n - 2];
        diag[n - 1] = 2.0 * h[n - 2];
        rhs[n - 1] = -6.0 * slope[n - 2];

        let moments = solve_tridiagonal(&sub, &diag, &sup, &rhs)?;

        Ok(Self {
            knots: knots.to_vec(),
            values: values.to_vec(),
            moments,
        })
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Value at `x`; held constant outside the knot range.
    pub fn evaluate(&self, x: f64) -> f64 {
        let (i, u) = self.locate(x);
        self.evaluate_segment(i, u)
    }

    /// Value at `x` with the position inside each segment eased, so motion
    /// accelerates out of one knot and decelerates into the next.
    pub fn evaluate_eased(&self, x: f64) -> f64 {
        let (i, u) = self.locate(x);
        self.evaluate_segment(i, ease_in_out_cubic(u))
    }

    /// Segment index and normalised position `u ∈ [0, 1]` within it.
    fn locate(&self, x: f64) -> (usize, f64) {
        let last = self.knots.len() - 1;
        if !(x > self.knots[0]) {
            return (0, 0.0);
        }
        if x >= self.knots[last] {
            return (last - 1, 1.0);
        }
        let i = self.knots.partition_point(|&k| k <= x) - 1;
        let h = self.knots[i + 1] - self.knots[i];
        (i, ((x - self.knots[i]) / h).clamp(0.0, 1.0))
    }

    fn evaluate_segment(&self, i: usize, u: f64) -> f64 {
        let h = self.knots[i + 1] - self.knots[i];
        let a = 1.0 - u;
        let b = u;
        a * self.values[i]
            + b * self.values[i + 1]
            + ((a * a * a - a) * self.moments[i] + (b * b * b - b) * self.moments[i + 1]) * h * h
                / 6.0
    }
}

/// Thomas algorithm. Fails on a vanishing pivot.
fn solve_tridiagonal(sub: &[f64], diag: &[f64], sup: &[f64], rhs: &[f64]) -> DirectorResult<Vec<f64>> {
    let n = diag.len();
    let mut c = vec![0.0; n];
    let mut d = vec![0.0; n];

    if diag[0].abs() < PIVOT_EPSILON {
        return Err(DirectorError::spline_fit("singular system at row 0"));
    }
    c[0] = sup[0] / diag[0];
    d[0] = rhs[0] / diag[0];

    for i in 1..n {
        let pivot = diag[i] - sub[i] * c[i - 1];
        if pivot.abs() < PIVOT_EPSILON {
            return Err(DirectorError::spline_fit(format!("singular system at row {}", i)));
        }
        c[i] = sup[i] / pivot;
        d[i] = (rhs[i] - sub[i] * d[i - 1]) / pivot;
    }

    let mut x = vec![0.0; n];
    x[n - 1] = d[n - 1];
    for i in (0..n - 1).rev() {
        x[i] = d[i] - c[i] * x[i + 1];
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn derivative(spline: &ClampedCubicSpline, x: f64) -> f64 {
        let h = 1e-6;
        (spline.evaluate(x + h) - spline.evaluate(x - h)) / (2.0 * h)
    }

    #[test]
    fn test_interpolates_knots() {
        let knots = [0.0, 2.0, 5.0, 9.0];
        let values = [100.0, 400.0, 250.0, 800.0];
        let spline = ClampedCubicSpline::fit(&knots, &values).unwrap();

        for (k, v) in knots.iter().zip(values) {
            assert!((spline.evaluate(*k) - v).abs() < 1e-9);
            assert!((spline.evaluate_eased(*k) - v).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zero_slope_at_ends() {
        let spline = ClampedCubicSpline::fit(&[0.0, 3.0, 6.0], &[0.0, 300.0, 100.0]).unwrap();
        assert!(derivative(&spline, 1e-5).abs() < 1e-2);
        assert!(derivative(&spline, 6.0 - 1e-5).abs() < 1e-2);
    }

    #[test]
    fn test_constant_data_stays_constant() {
        let spline = ClampedCubicSpline::fit(&[0.0, 1.0, 4.0, 5.0], &[7.0; 4]).unwrap();
        for i in 0..=50 {
            assert!((spline.evaluate(i as f64 * 0.1) - 7.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_two_knots_is_smoothstep() {
        let spline = ClampedCubicSpline::fit(&[0.0, 2.0], &[0.0, 10.0]).unwrap();
        assert!((spline.evaluate(1.0) - 5.0).abs() < 1e-9);
        assert!(spline.evaluate(0.5) < 2.5);
    }

    #[test]
    fn test_holds_outside_range() {
        let spline = ClampedCubicSpline::fit(&[1.0, 2.0], &[3.0, 4.0]).unwrap();
        assert_eq!(spline.evaluate(-5.0), 3.0);
        assert_eq!(spline.evaluate(10.0), 4.0);
        assert_eq!(spline.evaluate(f64::NAN), 3.0);
    }

    #[test]
    fn test_rejects_degenerate_input() {
        assert!(ClampedCubicSpline::fit(&[0.0], &[1.0]).is_err());
        assert!(ClampedCubicSpline::fit(&[0.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_err());
        assert!(ClampedCubicSpline::fit(&[0.0, 2.0, 1.0], &[1.0, 2.0, 3.0]).is_err());
        assert!(ClampedCubicSpline::fit(&[0.0, 1.0], &[1.0, f64::NAN]).is_err());
        assert!(ClampedCubicSpline::fit(&[0.0, 1.0], &[1.0]).is_err());
    }
}
