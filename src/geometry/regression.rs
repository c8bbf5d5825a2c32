//! Ordinary least-squares line `y = intercept + slope·x`.
//!
//! Points are summarised into a 2×2 normal-equation system which is solved
//! with `nalgebra`. Degenerate configurations (fewer than two points or all
//! points sharing one x) fall back to a flat line through the mean y.

use nalgebra::{Matrix2, Vector2};
use serde::Serialize;

const EPS: f64 = 1e-9;

/// Fitted line in screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LinearModel {
    pub intercept: f32,
    pub slope: f32,
}

impl LinearModel {
    pub fn flat(y: f32) -> Self {
        Self {
            intercept: y,
            slope: 0.0,
        }
    }

    #[inline]
    pub fn eval(&self, x: f32) -> f32 {
        self.intercept + self.slope * x
    }

    /// Root-mean-square vertical residual over `points`.
    pub fn rms_error(&self, points: &[[f32; 2]]) -> f32 {
        if points.is_empty() {
            return 0.0;
        }
        let sum: f64 = points
            .iter()
            .map(|p| {
                let r = (p[1] - self.eval(p[0])) as f64;
                r * r
            })
            .sum();
        (sum / points.len() as f64).sqrt() as f32
    }
}

#[derive(Default)]
struct NormalEquationAccum {
    n: f64,
    sum_x: f64,
    sum_y: f64,
    sum_xx: f64,
    sum_xy: f64,
}

impl NormalEquationAccum {
    fn push(&mut self, x: f32, y: f32) {
        let (x, y) = (x as f64, y as f64);
        self.n += 1.0;
        self.sum_x += x;
        self.sum_y += y;
        self.sum_xx += x * x;
        self.sum_xy += x * y;
    }

    fn solve(&self) -> Option<LinearModel> {
        if self.n < 1.0 {
            return None;
        }
        let mean_y = (self.sum_y / self.n) as f32;
        if self.n < 2.0 {
            return Some(LinearModel::flat(mean_y));
        }
        let a = Matrix2::new(self.n, self.sum_x, self.sum_x, self.sum_xx);
        let var_x = self.sum_xx / self.n - (self.sum_x / self.n).powi(2);
        if var_x.abs() <= EPS {
            return Some(LinearModel::flat(mean_y));
        }
        let b = Vector2::new(self.sum_y, self.sum_xy);
        let sol = a.lu().solve(&b)?;
        if !sol[0].is_finite() || !sol[1].is_finite() {
            return Some(LinearModel::flat(mean_y));
        }
        Some(LinearModel {
            intercept: sol[0] as f32,
            slope: sol[1] as f32,
        })
    }
}

/// Least-squares fit over `points` (`[x, y]`). `None` for an empty slice.
pub fn fit_linear(points: &[[f32; 2]]) -> Option<LinearModel> {
    let mut accum = NormalEquationAccum::default();
    for p in points {
        accum.push(p[0], p[1]);
    }
    accum.solve()
}

/// Fit over the concatenation of two point sets without allocating.
pub fn fit_linear_union(a: &[[f32; 2]], b: &[[f32; 2]]) -> Option<LinearModel> {
    let mut accum = NormalEquationAccum::default();
    for p in a.iter().chain(b.iter()) {
        accum.push(p[0], p[1]);
    }
    accum.solve()
}
