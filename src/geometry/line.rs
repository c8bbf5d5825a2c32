use super::regression::{fit_linear, LinearModel};
use super::word::Word;
use crate::types::Rect;

/// A row of words plus the fixations that were mapped onto it.
#[derive(Clone, Debug)]
pub struct Line {
    pub index: usize,
    pub words: Vec<Word>,
    pub bounds: Rect,
    pub center: [f32; 2],
    points: Vec<[f32; 2]>,
    fit_eq: Option<LinearModel>,
}

impl Line {
    pub(crate) fn new(index: usize, words: Vec<Word>) -> Self {
        let bounds = words
            .iter()
            .skip(1)
            .fold(words[0].rect, |acc, w| acc.union(&w.rect));
        Self {
            index,
            words,
            center: bounds.center(),
            bounds,
            points: Vec::new(),
            fit_eq: None,
        }
    }

    pub fn width(&self) -> f32 {
        self.bounds.width
    }

    pub fn has_fit(&self) -> bool {
        self.fit_eq.is_some()
    }

    pub fn fit_model(&self) -> Option<LinearModel> {
        self.fit_eq
    }

    /// Signed vertical distance of `(x, y)` from the line; positive below.
    pub fn fit(&self, x: f32, y: f32) -> f32 {
        match self.fit_eq {
            Some(model) => y - model.eval(x),
            None => y - self.center[1],
        }
    }

    /// Record a fixation mapped onto this line and refresh the regression.
    ///
    /// The regression is only used once two points with distinct x exist.
    pub fn add_fixation(&mut self, x: f32, y: f32) {
        self.points.push([x, y]);
        if self.points.len() < 2 {
            return;
        }
        let x0 = self.points[0][0];
        if self.points.iter().all(|p| (p[0] - x0).abs() < f32::EPSILON) {
            return;
        }
        self.fit_eq = fit_linear(&self.points);
    }

    pub fn fixation_points(&self) -> &[[f32; 2]] {
        &self.points
    }

    pub(crate) fn clear_fit(&mut self) {
        self.points.clear();
        self.fit_eq = None;
    }

    /// Word closest to `x` by horizontal distance; ties keep the leftmost.
    pub fn nearest_word(&self, x: f32) -> Option<(usize, f32)> {
        let mut best: Option<(usize, f32)> = None;
        for (i, word) in self.words.iter().enumerate() {
            let dist = word.rect.horizontal_distance(x);
            if best.map_or(true, |(_, d)| dist < d) {
                best = Some((i, dist));
                if dist == 0.0 {
                    break;
                }
            }
        }
        best
    }
}
