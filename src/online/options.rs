use crate::fixation::FixationOptions;
use crate::zone::ZoneOptions;
use serde::Deserialize;

/// Settings of the online reading mapper.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ReadingOptions {
    /// Amount removed from the nonreading score per reading saccade.
    pub forgetting_factor: f32,
    /// Reading saccades needed to enter reading mode.
    pub reading_threshold: u32,
    /// Nonreading score that leaves reading mode.
    pub nonreading_threshold: u32,
    pub zone: ZoneOptions,
    pub line_predictor: LinePredictorFactors,
    pub fixation: FixationOptions,
}

impl Default for ReadingOptions {
    fn default() -> Self {
        Self {
            forgetting_factor: 0.2,
            reading_threshold: 3,
            nonreading_threshold: 2,
            zone: ZoneOptions::default(),
            line_predictor: LinePredictorFactors::default(),
            fixation: FixationOptions::default(),
        }
    }
}

/// Line predictor factors; distances are fractions of the line spacing.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct LinePredictorFactors {
    pub current_line_dist_reduce: f32,
    pub guess_max_dist: f32,
    pub current_line_def_dist: f32,
    pub current_line_max_dist: f32,
    /// Fraction of the current line width; a more negative `dx` counts as a return sweep.
    pub new_line_saccade_length_fraction: f32,
}

impl Default for LinePredictorFactors {
    fn default() -> Self {
        Self {
            current_line_dist_reduce: 0.8,
            guess_max_dist: 3.0,
            current_line_def_dist: 0.48,
            current_line_max_dist: 0.85,
            new_line_saccade_length_fraction: -0.7,
        }
    }
}

impl LinePredictorFactors {
    /// Convert spacing fractions into pixel thresholds.
    pub fn resolve(&self, line_spacing: f32) -> PredictorThresholds {
        PredictorThresholds {
            current_line_dist_reduce: self.current_line_dist_reduce,
            guess_max_dist: self.guess_max_dist * line_spacing,
            current_line_def_dist: self.current_line_def_dist * line_spacing,
            current_line_max_dist: self.current_line_max_dist * line_spacing,
            new_line_saccade_length_fraction: self.new_line_saccade_length_fraction,
            line_spacing,
        }
    }
}

/// Pixel thresholds derived from [`LinePredictorFactors`] for one geometry.
#[derive(Clone, Copy, Debug)]
pub struct PredictorThresholds {
    pub current_line_dist_reduce: f32,
    pub guess_max_dist: f32,
    pub current_line_def_dist: f32,
    pub current_line_max_dist: f32,
    pub new_line_saccade_length_fraction: f32,
    pub line_spacing: f32,
}
