use serde::Deserialize;

/// Constants of the offline fitter. Distances in pixels, durations in ms.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct StaticFitOptions {
    /// Horizontal margin around the text box; fixations beyond it are dropped.
    pub margin_x: f32,
    pub margin_y: f32,
    /// Maximum RMS error of a merged set of fixations.
    pub fit_threshold: f32,
    pub skimming_threshold_x: f32,
    pub skimming_threshold_y: f32,
    /// Lower clamp of the per-line horizontal scale; the upper one is `2 - value`.
    pub scale_diff_threshold: f32,
    pub max_linear_gradient: f32,
    /// Sets with at least this many fixations count as long.
    pub long_set_length_threshold: usize,
    /// Fixations shorter than this are merged into a neighbour.
    pub min_duration: f64,
    /// Maximum distance for merging a short fixation.
    pub max_dist: f32,
    /// A gap between sets above this many line spacings skips a text line.
    pub blank_line_gap_factor: f32,
    /// Error bound of the last-resort merge pass; `None` accepts any error.
    pub forced_fit_threshold: Option<f32>,
    /// Longest visit to another line that is treated as a transition artifact.
    pub noise_visit_max_length: usize,
}

impl Default for StaticFitOptions {
    fn default() -> Self {
        Self {
            margin_x: 100.0,
            margin_y: 180.0,
            fit_threshold: 27.0,
            skimming_threshold_x: 500.0,
            skimming_threshold_y: 40.0,
            scale_diff_threshold: 0.9,
            max_linear_gradient: 0.15,
            long_set_length_threshold: 3,
            min_duration: 150.0,
            max_dist: 40.0,
            blank_line_gap_factor: 1.7,
            forced_fit_threshold: None,
            noise_visit_max_length: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_other_defaults() {
        let opts: StaticFitOptions =
            serde_json::from_str(r#"{"fit_threshold": 25.0, "forced_fit_threshold": 60.0}"#)
                .unwrap();
        assert_eq!(opts.fit_threshold, 25.0);
        assert_eq!(opts.forced_fit_threshold, Some(60.0));
        assert_eq!(opts.margin_x, 100.0);
        assert_eq!(opts.long_set_length_threshold, 3);
        assert_eq!(opts.noise_visit_max_length, 1);
    }
}
