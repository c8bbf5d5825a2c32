use serde::Deserialize;

/// Dispersion/duration thresholds of the fixation detector.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct FixationOptions {
    /// Maximum distance (px) of a sample from the running group centroid.
    pub max_dispersion_px: f32,
    /// Minimum group duration (ms) for the group to count as a fixation.
    pub min_duration_ms: f64,
}

impl Default for FixationOptions {
    fn default() -> Self {
        Self {
            max_dispersion_px: 50.0,
            min_duration_ms: 80.0,
        }
    }
}
