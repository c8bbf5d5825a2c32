use super::TimingBreakdown;
use crate::static_fit::HorizontalRescale;
use serde::Serialize;

/// Outcome of one merge pass.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergePassReport {
    pub label: String,
    pub sets_before: usize,
    pub sets_after: usize,
    pub merges: usize,
    /// Unions under the error bound skipped because they were too steep.
    pub rejected_by_gradient: usize,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRescale {
    pub line: usize,
    #[serde(flatten)]
    pub rescale: HorizontalRescale,
}

/// Counts and timings of a static fit run.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticFitReport {
    pub text_lines: usize,
    pub input_fixations: usize,
    /// Fixations inside the text box and its margins.
    pub kept_fixations: usize,
    pub merged_short: usize,
    pub progressions: usize,
    pub merge_passes: Vec<MergePassReport>,
    pub dropped_singletons: usize,
    pub line_sets: usize,
    /// Sets that fell below the last text line.
    pub unmapped_sets: usize,
    pub rescaled_lines: Vec<LineRescale>,
    pub mapped_fixations: usize,
    pub regressions: usize,
    pub noise_stripped: usize,
    pub timings: TimingBreakdown,
}

impl StaticFitReport {
    /// Line sets left after merging, before singletons were dropped.
    pub fn merged_sets(&self) -> usize {
        self.merge_passes
            .last()
            .map_or(self.progressions, |p| p.sets_after)
    }
}
