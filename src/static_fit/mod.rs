//! Offline fixation-to-word mapping for a complete recording.
//!
//! [`StaticFitter::map`] annotates a [`Recording`] in place. Stages:
//! - Filter: drop fixations outside the text box plus margins, fold short
//!   fixations into close neighbours (`filter`).
//! - Progressions: split into runs of short rightward saccades (`progression`).
//! - Merge: join runs by regression fit until one set per text line remains,
//!   then drop single-fixation sets (`merge`).
//! - Align: order sets top to bottom, skip blank lines, rescale each line's
//!   x range onto its words (`align`).
//! - Words: nearest word per fixation with shrinking widths (`words`).
//! - Regressions: backward steps within a line, then removal of isolated
//!   visits to another line (`regressions`).
//!
//! Typical usage:
//! ```
//! use reading_mapper::static_fit::{Recording, RecordedFixation, StaticFitter};
//! use reading_mapper::WordBox;
//!
//! let words = vec![
//!     WordBox::new(0.0, 0.0, 80.0, 30.0, "hello"),
//!     WordBox::new(100.0, 0.0, 80.0, 30.0, "world"),
//! ];
//! let fixations = vec![
//!     RecordedFixation::new(40.0, 15.0, 200.0, 0.0),
//!     RecordedFixation::new(140.0, 15.0, 200.0, 250.0),
//! ];
//! let mut recording = Recording::new(words, fixations);
//! let report = StaticFitter::default().map(&mut recording);
//! assert_eq!(report.mapped_fixations, 2);
//! assert_eq!(recording.fixations[1].word.as_ref().map(|w| w.index), Some(1));
//! ```

pub mod align;
pub mod filter;
pub mod merge;
pub mod options;
pub mod progression;
pub mod recording;
pub mod regressions;
pub mod words;

pub use align::{HorizontalRescale, LineAssignment};
pub use filter::WorkingFixation;
pub use options::StaticFitOptions;
pub use progression::FixationSet;
pub use recording::{FixationWord, RecordedFixation, RecordedWord, Recording};

use crate::diagnostics::{elapsed_ms, LineRescale, StaticFitReport, TimingBreakdown};
use crate::geometry::{GeometryModel, Word};
use log::debug;
use std::time::Instant;
use words::LineWordMatcher;

pub struct StaticFitter {
    options: StaticFitOptions,
}

impl StaticFitter {
    pub fn new(options: StaticFitOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &StaticFitOptions {
        &self.options
    }

    /// Annotate `recording` in place. Earlier annotations are discarded first;
    /// a recording without words or fixations is left untouched.
    pub fn map(&self, recording: &mut Recording) -> StaticFitReport {
        let total_start = Instant::now();
        let opts = &self.options;
        let mut report = StaticFitReport {
            input_fixations: recording.fixations.len(),
            ..StaticFitReport::default()
        };
        if recording.fixations.is_empty() || recording.words.is_empty() {
            debug!("static fit: nothing to map");
            return report;
        }
        recording.clear_annotations();
        let Some(geometry) = GeometryModel::build(&recording.word_boxes()) else {
            return report;
        };
        report.text_lines = geometry.lines.len();
        let mut timings = TimingBreakdown::default();

        let stage = Instant::now();
        let mut fixations = filter::filter_in_box(&recording.fixations, &geometry.bounds, opts);
        report.kept_fixations = fixations.len();
        report.merged_short = filter::merge_short(&mut fixations, opts);
        timings.record("filter", stage);
        debug!(
            "static fit: {} of {} fixations kept, {} short merged",
            report.kept_fixations, report.input_fixations, report.merged_short
        );

        let stage = Instant::now();
        let progressions = progression::split_to_progressions(&fixations, opts);
        report.progressions = progressions.len();
        timings.record("progressions", stage);

        let stage = Instant::now();
        let (sets, passes) =
            merge::merge_sets(progressions, &fixations, geometry.lines.len(), opts);
        report.merge_passes = passes;
        let merged = sets.len();
        let sets: Vec<FixationSet> = sets.into_iter().filter(|s| s.len() > 1).collect();
        report.dropped_singletons = merged - sets.len();
        report.line_sets = sets.len();
        timings.record("merge", stage);
        debug!(
            "static fit: {} progressions -> {} line sets for {} lines",
            report.progressions, report.line_sets, report.text_lines
        );

        let stage = Instant::now();
        let (assignments, unmapped) = align::assign_lines(
            sets,
            &fixations,
            geometry.lines.len(),
            geometry.line_spacing,
            opts,
        );
        report.unmapped_sets = unmapped.len();
        for assignment in &assignments {
            let line = &geometry.lines[assignment.line];
            let rescale = align::line_rescale(&assignment.set, &fixations, &line.words, opts);
            if let Some(rescale) = rescale {
                report.rescaled_lines.push(LineRescale {
                    line: assignment.line,
                    rescale,
                });
            }
            map_line(recording, &fixations, assignment, &line.words, rescale);
        }
        for word in &mut recording.words {
            word.fixations.sort_unstable();
        }
        timings.record("mapping", stage);

        let stage = Instant::now();
        regressions::label_regressions(&mut recording.fixations);
        report.noise_stripped = regressions::remove_cross_line_noise(
            &mut recording.fixations,
            &mut recording.words,
            &geometry,
            opts.noise_visit_max_length,
        );
        timings.record("regressions", stage);

        report.mapped_fixations = recording.fixations.iter().filter(|f| f.is_mapped()).count();
        report.regressions = recording
            .fixations
            .iter()
            .filter(|f| f.is_regression)
            .count();
        timings.total_ms = elapsed_ms(total_start);
        report.timings = timings;
        debug!(
            "static fit: {} fixations mapped, {} regressions, {} stripped in {:.2} ms",
            report.mapped_fixations,
            report.regressions,
            report.noise_stripped,
            report.timings.total_ms
        );
        report
    }
}

impl Default for StaticFitter {
    fn default() -> Self {
        Self::new(StaticFitOptions::default())
    }
}

/// Assign words on one line and write the annotations of every recorded
/// fixation the working fixations stand for.
fn map_line(
    recording: &mut Recording,
    fixations: &[WorkingFixation],
    assignment: &LineAssignment,
    words: &[Word],
    rescale: Option<HorizontalRescale>,
) {
    let mut matcher = LineWordMatcher::new(words);
    for &item in &assignment.set.items {
        let fix = &fixations[item];
        let x = rescale.map_or(fix.x, |r| r.apply(fix.x));
        let Some(index) = matcher.nearest(x) else {
            continue;
        };
        let word = &words[index];
        for &member in &fix.members {
            let recorded = &mut recording.fixations[member];
            if let Some(r) = rescale {
                recorded.original_x = Some(recorded.x);
                recorded.x = r.apply(recorded.x);
            }
            recorded.line = Some(assignment.line);
            recorded.word = Some(FixationWord {
                left: word.rect.left,
                top: word.rect.top,
                right: word.rect.right(),
                bottom: word.rect.bottom(),
                index: word.index,
                text: word.text.clone(),
            });
            if let Some(target) = recording.words.get_mut(word.global_index) {
                target.fixations.push(member);
            }
        }
    }
}
