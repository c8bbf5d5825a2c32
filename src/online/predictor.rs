//! Line prediction for a fixation while in reading mode.
//!
//! Prediction runs an ordered list of strategies; the first one that yields a
//! line wins:
//! - `FollowAfterNewLine`: right after a line change, before the new line has
//!   its own regression, compare against fixations already mapped to it.
//! - `Guess`: distance-fit against every line with priority for the current
//!   line, falling back to a jump estimate when nothing is close enough.
//! - `Closest`: nearest line center after applying the session offset.
//!
//! `Guess` is skipped whenever `FollowAfterNewLine` applies, so a failed
//! new-line check goes straight to `Closest`.

use super::options::PredictorThresholds;
use crate::fixation::{Fixation, FixationChain, FixationId};
use crate::geometry::{GeometryModel, Line};
use log::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Strategy {
    FollowAfterNewLine,
    Guess,
    Closest,
}

const STRATEGIES: [Strategy; 3] = [
    Strategy::FollowAfterNewLine,
    Strategy::Guess,
    Strategy::Closest,
];

/// Inputs of one prediction.
#[derive(Clone, Copy)]
pub struct PredictionInput<'c> {
    pub chain: &'c FixationChain,
    pub fixation: FixationId,
    pub current_line: Option<usize>,
    pub offset: f32,
}

impl PredictionInput<'_> {
    fn fixation(&self) -> &Fixation {
        &self.chain[self.fixation]
    }
}

pub struct LinePredictor<'g> {
    geometry: &'g GeometryModel,
    thresholds: PredictorThresholds,
}

impl<'g> LinePredictor<'g> {
    pub fn new(geometry: &'g GeometryModel, thresholds: PredictorThresholds) -> Self {
        Self {
            geometry,
            thresholds,
        }
    }

    /// Predict the line index of `input.fixation`.
    pub fn predict(&self, input: &PredictionInput<'_>) -> Option<usize> {
        let after_new_line = self.follows_line_change(input);
        STRATEGIES.iter().find_map(|strategy| {
            let result = match strategy {
                Strategy::FollowAfterNewLine if after_new_line => self.follow_after_new_line(input),
                Strategy::FollowAfterNewLine => None,
                Strategy::Guess if after_new_line => None,
                Strategy::Guess => self.guess(input),
                Strategy::Closest => self.closest(input),
            };
            if let Some(line) = result {
                trace!("line #{line} by {strategy:?}");
            }
            result
        })
    }

    fn follows_line_change(&self, input: &PredictionInput<'_>) -> bool {
        let prev_new_line = input
            .chain
            .previous(input.fixation)
            .is_some_and(|p| p.saccade.new_line);
        let current_unfitted = input
            .current_line
            .and_then(|i| self.geometry.line(i))
            .is_some_and(|l| !l.has_fit());
        prev_new_line && current_unfitted
    }

    fn follow_after_new_line(&self, input: &PredictionInput<'_>) -> Option<usize> {
        let fix = input.fixation();
        let t = &self.thresholds;

        let mut recent_line: Option<usize> = None;
        let mut previous_line: Option<usize> = None;
        let mut min_dist = f32::MAX;
        for prior in input.chain.as_slice()[..input.fixation].iter().rev() {
            let Some(word) = prior.word else {
                continue;
            };
            let recent = *recent_line.get_or_insert(word.line);
            if word.line != recent {
                if recent.checked_sub(word.line) == Some(1) {
                    previous_line = Some(word.line);
                }
                break;
            }
            min_dist = min_dist.min((fix.y - prior.y).abs());
        }
        let recent = recent_line?;
        trace!("new-line check: line #{recent} dist={min_dist:.1}");

        if min_dist < t.current_line_max_dist {
            return Some(recent);
        }
        let previous = previous_line.and_then(|i| self.geometry.line(i))?;
        if min_dist >= t.line_spacing {
            return None;
        }
        if previous.fit(fix.x, fix.y).abs() < t.current_line_max_dist {
            trace!("back to the previous line #{}", previous.index);
            Some(previous.index)
        } else {
            Some(recent)
        }
    }

    fn guess(&self, input: &PredictionInput<'_>) -> Option<usize> {
        let fix = input.fixation();
        let t = &self.thresholds;
        let lines = &self.geometry.lines;
        let current = input.current_line.and_then(|i| lines.get(i));

        let mut best: Option<usize> = None;
        let mut min_diff = f32::MAX;
        let mut min_abs = f32::MAX;
        for line in lines {
            let mut diff = line.fit(fix.x, fix.y);
            if current.is_some_and(|c| c.index == line.index) {
                if diff.abs() < t.current_line_def_dist {
                    return Some(line.index);
                }
                diff *= t.current_line_dist_reduce;
            }
            if diff.abs() < min_abs {
                best = Some(line.index);
                min_abs = diff.abs();
                min_diff = diff;
            }
        }

        let threshold = match current {
            Some(line) if fix.saccade.dx >= line.width() * t.new_line_saccade_length_fraction => {
                t.current_line_max_dist
            }
            _ => t.current_line_def_dist,
        };
        trace!("guess: min_diff={min_diff:.1} threshold={threshold:.1}");
        if min_abs < threshold {
            return best;
        }

        let current = current?;
        let best = best?;
        self.jump(fix, current, best, min_diff, min_abs, threshold)
    }

    fn jump(
        &self,
        fix: &Fixation,
        current: &Line,
        best: usize,
        min_diff: f32,
        min_abs: f32,
        threshold: f32,
    ) -> Option<usize> {
        let t = &self.thresholds;
        let lines = &self.geometry.lines;
        if min_abs > t.guess_max_dist {
            trace!("jump: too far from any line");
            return None;
        }
        let step = (min_diff / t.line_spacing).round() as i64;
        let target = current.index as i64 + step;
        if target < 0 || target >= lines.len() as i64 {
            trace!("jump: supposed line {target} is outside the text");
            return None;
        }
        let supposed = &lines[target as usize];

        if supposed.has_fit() {
            if supposed.fit(fix.x, fix.y).abs() >= min_abs {
                return Some(best);
            }
            return Some(supposed.index);
        }

        if supposed.index == current.index + 1 {
            let (sum, count) = lines
                .iter()
                .filter(|l| l.index != current.index && l.has_fit())
                .fold((0.0f32, 0usize), |(sum, count), l| {
                    let rows = current.index as f32 - l.index as f32;
                    (sum + l.fit(fix.x, fix.y) - rows * t.line_spacing, count + 1)
                });
            if count > 0 {
                let avg_offset = sum / count as f32;
                trace!("jump: average offset over visited lines {avg_offset:.1}");
                if avg_offset < threshold {
                    return Some(current.index);
                }
            }
        }
        trace!("jump to supposed line #{}", supposed.index);
        Some(supposed.index)
    }

    fn closest(&self, input: &PredictionInput<'_>) -> Option<usize> {
        let y = input.fixation().y + input.offset;
        self.geometry
            .lines
            .iter()
            .map(|l| (l.index, (y - l.center[1]).abs()))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
    }
}
