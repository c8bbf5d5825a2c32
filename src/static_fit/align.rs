//! Line assignment of merged sets and per-line horizontal rescaling.

use super::filter::WorkingFixation;
use super::options::StaticFitOptions;
use super::progression::FixationSet;
use crate::geometry::Word;
use log::{debug, trace};
use serde::Serialize;

/// A merged set assigned to a text line.
#[derive(Clone, Debug, PartialEq)]
pub struct LineAssignment {
    pub line: usize,
    pub set: FixationSet,
}

/// Sort sets top to bottom and give them consecutive line indices.
///
/// A vertical gap above `blank_line_gap_factor` line spacings between two
/// sets skips the lines nobody read. Sets past the last line are returned
/// as the second element.
pub fn assign_lines(
    mut sets: Vec<FixationSet>,
    fixations: &[WorkingFixation],
    line_count: usize,
    line_spacing: f32,
    opts: &StaticFitOptions,
) -> (Vec<LineAssignment>, Vec<FixationSet>) {
    sets.sort_by(|a, b| a.mean_y(fixations).total_cmp(&b.mean_y(fixations)));

    let mut assigned = Vec::new();
    let mut unmapped = Vec::new();
    let mut line = 0usize;
    let mut prev_y: Option<f32> = None;
    for set in sets {
        let y = set.mean_y(fixations);
        if let Some(prev) = prev_y {
            line += 1;
            let gap = y - prev;
            if line_spacing > 0.0 && gap > opts.blank_line_gap_factor * line_spacing {
                let skipped = ((gap / line_spacing).round() as usize).saturating_sub(1);
                debug!("gap of {gap:.0}px between sets: skipping {skipped} line(s)");
                line += skipped;
            }
        }
        prev_y = Some(y);
        if line < line_count {
            assigned.push(LineAssignment { line, set });
        } else {
            trace!("set at y={y:.0} falls below the last line");
            unmapped.push(set);
        }
    }
    (assigned, unmapped)
}

/// Linear x correction `left_bound + scale·(x − origin)` for one line.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HorizontalRescale {
    pub origin: f32,
    pub left_bound: f32,
    pub scale: f32,
}

impl HorizontalRescale {
    #[inline]
    pub fn apply(&self, x: f32) -> f32 {
        self.left_bound + self.scale * (x - self.origin)
    }
}

fn expected_fixation_count(word: &Word) -> f32 {
    1.0 + (word.text.chars().count() / 12) as f32
}

/// Where the first fixation on a word is expected to land.
fn left_anchor(word: &Word) -> f32 {
    let part = word.rect.width / expected_fixation_count(word);
    word.rect.left + 0.3 * part
}

/// Where the last fixation on a word is expected to land.
fn right_anchor(word: &Word) -> f32 {
    let count = expected_fixation_count(word);
    let part = word.rect.width / count;
    word.rect.left + (count - 1.0) * part + 0.3 * part
}

/// Rescale for a line whose extreme fixations overshoot its first or last
/// word; `None` when both extremes lie within the text.
pub fn line_rescale(
    set: &FixationSet,
    fixations: &[WorkingFixation],
    words: &[Word],
    opts: &StaticFitOptions,
) -> Option<HorizontalRescale> {
    let first = words.first()?;
    let last = words.last()?;
    let xs = set.items.iter().map(|&i| fixations[i].x);
    let left_x = xs.clone().fold(f32::INFINITY, f32::min);
    let right_x = xs.fold(f32::NEG_INFINITY, f32::max);

    let overshoot_left = left_x < first.rect.left;
    let overshoot_right = right_x > last.rect.right();
    if !overshoot_left && !overshoot_right {
        return None;
    }
    let old_range = right_x - left_x;
    if old_range <= f32::EPSILON {
        return None;
    }

    let mut left_bound = if overshoot_left {
        left_anchor(first)
    } else {
        left_x
    };
    let right_bound = if overshoot_right && last.text.chars().count() > 2 {
        right_anchor(last)
    } else {
        right_x
    };
    let new_range = right_bound - left_bound;
    let mut scale = new_range / old_range;
    let (min_scale, max_scale) = (opts.scale_diff_threshold, 2.0 - opts.scale_diff_threshold);
    if scale < min_scale || scale > max_scale {
        scale = scale.clamp(min_scale, max_scale);
        left_bound -= (scale * old_range - new_range) / 2.0;
    }
    trace!(
        "rescale: observed [{left_x:.0}, {right_x:.0}] -> from {left_bound:.0} scale {scale:.3}"
    );
    Some(HorizontalRescale {
        origin: left_x,
        left_bound,
        scale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WordBox;

    fn working(points: &[(f32, f32)]) -> Vec<WorkingFixation> {
        points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| WorkingFixation {
                x,
                y,
                duration: 200.0,
                members: vec![i],
            })
            .collect()
    }

    fn words(boxes: &[(f32, f32, &str)]) -> Vec<Word> {
        boxes
            .iter()
            .enumerate()
            .map(|(i, &(x, w, text))| Word::from_box(i, 0, i, &WordBox::new(x, 0.0, w, 30.0, text)))
            .collect()
    }

    #[test]
    fn sets_are_ordered_top_to_bottom() {
        let f = working(&[(0.0, 160.0), (50.0, 160.0), (0.0, 100.0), (50.0, 100.0)]);
        let sets = vec![
            FixationSet { items: vec![0, 1] },
            FixationSet { items: vec![2, 3] },
        ];
        let (assigned, unmapped) = assign_lines(sets, &f, 3, 60.0, &StaticFitOptions::default());
        assert!(unmapped.is_empty());
        assert_eq!(assigned[0].line, 0);
        assert_eq!(assigned[0].set.items, vec![2, 3]);
        assert_eq!(assigned[1].line, 1);
    }

    #[test]
    fn blank_gap_skips_unread_line() {
        let f = working(&[(0.0, 100.0), (50.0, 100.0), (0.0, 220.0), (50.0, 220.0)]);
        let sets = vec![
            FixationSet { items: vec![0, 1] },
            FixationSet { items: vec![2, 3] },
        ];
        let (assigned, _) = assign_lines(sets.clone(), &f, 3, 60.0, &StaticFitOptions::default());
        assert_eq!(assigned[1].line, 2);

        let (assigned, unmapped) = assign_lines(sets, &f, 2, 60.0, &StaticFitOptions::default());
        assert_eq!(assigned.len(), 1);
        assert_eq!(unmapped.len(), 1);
    }

    #[test]
    fn fixations_within_text_are_not_rescaled() {
        let w = words(&[(100.0, 100.0, "first"), (300.0, 100.0, "last")]);
        let f = working(&[(150.0, 0.0), (350.0, 0.0)]);
        let set = FixationSet { items: vec![0, 1] };
        assert_eq!(line_rescale(&set, &f, &w, &StaticFitOptions::default()), None);
    }

    #[test]
    fn rescale_is_clamped() {
        let w = words(&[(100.0, 100.0, "abcdef"), (300.0, 100.0, "ghijkl")]);
        let f = working(&[(50.0, 0.0), (150.0, 0.0), (450.0, 0.0)]);
        let set = FixationSet {
            items: vec![0, 1, 2],
        };
        let r = line_rescale(&set, &f, &w, &StaticFitOptions::default()).unwrap();
        // anchors 130 and 330: 200 / 400 clamps to 0.9, centered on the anchors
        assert!((r.scale - 0.9).abs() < 1e-6);
        assert!((r.apply(50.0) - 50.0).abs() < 1e-3);
        assert!((r.apply(450.0) - 410.0).abs() < 1e-3);
    }

    #[test]
    fn left_overshoot_maps_to_first_anchor() {
        let w = words(&[(100.0, 100.0, "abcdef"), (500.0, 100.0, "ghijkl")]);
        let f = working(&[(95.0, 0.0), (590.0, 0.0)]);
        let set = FixationSet { items: vec![0, 1] };
        let r = line_rescale(&set, &f, &w, &StaticFitOptions::default()).unwrap();
        assert!((r.scale - 460.0 / 495.0).abs() < 1e-5);
        assert!((r.apply(95.0) - 130.0).abs() < 1e-3);
        assert!((r.apply(590.0) - 590.0).abs() < 1e-3);
    }
}
