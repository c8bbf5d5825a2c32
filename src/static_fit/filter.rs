//! Noise filtering ahead of line fitting.
//!
//! - `filter_in_box`: keep fixations inside the text box grown by the margins.
//! - `merge_short`: fold short fixations into their closer temporal neighbour,
//!   duration-weighted, until nothing changes.

use super::options::StaticFitOptions;
use super::recording::RecordedFixation;
use crate::types::Rect;
use log::trace;

/// Fixation used by the fitter; may stand for several recorded ones.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkingFixation {
    pub x: f32,
    pub y: f32,
    pub duration: f64,
    /// Indices into the recording, ascending.
    pub members: Vec<usize>,
}

impl WorkingFixation {
    fn distance(&self, other: &WorkingFixation) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    fn absorb(&mut self, other: WorkingFixation) {
        let total = self.duration + other.duration;
        let (wa, wb) = if total > 0.0 {
            (self.duration / total, other.duration / total)
        } else {
            (0.5, 0.5)
        };
        self.x = (self.x as f64 * wa + other.x as f64 * wb) as f32;
        self.y = (self.y as f64 * wa + other.y as f64 * wb) as f32;
        self.duration = total;
        self.members.extend(other.members);
        self.members.sort_unstable();
    }
}

pub fn filter_in_box(
    fixations: &[RecordedFixation],
    text_box: &Rect,
    opts: &StaticFitOptions,
) -> Vec<WorkingFixation> {
    fixations
        .iter()
        .enumerate()
        .filter(|(_, f)| {
            f.x > text_box.left - opts.margin_x
                && f.x < text_box.right() + opts.margin_x
                && f.y > text_box.top - opts.margin_y
                && f.y < text_box.bottom() + opts.margin_y
        })
        .map(|(i, f)| WorkingFixation {
            x: f.x,
            y: f.y,
            duration: f.duration,
            members: vec![i],
        })
        .collect()
}

/// Returns the number of merges performed.
pub fn merge_short(fixations: &mut Vec<WorkingFixation>, opts: &StaticFitOptions) -> usize {
    let mut merges = 0;
    while let Some((short, target)) = find_merge(fixations, opts) {
        let removed = fixations.remove(short);
        let target = if target > short { target - 1 } else { target };
        trace!(
            "merge short fixation ({:.0},{:.0}) {:.0}ms into #{target}",
            removed.x,
            removed.y,
            removed.duration
        );
        fixations[target].absorb(removed);
        merges += 1;
    }
    merges
}

fn find_merge(fixations: &[WorkingFixation], opts: &StaticFitOptions) -> Option<(usize, usize)> {
    fixations.iter().enumerate().find_map(|(i, fix)| {
        if fix.duration >= opts.min_duration {
            return None;
        }
        let prev = i.checked_sub(1).map(|p| (p, fix.distance(&fixations[p])));
        let next = fixations.get(i + 1).map(|n| (i + 1, fix.distance(n)));
        let closer = match (prev, next) {
            (Some(p), Some(n)) => {
                if n.1 < p.1 {
                    n
                } else {
                    p
                }
            }
            (Some(p), None) => p,
            (None, Some(n)) => n,
            (None, None) => return None,
        };
        (closer.1 < opts.max_dist).then_some((i, closer.0))
    })
}
