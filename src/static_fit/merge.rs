//! Greedy merging of fixation sets down to the number of text lines.
//!
//! Each pass repeatedly fits a regression line through every eligible pair
//! of sets and joins the pair with the lowest RMS error, provided the error is
//! under the pass threshold and the joined line is not too steep. A pair that
//! fails the slope check is skipped in favour of the next-lowest one. Passes
//! loosen eligibility in order:
//! 1. long sets with long sets;
//! 2. short sets into long sets;
//! 3. single fixations into sets of two or more;
//! 4. only while still over the line count, any two multi-fixation sets with
//!    the forced error bound.
//!
//! The result is best effort: if the count cannot be reached the surplus sets
//! are returned as they are.

use super::filter::WorkingFixation;
use super::options::StaticFitOptions;
use super::progression::FixationSet;
use crate::diagnostics::MergePassReport;
use crate::geometry::regression::{fit_linear_union, LinearModel};
use log::{debug, trace, warn};
use rayon::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SetLength {
    Long,
    Short,
}

impl SetLength {
    fn admits(self, len: usize, long_threshold: usize) -> bool {
        match self {
            SetLength::Long => len >= long_threshold,
            SetLength::Short => len < long_threshold,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct MergePass {
    label: &'static str,
    candidates: SetLength,
    partners: SetLength,
    long_threshold: usize,
    fit_threshold: f32,
    only_if_over: bool,
}

fn passes(opts: &StaticFitOptions) -> [MergePass; 4] {
    let long = opts.long_set_length_threshold;
    [
        MergePass {
            label: "long sets",
            candidates: SetLength::Long,
            partners: SetLength::Long,
            long_threshold: long,
            fit_threshold: opts.fit_threshold,
            only_if_over: false,
        },
        MergePass {
            label: "short into long",
            candidates: SetLength::Short,
            partners: SetLength::Long,
            long_threshold: long,
            fit_threshold: opts.fit_threshold,
            only_if_over: false,
        },
        MergePass {
            label: "singles into sets",
            candidates: SetLength::Short,
            partners: SetLength::Long,
            long_threshold: 2,
            fit_threshold: opts.fit_threshold,
            only_if_over: false,
        },
        MergePass {
            label: "forced",
            candidates: SetLength::Long,
            partners: SetLength::Long,
            long_threshold: 2,
            fit_threshold: opts.forced_fit_threshold.unwrap_or(f32::INFINITY),
            only_if_over: true,
        },
    ]
}

#[derive(Clone, Copy, Debug)]
struct Union {
    first: usize,
    second: usize,
    error: f32,
    slope: f32,
}

fn union_error(model: &LinearModel, a: &[[f32; 2]], b: &[[f32; 2]]) -> f32 {
    let n = a.len() + b.len();
    if n == 0 {
        return 0.0;
    }
    let sum: f32 = a
        .iter()
        .chain(b)
        .map(|p| (p[1] - model.eval(p[0])).powi(2))
        .sum();
    (sum / n as f32).sqrt()
}

/// Eligible unions of `pass`, sorted by ascending error.
fn candidate_unions(
    sets: &[FixationSet],
    fixations: &[WorkingFixation],
    pass: &MergePass,
) -> Vec<Union> {
    let n = sets.len();
    let points: Vec<Vec<[f32; 2]>> = sets.iter().map(|s| s.points(fixations)).collect();
    let symmetric = pass.candidates == pass.partners;
    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| (0..n).map(move |j| (i, j)))
        .filter(|&(i, j)| {
            if i == j || (symmetric && j < i) {
                return false;
            }
            pass.candidates.admits(sets[i].len(), pass.long_threshold)
                && pass.partners.admits(sets[j].len(), pass.long_threshold)
        })
        .collect();

    let mut unions: Vec<Union> = pairs
        .par_iter()
        .filter_map(|&(i, j)| {
            let model = fit_linear_union(&points[i], &points[j])?;
            Some(Union {
                first: i,
                second: j,
                error: union_error(&model, &points[i], &points[j]),
                slope: model.slope,
            })
        })
        .collect();
    unions.sort_by(|a, b| a.error.total_cmp(&b.error));
    unions
}

fn join(sets: &mut Vec<FixationSet>, first: usize, second: usize) {
    let merged = sets[first].union(&sets[second]);
    sets.remove(first.max(second));
    sets.remove(first.min(second));
    sets.push(merged);
}

/// Join the best admissible pair. Returns whether a join happened and how
/// many better pairs were skipped for their slope.
fn merge_two_nearest(
    sets: &mut Vec<FixationSet>,
    fixations: &[WorkingFixation],
    pass: &MergePass,
    max_gradient: f32,
) -> (bool, usize) {
    let mut rejected = 0;
    for union in candidate_unions(sets, fixations, pass) {
        if union.error >= pass.fit_threshold {
            break;
        }
        if union.slope.abs() < max_gradient {
            trace!(
                "join sets {} + {} (error {:.2}, slope {:.3})",
                union.first,
                union.second,
                union.error,
                union.slope
            );
            join(sets, union.first, union.second);
            return (true, rejected);
        }
        rejected += 1;
    }
    (false, rejected)
}

pub fn merge_sets(
    mut sets: Vec<FixationSet>,
    fixations: &[WorkingFixation],
    line_count: usize,
    opts: &StaticFitOptions,
) -> (Vec<FixationSet>, Vec<MergePassReport>) {
    let mut reports = Vec::new();
    for pass in passes(opts) {
        if pass.only_if_over && sets.len() <= line_count {
            continue;
        }
        let sets_before = sets.len();
        let mut merges = 0;
        let mut rejected_by_gradient = 0;
        while sets.len() > line_count {
            let (merged, rejected) =
                merge_two_nearest(&mut sets, fixations, &pass, opts.max_linear_gradient);
            rejected_by_gradient += rejected;
            if !merged {
                break;
            }
            merges += 1;
        }
        debug!(
            "merge pass '{}': {} -> {} sets ({} merges, {} steep unions skipped)",
            pass.label,
            sets_before,
            sets.len(),
            merges,
            rejected_by_gradient
        );
        reports.push(MergePassReport {
            label: pass.label.to_string(),
            sets_before,
            sets_after: sets.len(),
            merges,
            rejected_by_gradient,
        });
    }
    if sets.len() > line_count {
        warn!(
            "fixations form {} line sets, text has {} lines",
            sets.len(),
            line_count
        );
    }
    (sets, reports)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Builder {
        fixations: Vec<WorkingFixation>,
        sets: Vec<FixationSet>,
    }

    impl Builder {
        fn new() -> Self {
            Self {
                fixations: Vec::new(),
                sets: Vec::new(),
            }
        }

        fn set(mut self, points: &[(f32, f32)]) -> Self {
            let mut items = Vec::new();
            for &(x, y) in points {
                items.push(self.fixations.len());
                self.fixations.push(WorkingFixation {
                    x,
                    y,
                    duration: 200.0,
                    members: vec![self.fixations.len()],
                });
            }
            self.sets.push(FixationSet { items });
            self
        }
    }

    #[test]
    fn joins_runs_of_the_same_line() {
        let b = Builder::new()
            .set(&[(0.0, 100.0), (100.0, 101.0), (200.0, 99.0)])
            .set(&[(0.0, 160.0), (100.0, 161.0), (200.0, 160.0)])
            .set(&[(300.0, 100.0), (400.0, 102.0), (500.0, 100.0)]);
        let (sets, reports) = merge_sets(b.sets, &b.fixations, 2, &StaticFitOptions::default());
        assert_eq!(sets.len(), 2);
        assert!(sets.contains(&FixationSet {
            items: vec![0, 1, 2, 6, 7, 8]
        }));
        assert_eq!(reports[0].merges, 1);
        // the forced pass is not needed
        assert_eq!(reports.len(), 3);
    }

    #[test]
    fn steep_union_is_rejected() {
        let b = Builder::new()
            .set(&[(0.0, 0.0), (100.0, 30.0), (200.0, 60.0)])
            .set(&[(300.0, 90.0), (400.0, 120.0), (500.0, 150.0)]);
        let (sets, reports) = merge_sets(b.sets, &b.fixations, 1, &StaticFitOptions::default());
        assert_eq!(sets.len(), 2);
        assert_eq!(reports[0].rejected_by_gradient, 1);
        assert_eq!(reports.last().map(|r| r.label.as_str()), Some("forced"));
    }

    #[test]
    fn forced_pass_respects_its_bound() {
        let lines = [
            [(0.0, 100.0), (100.0, 100.0), (200.0, 100.0)],
            [(0.0, 160.0), (100.0, 160.0), (200.0, 160.0)],
        ];
        let b = Builder::new().set(&lines[0]).set(&lines[1]);
        let (sets, _) = merge_sets(b.sets, &b.fixations, 1, &StaticFitOptions::default());
        assert_eq!(sets.len(), 1);

        let bounded = StaticFitOptions {
            forced_fit_threshold: Some(20.0),
            ..StaticFitOptions::default()
        };
        let b = Builder::new().set(&lines[0]).set(&lines[1]);
        let (sets, _) = merge_sets(b.sets, &b.fixations, 1, &bounded);
        assert_eq!(sets.len(), 2);
    }

    #[test]
    fn single_fixation_joins_a_pair() {
        let b = Builder::new()
            .set(&[(0.0, 100.0), (100.0, 100.0)])
            .set(&[(150.0, 104.0)]);
        let (sets, reports) = merge_sets(b.sets, &b.fixations, 1, &StaticFitOptions::default());
        assert_eq!(sets, vec![FixationSet { items: vec![0, 1, 2] }]);
        assert_eq!(reports[2].merges, 1);
    }
}
