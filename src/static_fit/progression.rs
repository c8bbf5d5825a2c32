//! Progressive runs: maximal sequences of short rightward saccades.

use super::filter::WorkingFixation;
use super::options::StaticFitOptions;

/// Group of working fixations believed to lie on one text line.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FixationSet {
    /// Indices into the working fixations, ascending.
    pub items: Vec<usize>,
}

impl FixationSet {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn points(&self, fixations: &[WorkingFixation]) -> Vec<[f32; 2]> {
        self.items
            .iter()
            .map(|&i| [fixations[i].x, fixations[i].y])
            .collect()
    }

    pub fn mean_y(&self, fixations: &[WorkingFixation]) -> f32 {
        if self.items.is_empty() {
            return 0.0;
        }
        let sum: f32 = self.items.iter().map(|&i| fixations[i].y).sum();
        sum / self.items.len() as f32
    }

    /// Union of two sets, kept in temporal order.
    pub fn union(&self, other: &FixationSet) -> FixationSet {
        let mut items: Vec<usize> = self.items.iter().chain(&other.items).copied().collect();
        items.sort_unstable();
        FixationSet { items }
    }
}

fn is_progressive(dx: f32, dy: f32, opts: &StaticFitOptions) -> bool {
    dx > 0.0 && dx < opts.skimming_threshold_x && dy.abs() < opts.skimming_threshold_y
}

pub fn split_to_progressions(
    fixations: &[WorkingFixation],
    opts: &StaticFitOptions,
) -> Vec<FixationSet> {
    let mut sets: Vec<FixationSet> = Vec::new();
    for (i, fix) in fixations.iter().enumerate() {
        let continues = i > 0 && {
            let prev = &fixations[i - 1];
            is_progressive(fix.x - prev.x, fix.y - prev.y, opts)
        };
        match sets.last_mut() {
            Some(set) if continues => set.items.push(i),
            _ => sets.push(FixationSet { items: vec![i] }),
        }
    }
    sets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixes(points: &[(f32, f32)]) -> Vec<WorkingFixation> {
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

    #[test]
    fn return_sweep_and_regression_start_new_runs() {
        let f = fixes(&[
            (10.0, 100.0),
            (90.0, 102.0),
            (170.0, 98.0),
            (60.0, 101.0),
            (140.0, 100.0),
            (20.0, 150.0),
            (100.0, 152.0),
        ]);
        let sets = split_to_progressions(&f, &StaticFitOptions::default());
        let items: Vec<_> = sets.iter().map(|s| s.items.clone()).collect();
        assert_eq!(items, vec![vec![0, 1, 2], vec![3, 4], vec![5, 6]]);
    }

    #[test]
    fn long_jump_or_vertical_drift_breaks_run() {
        let f = fixes(&[(0.0, 0.0), (600.0, 0.0), (650.0, 50.0)]);
        let sets = split_to_progressions(&f, &StaticFitOptions::default());
        assert_eq!(sets.len(), 3);
    }
}
