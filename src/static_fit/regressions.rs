//! Post-mapping passes over the recording: regression flags and removal of
//! short visits to another line.

use super::recording::{RecordedFixation, RecordedWord};
use crate::geometry::GeometryModel;
use log::trace;

fn mapped_indices(fixations: &[RecordedFixation]) -> Vec<usize> {
    fixations
        .iter()
        .enumerate()
        .filter(|(_, f)| f.is_mapped())
        .map(|(i, _)| i)
        .collect()
}

fn word_index(fix: &RecordedFixation) -> usize {
    fix.word.as_ref().map_or(0, |w| w.index)
}

/// Flag fixations that move back within their line. Returns the flag count.
///
/// A backward step is not a regression when the next mapped fixation is on
/// another line, or when the previous step itself changed lines.
pub fn label_regressions(fixations: &mut [RecordedFixation]) -> usize {
    let mapped = mapped_indices(fixations);
    let mut count = 0;
    for (k, &i) in mapped.iter().enumerate() {
        let Some(&prev) = k.checked_sub(1).and_then(|p| mapped.get(p)) else {
            fixations[i].is_regression = false;
            continue;
        };
        let fix = &fixations[i];
        let prev_fix = &fixations[prev];
        let mut regression = fix.line == prev_fix.line && word_index(fix) < word_index(prev_fix);
        if regression {
            let next_line = mapped.get(k + 1).map(|&n| fixations[n].line);
            let prev2_line = k
                .checked_sub(2)
                .and_then(|p| mapped.get(p))
                .map(|&p| fixations[p].line);
            if next_line.is_some_and(|l| l != fix.line) {
                regression = false;
            } else if prev2_line.is_some_and(|l| l != prev_fix.line) {
                regression = false;
            }
        }
        fixations[i].is_regression = regression;
        if regression {
            count += 1;
        }
    }
    count
}

/// Strip visits of at most `max_len` mapped fixations to one line that sit
/// between two visits to the same other line. Returns the stripped count.
///
/// A visit is judged against the last visit that was kept, so stripping one
/// visit never exposes the next one as a sandwich of its own.
pub fn remove_cross_line_noise(
    fixations: &mut [RecordedFixation],
    words: &mut [RecordedWord],
    geometry: &GeometryModel,
    max_len: usize,
) -> usize {
    let mut visits: Vec<(Option<usize>, Vec<usize>)> = Vec::new();
    for i in mapped_indices(fixations) {
        let line = fixations[i].line;
        match visits.last_mut() {
            Some((l, members)) if *l == line => members.push(i),
            _ => visits.push((line, vec![i])),
        }
    }

    let mut stripped = 0;
    let mut last_kept = visits.first().and_then(|v| v.0);
    for k in 1..visits.len().saturating_sub(1) {
        let (line, members) = &visits[k];
        let after = visits[k + 1].0;
        if members.len() > max_len || last_kept != after || last_kept == *line {
            last_kept = *line;
            continue;
        }
        for &i in members {
            let fix = &mut fixations[i];
            trace!("strip transition fixation #{i} on line {:?}", fix.line);
            if let (Some(l), Some(w)) = (fix.line, fix.word.as_ref()) {
                let global = geometry
                    .line(l)
                    .and_then(|line| line.words.get(w.index))
                    .map(|w| w.global_index);
                if let Some(word) = global.and_then(|g| words.get_mut(g)) {
                    word.fixations.retain(|&f| f != i);
                }
            }
            fix.line = None;
            fix.word = None;
            fix.is_regression = false;
            stripped += 1;
        }
    }
    stripped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::static_fit::recording::{FixationWord, Recording};
    use crate::types::WordBox;

    fn mapped(line: usize, index: usize) -> RecordedFixation {
        let mut fix = RecordedFixation::new(0.0, 0.0, 200.0, 0.0);
        fix.line = Some(line);
        fix.word = Some(FixationWord {
            left: 0.0,
            top: 0.0,
            right: 0.0,
            bottom: 0.0,
            index,
            text: String::new(),
        });
        fix
    }

    fn flags(fixations: &[RecordedFixation]) -> Vec<bool> {
        fixations.iter().map(|f| f.is_regression).collect()
    }

    #[test]
    fn backward_step_within_line_is_regression() {
        let mut fixes: Vec<_> = [2, 3, 1, 4].iter().map(|&i| mapped(0, i)).collect();
        assert_eq!(label_regressions(&mut fixes), 1);
        assert_eq!(flags(&fixes), vec![false, false, true, false]);
    }

    #[test]
    fn step_before_line_change_is_not_regression() {
        let mut fixes = vec![mapped(0, 2), mapped(0, 3), mapped(0, 1), mapped(1, 0)];
        label_regressions(&mut fixes);
        assert_eq!(flags(&fixes), vec![false; 4]);
    }

    #[test]
    fn step_after_line_change_is_not_regression() {
        let mut fixes = vec![mapped(0, 4), mapped(1, 3), mapped(1, 1), mapped(1, 2)];
        label_regressions(&mut fixes);
        assert_eq!(flags(&fixes), vec![false; 4]);
    }

    #[test]
    fn unmapped_fixations_are_skipped() {
        let mut fixes = vec![
            mapped(0, 3),
            RecordedFixation::new(0.0, 0.0, 200.0, 0.0),
            mapped(0, 1),
            mapped(0, 2),
        ];
        label_regressions(&mut fixes);
        assert_eq!(flags(&fixes), vec![false, false, true, false]);
    }

    #[test]
    fn single_visit_to_other_line_is_stripped() {
        let boxes: Vec<WordBox> = (0..2)
            .flat_map(|row| {
                (0..4).map(move |col| {
                    WordBox::new(col as f32 * 100.0, row as f32 * 60.0, 80.0, 30.0, "word")
                })
            })
            .collect();
        let geometry = GeometryModel::build(&boxes).unwrap();
        let mut rec = Recording::new(
            boxes,
            vec![mapped(0, 0), mapped(0, 1), mapped(1, 2), mapped(0, 3)],
        );
        rec.words[6].fixations.push(2);

        let stripped = remove_cross_line_noise(&mut rec.fixations, &mut rec.words, &geometry, 1);
        assert_eq!(stripped, 1);
        assert!(!rec.fixations[2].is_mapped());
        assert!(rec.words[6].fixations.is_empty());
        assert!(rec.fixations[3].is_mapped());
    }

    #[test]
    fn longer_visit_is_kept() {
        let boxes = vec![
            WordBox::new(0.0, 0.0, 80.0, 30.0, "a"),
            WordBox::new(0.0, 60.0, 80.0, 30.0, "b"),
        ];
        let geometry = GeometryModel::build(&boxes).unwrap();
        let mut rec = Recording::new(
            boxes,
            vec![mapped(0, 0), mapped(1, 0), mapped(1, 0), mapped(0, 0)],
        );
        let stripped = remove_cross_line_noise(&mut rec.fixations, &mut rec.words, &geometry, 1);
        assert_eq!(stripped, 0);
    }

    fn two_line_layout() -> (Vec<WordBox>, GeometryModel) {
        let boxes: Vec<WordBox> = (0..2)
            .flat_map(|row| {
                (0..4).map(move |col| {
                    WordBox::new(col as f32 * 100.0, row as f32 * 60.0, 80.0, 30.0, "word")
                })
            })
            .collect();
        let geometry = GeometryModel::build(&boxes).unwrap();
        (boxes, geometry)
    }

    #[test]
    fn alternating_visits_keep_the_surrounding_line() {
        let (boxes, geometry) = two_line_layout();
        let mut rec = Recording::new(
            boxes,
            vec![mapped(0, 0), mapped(1, 1), mapped(0, 2), mapped(1, 3), mapped(0, 3)],
        );
        rec.words[5].fixations.push(1);
        rec.words[7].fixations.push(3);

        let stripped = remove_cross_line_noise(&mut rec.fixations, &mut rec.words, &geometry, 1);
        assert_eq!(stripped, 2);
        let lines: Vec<_> = rec.fixations.iter().map(|f| f.line).collect();
        assert_eq!(lines, vec![Some(0), None, Some(0), None, Some(0)]);
        assert!(rec.fixations[2].is_mapped());
        assert!(rec.words[5].fixations.is_empty());
        assert!(rec.words[7].fixations.is_empty());
    }

    #[test]
    fn consecutive_noise_visits_to_different_lines() {
        let boxes: Vec<WordBox> = (0..3)
            .flat_map(|row| {
                (0..4).map(move |col| {
                    WordBox::new(col as f32 * 100.0, row as f32 * 60.0, 80.0, 30.0, "word")
                })
            })
            .collect();
        let geometry = GeometryModel::build(&boxes).unwrap();
        let mut rec = Recording::new(
            boxes,
            vec![mapped(0, 0), mapped(1, 1), mapped(2, 1), mapped(0, 2)],
        );
        // neither visit sits between two visits to one line
        let stripped = remove_cross_line_noise(&mut rec.fixations, &mut rec.words, &geometry, 1);
        assert_eq!(stripped, 0);
        assert!(rec.fixations.iter().all(|f| f.is_mapped()));
    }

    #[test]
    fn stripping_clears_regression_flags() {
        let (boxes, geometry) = two_line_layout();
        let mut rec = Recording::new(
            boxes,
            vec![
                mapped(0, 0),
                mapped(1, 2),
                mapped(1, 3),
                mapped(1, 1),
                mapped(1, 2),
                mapped(0, 1),
            ],
        );
        assert_eq!(label_regressions(&mut rec.fixations), 1);
        assert!(rec.fixations[3].is_regression);

        let stripped = remove_cross_line_noise(&mut rec.fixations, &mut rec.words, &geometry, 4);
        assert_eq!(stripped, 4);
        assert_eq!(flags(&rec.fixations), vec![false; 6]);
        assert!(rec.fixations[0].is_mapped());
        assert!(rec.fixations[5].is_mapped());
        assert!(rec.fixations[1..5].iter().all(|f| !f.is_mapped()));
    }
}
