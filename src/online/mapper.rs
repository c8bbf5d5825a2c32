//! Fixation → word mapping on a predicted line, plus single-outlier repair.

use crate::fixation::{FixationChain, FixationId};
use crate::geometry::{GeometryModel, WordId};
use log::trace;

/// Map `fixation` to the nearest word of `line` by horizontal distance.
///
/// With `record_fit` the fixation also feeds the line's regression.
pub fn map_to_word(
    geometry: &mut GeometryModel,
    chain: &mut FixationChain,
    fixation: FixationId,
    line: usize,
    record_fit: bool,
) -> Option<WordId> {
    let (x, y) = (chain.get(fixation)?.x, chain.get(fixation)?.y);
    let target = geometry.lines.get_mut(line)?;
    if record_fit {
        target.add_fixation(x, y);
    }
    let (index, dist) = target.nearest_word(x)?;
    let id = WordId { line, index };

    if let Some(old) = chain[fixation].word {
        if old != id {
            geometry.detach_fixation(old, fixation);
        }
    }
    geometry.attach_fixation(id, fixation);
    chain[fixation].word = Some(id);
    chain[fixation].line = Some(line);
    trace!("map #{fixation} -> {line},{index} [d={dist:.0}]");
    Some(id)
}

/// Look back over the last three fixations for `[on, off, on]` relative to
/// `line`; returns the middle fixation when the pattern matches.
pub fn search_outlier(
    chain: &FixationChain,
    fixation: FixationId,
    line: usize,
) -> Option<FixationId> {
    const PATTERN: [bool; 3] = [true, false, true];
    let mut candidate = None;
    let mut matched = 0;
    for (step, expected) in PATTERN.iter().enumerate() {
        let Some(id) = fixation.checked_sub(step) else {
            break;
        };
        let Some(word) = chain.get(id).and_then(|f| f.word) else {
            break;
        };
        if (word.line == line) == *expected {
            matched += 1;
        }
        if step == 1 {
            candidate = Some(id);
        }
    }
    if matched == PATTERN.len() {
        candidate
    } else {
        None
    }
}

/// Map `fixation` and repair a single off-line fixation just before it.
pub fn map_with_outlier_correction(
    geometry: &mut GeometryModel,
    chain: &mut FixationChain,
    fixation: FixationId,
    line: usize,
) -> Option<WordId> {
    let mapped = map_to_word(geometry, chain, fixation, line, true)?;
    if let Some(outlier) = search_outlier(chain, fixation, line) {
        trace!("outlier fixation #{outlier} is backtracked: line #{line}");
        map_to_word(geometry, chain, outlier, line, false);
    }
    Some(mapped)
}
