//! Text geometry: words grouped into lines with a vertical distance model.
//!
//! Words arrive in layout order. A new line starts whenever a word's `y`
//! moves away from the current line's `y`. Each [`Line`] answers "how far
//! above or below me is this point" through [`Line::fit`], using its box
//! center until fixations mapped onto it allow a regression fit.
//!
//! The model also carries two scale units used by the rest of the crate:
//! - `line_spacing`: average distance between adjacent line centers;
//! - `em`: median word height, the character-size unit of the zone classifier.

mod line;
pub mod regression;
mod word;

pub use line::Line;
pub use regression::{fit_linear, LinearModel};
pub use word::{Word, WordId};

use crate::fixation::FixationId;
use crate::types::{Rect, WordBox};
use log::debug;

/// Maximum `y` difference for two consecutive words to share a line.
const SAME_LINE_TOLERANCE_PX: f32 = 0.5;

#[derive(Clone, Debug)]
pub struct GeometryModel {
    pub lines: Vec<Line>,
    pub line_spacing: f32,
    pub em: f32,
    pub bounds: Rect,
}

impl GeometryModel {
    /// Build lines from words in layout order. `None` when there are no words.
    pub fn build(words: &[WordBox]) -> Option<GeometryModel> {
        let first = words.first()?;
        let mut grouped: Vec<Vec<Word>> = Vec::new();
        let mut current_y = first.y;
        for (global_index, b) in words.iter().enumerate() {
            if grouped.is_empty() || (b.y - current_y).abs() > SAME_LINE_TOLERANCE_PX {
                current_y = b.y;
                grouped.push(Vec::new());
            }
            let line_index = grouped.len() - 1;
            let group = grouped.last_mut()?;
            let index = group.len();
            group.push(Word::from_box(global_index, line_index, index, b));
        }

        let lines: Vec<Line> = grouped
            .into_iter()
            .enumerate()
            .map(|(i, ws)| Line::new(i, ws))
            .collect();

        let bounds = lines
            .iter()
            .skip(1)
            .fold(lines[0].bounds, |acc, l| acc.union(&l.bounds));

        let line_spacing = if lines.len() >= 2 {
            let total: f32 = lines
                .windows(2)
                .map(|w| (w[1].center[1] - w[0].center[1]).abs())
                .sum();
            total / (lines.len() - 1) as f32
        } else {
            lines[0].bounds.height
        };

        let mut heights: Vec<f32> = words.iter().map(|w| w.height).collect();
        heights.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let em = heights[heights.len() / 2].max(1.0);

        debug!(
            "GeometryModel::build lines={} words={} line_spacing={:.1} em={:.1}",
            lines.len(),
            words.len(),
            line_spacing,
            em
        );

        Some(GeometryModel {
            lines,
            line_spacing: line_spacing.max(f32::EPSILON),
            em,
            bounds,
        })
    }

    pub fn line(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    pub fn word(&self, id: WordId) -> Option<&Word> {
        self.lines.get(id.line)?.words.get(id.index)
    }

    pub fn word_count(&self) -> usize {
        self.lines.iter().map(|l| l.words.len()).sum()
    }

    /// Attach a fixation to a word's list; returns false for an unknown word.
    pub(crate) fn attach_fixation(&mut self, id: WordId, fixation: FixationId) -> bool {
        match self
            .lines
            .get_mut(id.line)
            .and_then(|l| l.words.get_mut(id.index))
        {
            Some(word) => {
                if !word.fixations.contains(&fixation) {
                    word.fixations.push(fixation);
                }
                true
            }
            None => false,
        }
    }

    pub(crate) fn detach_fixation(&mut self, id: WordId, fixation: FixationId) {
        if let Some(word) = self
            .lines
            .get_mut(id.line)
            .and_then(|l| l.words.get_mut(id.index))
        {
            word.fixations.retain(|&f| f != fixation);
        }
    }

    /// Drop per-session state (regression points and word fixation lists).
    pub fn clear_fixations(&mut self) {
        for line in &mut self.lines {
            line.clear_fit();
            for word in &mut line.words {
                word.fixations.clear();
            }
        }
    }
}
