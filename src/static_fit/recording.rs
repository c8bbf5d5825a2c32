//! Recorded session exchanged with the offline fitter.
//!
//! The JSON shape is `{ "words": [...], "fixations": [...] }`. Fitting
//! annotates both arrays in place: fixations receive `line`, `word`,
//! `isRegression` and, when rescaled, `originalX`; words receive the
//! indices of their fixations.

use crate::types::WordBox;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recording {
    #[serde(default)]
    pub words: Vec<RecordedWord>,
    #[serde(default)]
    pub fixations: Vec<RecordedFixation>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedWord {
    #[serde(flatten)]
    pub word: WordBox,
    /// Indices into [`Recording::fixations`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fixations: Vec<usize>,
}

impl From<WordBox> for RecordedWord {
    fn from(word: WordBox) -> Self {
        Self {
            word,
            fixations: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedFixation {
    pub x: f32,
    pub y: f32,
    pub duration: f64,
    #[serde(default)]
    pub timestamp: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word: Option<FixationWord>,
    #[serde(default)]
    pub is_regression: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_x: Option<f32>,
}

impl RecordedFixation {
    pub fn new(x: f32, y: f32, duration: f64, timestamp: f64) -> Self {
        Self {
            x,
            y,
            duration,
            timestamp,
            line: None,
            word: None,
            is_regression: false,
            original_x: None,
        }
    }

    pub fn is_mapped(&self) -> bool {
        self.line.is_some() && self.word.is_some()
    }

    pub(crate) fn clear_annotations(&mut self) {
        if let Some(x) = self.original_x.take() {
            self.x = x;
        }
        self.line = None;
        self.word = None;
        self.is_regression = false;
    }
}

/// Word a fixation was mapped to; `index` is the position within its line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FixationWord {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub index: usize,
    #[serde(default)]
    pub text: String,
}

impl Recording {
    pub fn new(words: Vec<WordBox>, fixations: Vec<RecordedFixation>) -> Self {
        Self {
            words: words.into_iter().map(RecordedWord::from).collect(),
            fixations,
        }
    }

    /// Undo a previous fit so that fitting twice gives the same result.
    pub(crate) fn clear_annotations(&mut self) {
        for fix in &mut self.fixations {
            fix.clear_annotations();
        }
        for word in &mut self.words {
            word.fixations.clear();
        }
    }

    pub fn word_boxes(&self) -> Vec<WordBox> {
        self.words.iter().map(|w| w.word.clone()).collect()
    }
}
