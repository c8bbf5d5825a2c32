use crate::fixation::FixationId;
use crate::types::{Rect, WordBox};
use serde::Serialize;

/// Location of a word inside a [`GeometryModel`](super::GeometryModel).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct WordId {
    pub line: usize,
    pub index: usize,
}

/// A laid-out word and the fixations mapped onto it.
#[derive(Clone, Debug)]
pub struct Word {
    /// Position in the original layout order.
    pub global_index: usize,
    pub line: usize,
    pub index: usize,
    pub rect: Rect,
    pub text: String,
    pub fixations: Vec<FixationId>,
}

impl Word {
    pub(crate) fn from_box(global_index: usize, line: usize, index: usize, b: &WordBox) -> Self {
        Self {
            global_index,
            line,
            index,
            rect: b.rect(),
            text: b.text.clone(),
            fixations: Vec::new(),
        }
    }

    pub fn id(&self) -> WordId {
        WordId {
            line: self.line,
            index: self.index,
        }
    }
}
