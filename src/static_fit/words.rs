use crate::geometry::Word;

/// Share of a word's width that stays attractive once it holds a fixation.
const SHRUNK_WIDTH: f32 = 0.7;

/// Nearest-word lookup along one line.
///
/// Words that already received a fixation, and words under three
/// characters, only claim the left 70% of their box, so a second fixation
/// near their right edge prefers the next word.
pub struct LineWordMatcher<'w> {
    words: &'w [Word],
    fixated: Vec<bool>,
}

impl<'w> LineWordMatcher<'w> {
    pub fn new(words: &'w [Word]) -> Self {
        Self {
            words,
            fixated: vec![false; words.len()],
        }
    }

    fn effective_width(&self, index: usize) -> f32 {
        let word = &self.words[index];
        if self.fixated[index] || word.text.chars().count() < 3 {
            SHRUNK_WIDTH * word.rect.width
        } else {
            word.rect.width
        }
    }

    /// Index of the word claimed by `x`; marks it as fixated.
    pub fn nearest(&mut self, x: f32) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, word) in self.words.iter().enumerate() {
            let left = word.rect.left;
            let right = left + self.effective_width(i);
            if x >= left && x < right {
                best = Some((i, 0.0));
                break;
            }
            let dist = (left - x).max(x - right);
            if best.map_or(true, |(_, d)| dist < d) {
                best = Some((i, dist));
            }
        }
        let (index, _) = best?;
        self.fixated[index] = true;
        Some(index)
    }
}
