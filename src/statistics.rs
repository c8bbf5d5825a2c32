//! Per-word focus statistics of an online session.
//!
//! Feed the focused word after every sample (or `None` when nothing is
//! focused). Each change of focus closes the running interval of the previous
//! word and opens one for the new word, so a word accumulates both the time
//! it was focused and how many separate times it gained focus.

use crate::geometry::Word;
use crate::types::Rect;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordRecord {
    pub text: String,
    pub rect: Rect,
    pub duration_ms: f64,
    pub focus_count: u32,
    #[serde(skip)]
    started_at: f64,
}

impl WordRecord {
    fn start(&mut self, timestamp: f64) {
        self.started_at = timestamp;
        self.focus_count += 1;
    }

    fn stop(&mut self, timestamp: f64) {
        self.duration_ms += (timestamp - self.started_at).max(0.0);
    }

    fn to_tsv_row(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.text,
            self.duration_ms.round() as i64,
            self.focus_count,
            self.rect.left.round() as i64,
            self.rect.top.round() as i64,
            self.rect.width.round() as i64,
            self.rect.height.round() as i64
        )
    }
}

#[derive(Clone, Debug, Default)]
pub struct WordStatistics {
    records: Vec<WordRecord>,
    /// Global word index -> position in `records`.
    by_word: HashMap<usize, usize>,
    /// Global index of the focused word.
    current: Option<usize>,
}

impl WordStatistics {
    pub const TSV_HEADER: &'static str = "text\tdur\tfocus\tx\ty\tw\th";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.by_word.clear();
        self.current = None;
    }

    /// Report the word focused at `timestamp` (ms).
    pub fn set_focused_word(&mut self, word: Option<&Word>, timestamp: f64) {
        let key = word.map(|w| w.global_index);
        if key == self.current {
            return;
        }
        self.finish(timestamp);
        if let Some(word) = word {
            let next = self.records.len();
            let r = *self.by_word.entry(word.global_index).or_insert(next);
            if r == next {
                self.records.push(WordRecord {
                    text: word.text.clone(),
                    rect: word.rect,
                    duration_ms: 0.0,
                    focus_count: 0,
                    started_at: timestamp,
                });
            }
            self.records[r].start(timestamp);
            self.current = key;
        }
    }

    /// Close the running focus interval.
    pub fn finish(&mut self, timestamp: f64) {
        let running = self.current.take().and_then(|k| self.by_word.get(&k).copied());
        if let Some(r) = running {
            self.records[r].stop(timestamp);
        }
    }

    /// Records in order of first focus.
    pub fn records(&self) -> &[WordRecord] {
        &self.records
    }

    pub fn to_tsv(&self) -> String {
        let mut out = String::from(Self::TSV_HEADER);
        out.push('\n');
        for record in &self.records {
            out.push_str(&record.to_tsv_row());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WordBox;

    fn word(global_index: usize, text: &str) -> Word {
        let b = WordBox::new(global_index as f32 * 100.0, 10.0, 80.4, 29.6, text);
        Word::from_box(global_index, 0, global_index, &b)
    }

    #[test]
    fn accumulates_duration_and_focus_count() {
        let (a, b) = (word(0, "alpha"), word(1, "beta"));
        let mut stats = WordStatistics::new();
        stats.set_focused_word(Some(&a), 0.0);
        stats.set_focused_word(Some(&a), 100.0);
        stats.set_focused_word(Some(&b), 250.0);
        stats.set_focused_word(None, 400.0);
        stats.set_focused_word(Some(&a), 500.0);
        stats.finish(620.0);

        let records = stats.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text, "alpha");
        assert_eq!(records[0].duration_ms, 370.0);
        assert_eq!(records[0].focus_count, 2);
        assert_eq!(records[1].duration_ms, 150.0);
        assert_eq!(records[1].focus_count, 1);
    }

    #[test]
    fn tsv_has_header_and_rounded_rows() {
        let mut stats = WordStatistics::new();
        stats.set_focused_word(Some(&word(1, "beta")), 0.0);
        stats.finish(149.6);
        let tsv = stats.to_tsv();
        let lines: Vec<&str> = tsv.lines().collect();
        assert_eq!(lines[0], "text\tdur\tfocus\tx\ty\tw\th");
        assert_eq!(lines[1], "beta\t150\t1\t100\t10\t80\t30");
    }
}
