//! Synthetic text layouts and gaze traces for integration tests.

use reading_mapper::static_fit::RecordedFixation;
use reading_mapper::{Sample, WordBox};

pub const WORD_WIDTH: f32 = 80.0;
pub const WORD_PITCH: f32 = 100.0;
pub const WORD_HEIGHT: f32 = 30.0;

/// `lines × words_per_line` grid of equally sized words.
pub fn grid_layout(lines: usize, words_per_line: usize, line_pitch: f32) -> Vec<WordBox> {
    assert!(lines > 0 && words_per_line > 0, "layout must not be empty");
    let mut words = Vec::with_capacity(lines * words_per_line);
    for row in 0..lines {
        for col in 0..words_per_line {
            words.push(WordBox::new(
                col as f32 * WORD_PITCH,
                row as f32 * line_pitch,
                WORD_WIDTH,
                WORD_HEIGHT,
                format!("word{row}_{col}"),
            ));
        }
    }
    words
}

pub fn center(word: &WordBox) -> (f32, f32) {
    (word.x + 0.5 * word.width, word.y + 0.5 * word.height)
}

/// Deterministic jitter in `[-amplitude, amplitude]`.
pub struct Jitter {
    state: u32,
}

impl Jitter {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn sample(&mut self, amplitude: f32) -> f32 {
        self.state = self.state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        let unit = (self.state >> 8) as f32 / (1u32 << 24) as f32;
        (unit * 2.0 - 1.0) * amplitude
    }
}

/// Gaze samples dwelling on each target for `per_target` samples spaced by
/// `step_ms`, with a one pixel alternating wobble.
pub fn dwell_samples(targets: &[(f32, f32)], per_target: usize, step_ms: f64) -> Vec<Sample> {
    let mut samples = Vec::with_capacity(targets.len() * per_target);
    let mut t = 0.0;
    for &(x, y) in targets {
        for k in 0..per_target {
            let wobble = if k % 2 == 0 { 0.5 } else { -0.5 };
            samples.push(Sample::new(x + wobble, y - wobble, t));
            t += step_ms;
        }
    }
    samples
}

/// Recorded fixations at the given points, 250 ms apart.
pub fn fixations_at(points: &[(f32, f32)], duration: f64) -> Vec<RecordedFixation> {
    points
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| RecordedFixation::new(x, y, duration, i as f64 * 250.0))
        .collect()
}
