use super::options::FixationOptions;
use crate::types::Sample;
use log::trace;

/// Closed sample group that satisfied the duration threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixationCandidate {
    pub x: f32,
    pub y: f32,
    pub timestamp: f64,
    pub duration: f64,
}

#[derive(Default)]
struct OpenGroup {
    count: usize,
    sum_x: f64,
    sum_y: f64,
    first_ts: f64,
    last_ts: f64,
}

impl OpenGroup {
    fn start(&mut self, s: &Sample) {
        self.count = 1;
        self.sum_x = s.x as f64;
        self.sum_y = s.y as f64;
        self.first_ts = s.timestamp;
        self.last_ts = s.timestamp;
    }

    fn push(&mut self, s: &Sample) {
        self.count += 1;
        self.sum_x += s.x as f64;
        self.sum_y += s.y as f64;
        self.last_ts = s.timestamp;
    }

    fn centroid(&self) -> [f32; 2] {
        let n = self.count.max(1) as f64;
        [(self.sum_x / n) as f32, (self.sum_y / n) as f32]
    }

    fn duration(&self) -> f64 {
        self.last_ts - self.first_ts
    }

    fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn clear(&mut self) {
        self.count = 0;
    }
}

/// Groups consecutive samples into fixations (dispersion threshold).
pub struct FixationDetector {
    options: FixationOptions,
    group: OpenGroup,
}

impl FixationDetector {
    pub fn new(options: FixationOptions) -> Self {
        Self {
            options,
            group: OpenGroup::default(),
        }
    }

    pub fn options(&self) -> &FixationOptions {
        &self.options
    }

    /// Feed one sample; returns the fixation closed by this sample, if any.
    pub fn feed(&mut self, sample: Sample) -> Option<FixationCandidate> {
        if !sample.x.is_finite() || !sample.y.is_finite() {
            return None;
        }
        if self.group.is_empty() {
            self.group.start(&sample);
            return None;
        }
        let [cx, cy] = self.group.centroid();
        let dist = ((sample.x - cx).powi(2) + (sample.y - cy).powi(2)).sqrt();
        if dist <= self.options.max_dispersion_px {
            self.group.push(&sample);
            return None;
        }
        let closed = self.close();
        self.group.start(&sample);
        closed
    }

    /// Close the open group at stream end.
    pub fn flush(&mut self) -> Option<FixationCandidate> {
        let closed = self.close();
        self.group.clear();
        closed
    }

    pub fn reset(&mut self) {
        self.group.clear();
    }

    fn close(&self) -> Option<FixationCandidate> {
        if self.group.is_empty() {
            return None;
        }
        let duration = self.group.duration();
        if duration < self.options.min_duration_ms {
            trace!(
                "fixation group dropped: {} samples, {:.0} ms",
                self.group.count,
                duration
            );
            return None;
        }
        let [x, y] = self.group.centroid();
        Some(FixationCandidate {
            x,
            y,
            timestamp: self.group.first_ts,
            duration,
        })
    }
}
