//! Saccade zone classification.
//!
//! A saccade is tested against two nested boxes expressed in `em` units of the
//! current geometry. The reading box covers short progressive moves with a
//! small vertical tolerance that grows with horizontal length (`slope`). The
//! neutral box extends further left and allows more vertical drift. Anything
//! outside both boxes is nonreading.

use crate::fixation::Saccade;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Reading,
    Neutral,
    Nonreading,
}

/// Zone box parameters, horizontal and vertical bounds in `em`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneOptions {
    pub progressive_left: f32,
    pub progressive_right: f32,
    /// Left bound of the neutral box; must not exceed `progressive_left`.
    pub neutral_left: f32,
    /// Vertical tolerance gained per pixel of horizontal movement.
    pub slope: f32,
    pub reading_margin_y: f32,
    pub neutral_margin_y: f32,
}

impl Default for ZoneOptions {
    fn default() -> Self {
        Self {
            progressive_left: -1.0,
            progressive_right: 9.0,
            neutral_left: -4.0,
            slope: 0.15,
            reading_margin_y: 1.0,
            neutral_margin_y: 2.0,
        }
    }
}

/// Zone classifier bound to one geometry scale.
#[derive(Clone, Copy, Debug)]
pub struct ZoneClassifier {
    options: ZoneOptions,
    em: f32,
}

impl ZoneClassifier {
    pub fn new(options: ZoneOptions, em: f32) -> Self {
        Self {
            options,
            em: em.max(f32::EPSILON),
        }
    }

    pub fn classify(&self, saccade: &Saccade) -> Zone {
        self.classify_vector(saccade.dx, saccade.dy)
    }

    pub fn classify_vector(&self, dx: f32, dy: f32) -> Zone {
        let o = &self.options;
        let em = self.em;
        let right = o.progressive_right * em;
        if self.in_box(dx, dy, o.progressive_left * em, right, o.reading_margin_y * em) {
            Zone::Reading
        } else if self.in_box(dx, dy, o.neutral_left * em, right, o.neutral_margin_y * em) {
            Zone::Neutral
        } else {
            Zone::Nonreading
        }
    }

    fn in_box(&self, dx: f32, dy: f32, left: f32, right: f32, margin: f32) -> bool {
        let margin = margin + self.options.slope * dx.abs();
        dx >= left && dx <= right && dy.abs() < margin
    }
}
