//! Fixations and the time-ordered chain that links them.
//!
//! - [`FixationDetector`] turns raw samples into [`FixationCandidate`]s.
//! - [`FixationChain`] is an arena of [`Fixation`]s; the previous/next
//!   relation is index arithmetic on [`FixationId`]. Each appended fixation
//!   receives the [`Saccade`] from its predecessor.

mod detector;
mod options;

pub use detector::{FixationCandidate, FixationDetector};
pub use options::FixationOptions;

use crate::geometry::WordId;
use crate::zone::Zone;
use serde::Serialize;
use std::fmt;
use std::ops::{Index, IndexMut};

pub type FixationId = usize;

/// Movement from the previous fixation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Saccade {
    pub dx: f32,
    pub dy: f32,
    pub zone: Zone,
    pub new_line: bool,
}

impl Saccade {
    fn between(prev: Option<&Fixation>, x: f32, y: f32) -> Self {
        match prev {
            Some(p) => Saccade {
                dx: x - p.x,
                dy: y - p.y,
                zone: Zone::Neutral,
                new_line: false,
            },
            None => Saccade {
                dx: 0.0,
                dy: 0.0,
                zone: Zone::Neutral,
                new_line: false,
            },
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixation {
    pub id: FixationId,
    pub x: f32,
    pub y: f32,
    pub timestamp: f64,
    pub duration: f64,
    pub saccade: Saccade,
    pub word: Option<WordId>,
    pub line: Option<usize>,
}

impl fmt::Display for Fixation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} ({:.0},{:.0}) {:.0}ms sacc=({:.0},{:.0}) {:?}",
            self.id,
            self.x,
            self.y,
            self.duration,
            self.saccade.dx,
            self.saccade.dy,
            self.saccade.zone
        )
    }
}

#[derive(Clone, Debug, Default)]
pub struct FixationChain {
    fixations: Vec<Fixation>,
}

impl FixationChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fixation, computing its saccade from the last one.
    pub fn push(&mut self, c: FixationCandidate) -> FixationId {
        let id = self.fixations.len();
        let saccade = Saccade::between(self.fixations.last(), c.x, c.y);
        self.fixations.push(Fixation {
            id,
            x: c.x,
            y: c.y,
            timestamp: c.timestamp,
            duration: c.duration,
            saccade,
            word: None,
            line: None,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.fixations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixations.is_empty()
    }

    pub fn get(&self, id: FixationId) -> Option<&Fixation> {
        self.fixations.get(id)
    }

    pub fn last(&self) -> Option<&Fixation> {
        self.fixations.last()
    }

    pub fn previous(&self, id: FixationId) -> Option<&Fixation> {
        id.checked_sub(1).and_then(|p| self.fixations.get(p))
    }

    pub fn next(&self, id: FixationId) -> Option<&Fixation> {
        self.fixations.get(id + 1)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Fixation> {
        self.fixations.iter()
    }

    pub fn as_slice(&self) -> &[Fixation] {
        &self.fixations
    }

    pub fn clear(&mut self) {
        self.fixations.clear();
    }
}

impl Index<FixationId> for FixationChain {
    type Output = Fixation;

    fn index(&self, id: FixationId) -> &Fixation {
        &self.fixations[id]
    }
}

impl IndexMut<FixationId> for FixationChain {
    fn index_mut(&mut self, id: FixationId) -> &mut Fixation {
        &mut self.fixations[id]
    }
}
