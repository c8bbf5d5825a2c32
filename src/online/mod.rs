//! Online reading mapper.
//!
//! [`ReadingSession`] owns everything a live session mutates: the cached word
//! layout and its geometry, the fixation detector, the fixation chain, the
//! reading-mode machine, the tracked line and the vertical offset between
//! the gaze and the text. Each sample goes through:
//! 1. fixation detection (most samples stop here);
//! 2. zone classification of the new saccade and a mode update;
//! 3. in reading mode, line prediction and word mapping for the new fixation,
//!    or for the whole reading run when the mode has just switched.

pub mod mapper;
pub mod mode;
pub mod options;
pub mod predictor;

pub use mode::{ModeMachine, ModeSwitch, ReadingMode};
pub use options::{LinePredictorFactors, PredictorThresholds, ReadingOptions};
pub use predictor::{LinePredictor, PredictionInput};

use crate::fixation::{Fixation, FixationCandidate, FixationChain, FixationDetector, FixationId};
use crate::geometry::{GeometryModel, Word, WordId};
use crate::types::{Rect, Sample, WordBox};
use crate::zone::{Zone, ZoneClassifier};
use log::{debug, trace};
use serde::Serialize;

/// Word focused after a fixation, with the fixation that produced it.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappedWord {
    /// Index in the layout passed to [`ReadingSession::feed`].
    pub word_index: usize,
    pub line: usize,
    pub index_in_line: usize,
    pub text: String,
    pub rect: Rect,
    pub fixation: Fixation,
}

/// Geometry plus the classifiers scaled to it.
struct SessionGeometry {
    model: GeometryModel,
    zones: ZoneClassifier,
    thresholds: PredictorThresholds,
}

impl SessionGeometry {
    fn build(words: &[WordBox], options: &ReadingOptions) -> Option<Self> {
        let model = GeometryModel::build(words)?;
        let zones = ZoneClassifier::new(options.zone, model.em);
        let thresholds = options.line_predictor.resolve(model.line_spacing);
        debug!(
            "session geometry: lines={} spacing={:.1} em={:.1} def_dist={:.1} max_dist={:.1}",
            model.lines.len(),
            model.line_spacing,
            model.em,
            thresholds.current_line_def_dist,
            thresholds.current_line_max_dist
        );
        Some(Self {
            model,
            zones,
            thresholds,
        })
    }
}

/// Live mapping state for one displayed text.
///
/// The fixation chain keeps every fixation of the session and is only
/// cleared by [`reset`](Self::reset) or a layout change, so call `reset`
/// when a new text is shown or a long session moves on.
pub struct ReadingSession {
    options: ReadingOptions,
    layout: Vec<WordBox>,
    geometry: Option<SessionGeometry>,
    detector: FixationDetector,
    chain: FixationChain,
    modes: ModeMachine,
    current_line: Option<usize>,
    offset: f32,
    last_mapped: Option<WordId>,
}

impl ReadingSession {
    pub fn new(options: ReadingOptions) -> Self {
        let detector = FixationDetector::new(options.fixation);
        let modes = ModeMachine::new(
            options.reading_threshold,
            options.nonreading_threshold,
            options.forgetting_factor,
        );
        Self {
            options,
            layout: Vec::new(),
            geometry: None,
            detector,
            chain: FixationChain::new(),
            modes,
            current_line: None,
            offset: 0.0,
            last_mapped: None,
        }
    }

    pub fn options(&self) -> &ReadingOptions {
        &self.options
    }

    /// Feed one gaze sample against the displayed layout.
    ///
    /// A layout that differs from the cached one resets the session first.
    /// Returns the focused word when this sample closed a fixation that was
    /// mapped in reading mode.
    pub fn feed(&mut self, sample: Sample, layout: &[WordBox]) -> Option<MappedWord> {
        if layout != self.layout.as_slice() {
            debug!("layout changed ({} words), resetting session", layout.len());
            self.reset(layout);
        }
        let candidate = self.detector.feed(sample)?;
        self.feed_fixation(candidate)
    }

    /// Close the open sample group at stream end and process it.
    pub fn flush(&mut self) -> Option<MappedWord> {
        let candidate = self.detector.flush()?;
        self.feed_fixation(candidate)
    }

    /// Process a fixation produced outside the session's own detector.
    pub fn feed_fixation(&mut self, candidate: FixationCandidate) -> Option<MappedWord> {
        let id = self.chain.push(candidate);
        let geometry = self.geometry.as_ref()?;

        let saccade = self.chain[id].saccade;
        let zone = if id == 0 {
            Zone::Neutral
        } else if self.modes.score_reading() == 0.0 && saccade.dx < 0.0 {
            Zone::Nonreading
        } else {
            geometry.zones.classify(&saccade)
        };
        self.chain[id].saccade.zone = zone;
        trace!("{}", self.chain[id]);

        let switch = self.modes.update(zone);
        if switch != ModeSwitch::None {
            debug!("fixation #{id}: {switch:?}");
        }
        if !self.modes.is_reading() {
            self.last_mapped = None;
            return None;
        }

        let switched = switch == ModeSwitch::ToReading;
        let start = if switched {
            self.first_reading_fixation(id).unwrap_or(id)
        } else {
            id
        };
        let mut mapped = None;
        for fix in start..=id {
            mapped = self.map_fixation(fix, switched && fix == start);
        }
        self.last_mapped = mapped;
        self.mapped_word(mapped?, id)
    }

    /// Clear all session state and adopt `layout`.
    pub fn reset(&mut self, layout: &[WordBox]) {
        if layout == self.layout.as_slice() {
            if let Some(geometry) = self.geometry.as_mut() {
                geometry.model.clear_fixations();
            }
        } else {
            self.layout = layout.to_vec();
            self.geometry = SessionGeometry::build(layout, &self.options);
        }
        self.detector.reset();
        self.chain.clear();
        self.modes.reset();
        self.current_line = None;
        self.offset = 0.0;
        self.last_mapped = None;
    }

    pub fn current_word(&self) -> Option<&Word> {
        let id = self.last_mapped?;
        self.geometry.as_ref()?.model.word(id)
    }

    pub fn chain(&self) -> &FixationChain {
        &self.chain
    }

    pub fn geometry(&self) -> Option<&GeometryModel> {
        self.geometry.as_ref().map(|g| &g.model)
    }

    pub fn mode(&self) -> ReadingMode {
        self.modes.mode()
    }

    pub fn current_line(&self) -> Option<usize> {
        self.current_line
    }

    /// Earliest fixation of the reading run that ends at `current`.
    ///
    /// Walks back until a fixation that started a new line, the landing point
    /// of a nonreading saccade, or a non-reading zone right after a neutral one.
    fn first_reading_fixation(&self, current: FixationId) -> Option<FixationId> {
        let mut result = None;
        let mut reading_zone = true;
        let mut cursor = current.checked_sub(1);
        while let Some(i) = cursor {
            let saccade = &self.chain[i].saccade;
            if saccade.new_line {
                break;
            }
            if saccade.zone == Zone::Nonreading {
                result = Some(if reading_zone { i } else { i + 1 });
                break;
            }
            if !reading_zone && saccade.zone != Zone::Reading {
                result = Some(i + 1);
                break;
            }
            result = Some(i);
            reading_zone = saccade.zone == Zone::Reading;
            cursor = i.checked_sub(1);
        }
        trace!("reading run of #{current} starts at {result:?}");
        result
    }

    fn map_fixation(&mut self, fix: FixationId, switched: bool) -> Option<WordId> {
        let geometry = self.geometry.as_mut()?;
        let input = PredictionInput {
            chain: &self.chain,
            fixation: fix,
            current_line: self.current_line,
            offset: self.offset,
        };
        let line = LinePredictor::new(&geometry.model, geometry.thresholds).predict(&input)?;

        if self.current_line != Some(line) {
            self.chain[fix].saccade.new_line = true;
        }
        self.current_line = Some(line);

        if switched || self.chain[fix].saccade.zone == Zone::Reading {
            self.offset = geometry.model.lines[line].center[1] - self.chain[fix].y;
            trace!("offset {:.1}", self.offset);
        }
        mapper::map_with_outlier_correction(&mut geometry.model, &mut self.chain, fix, line)
    }

    fn mapped_word(&self, id: WordId, fixation: FixationId) -> Option<MappedWord> {
        let word = self.geometry.as_ref()?.model.word(id)?;
        Some(MappedWord {
            word_index: word.global_index,
            line: word.line,
            index_in_line: word.index,
            text: word.text.clone(),
            rect: word.rect,
            fixation: self.chain.get(fixation)?.clone(),
        })
    }
}

impl Default for ReadingSession {
    fn default() -> Self {
        Self::new(ReadingOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> Vec<WordBox> {
        let mut words = Vec::new();
        for row in 0..3 {
            for col in 0..5 {
                words.push(WordBox::new(
                    col as f32 * 100.0,
                    row as f32 * 60.0,
                    80.0,
                    30.0,
                    format!("w{row}{col}"),
                ));
            }
        }
        words
    }

    fn fixation(x: f32, y: f32, t: f64) -> FixationCandidate {
        FixationCandidate {
            x,
            y,
            timestamp: t,
            duration: 220.0,
        }
    }

    fn session() -> ReadingSession {
        let mut s = ReadingSession::default();
        s.reset(&layout());
        s
    }

    #[test]
    fn reading_starts_exactly_at_threshold() {
        let mut s = session();
        // first fixation carries no saccade, the next two are reading saccades
        for k in 0..3 {
            let out = s.feed_fixation(fixation(40.0 + 100.0 * k as f32, 15.0, k as f64 * 250.0));
            assert!(out.is_none());
            assert_eq!(s.mode(), ReadingMode::NonReading);
        }
        let out = s.feed_fixation(fixation(340.0, 15.0, 750.0)).unwrap();
        assert_eq!(s.mode(), ReadingMode::Reading);
        assert_eq!((out.line, out.index_in_line), (0, 3));
        assert_eq!(out.text, "w03");
        assert_eq!(out.fixation.id, 3);
    }

    #[test]
    fn switch_to_reading_maps_the_whole_run() {
        let mut s = session();
        for k in 0..4 {
            s.feed_fixation(fixation(40.0 + 100.0 * k as f32, 15.0, k as f64 * 250.0));
        }
        let geom = s.geometry().unwrap();
        for k in 0..4 {
            assert_eq!(geom.lines[0].words[k].fixations, vec![k]);
        }
        assert_eq!(s.current_word().map(|w| w.index), Some(3));
        assert!(s.chain()[0].saccade.new_line);
        assert!(!s.chain()[1].saccade.new_line);
    }

    #[test]
    fn nonreading_saccade_stops_mapping() {
        let mut s = session();
        for k in 0..4 {
            s.feed_fixation(fixation(40.0 + 100.0 * k as f32, 15.0, k as f64 * 250.0));
        }
        assert!(s.current_word().is_some());
        let out = s.feed_fixation(fixation(-300.0, 400.0, 1000.0));
        assert!(out.is_none());
        assert_eq!(s.mode(), ReadingMode::NonReading);
        assert!(s.current_word().is_none());
        assert_eq!(s.chain()[4].saccade.zone, Zone::Nonreading);
    }

    #[test]
    fn regression_before_any_reading_is_nonreading() {
        let mut s = session();
        s.feed_fixation(fixation(240.0, 15.0, 0.0));
        s.feed_fixation(fixation(220.0, 15.0, 250.0));
        assert_eq!(s.chain()[1].saccade.zone, Zone::Nonreading);
    }

    #[test]
    fn layout_change_resets_session() {
        let mut s = session();
        let words = layout();
        for k in 0..4 {
            s.feed_fixation(fixation(40.0 + 100.0 * k as f32, 15.0, k as f64 * 250.0));
        }
        assert_eq!(s.chain().len(), 4);

        let mut moved = words.clone();
        moved.truncate(10);
        s.feed(Sample::new(40.0, 15.0, 2000.0), &moved);
        assert!(s.chain().is_empty());
        assert_eq!(s.mode(), ReadingMode::NonReading);
        assert_eq!(s.geometry().map(|g| g.lines.len()), Some(2));
    }

    #[test]
    fn reset_with_same_layout_clears_fixation_state() {
        let mut s = session();
        for k in 0..4 {
            s.feed_fixation(fixation(40.0 + 100.0 * k as f32, 15.0, k as f64 * 250.0));
        }
        assert!(s.geometry().unwrap().lines[0].has_fit());

        s.reset(&layout());
        assert!(s.chain().is_empty());
        assert!(s.current_word().is_none());
        assert_eq!(s.current_line(), None);
        let geom = s.geometry().unwrap();
        assert_eq!(geom.lines.len(), 3);
        assert!(!geom.lines[0].has_fit());
        assert!(geom.lines[0].words.iter().all(|w| w.fixations.is_empty()));
    }

    #[test]
    fn samples_without_layout_produce_nothing() {
        let mut s = ReadingSession::default();
        for k in 0..20 {
            let x = if k < 10 { 40.0 } else { 140.0 };
            assert!(s.feed(Sample::new(x, 15.0, k as f64 * 25.0), &[]).is_none());
        }
        assert!(s.geometry().is_none());
        assert_eq!(s.chain().len(), 1);
    }
}
