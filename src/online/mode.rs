//! Reading-mode hysteresis.

use crate::zone::Zone;
use log::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ReadingMode {
    #[default]
    NonReading,
    Reading,
}

/// Mode transition produced by one zone update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeSwitch {
    None,
    ToReading,
    ToNonReading,
}

/// Two clamped counters driving the reading/nonreading decision.
#[derive(Clone, Debug)]
pub struct ModeMachine {
    mode: ReadingMode,
    score_reading: f32,
    score_non_reading: f32,
    reading_threshold: f32,
    nonreading_threshold: f32,
    forgetting_factor: f32,
}

impl ModeMachine {
    pub fn new(reading_threshold: u32, nonreading_threshold: u32, forgetting_factor: f32) -> Self {
        Self {
            mode: ReadingMode::NonReading,
            score_reading: 0.0,
            score_non_reading: 0.0,
            reading_threshold: reading_threshold as f32,
            nonreading_threshold: nonreading_threshold as f32,
            forgetting_factor,
        }
    }

    pub fn mode(&self) -> ReadingMode {
        self.mode
    }

    pub fn is_reading(&self) -> bool {
        self.mode == ReadingMode::Reading
    }

    pub fn score_reading(&self) -> f32 {
        self.score_reading
    }

    pub fn score_non_reading(&self) -> f32 {
        self.score_non_reading
    }

    pub fn reset(&mut self) {
        self.mode = ReadingMode::NonReading;
        self.score_reading = 0.0;
        self.score_non_reading = 0.0;
    }

    /// Apply a saccade zone and return the resulting transition.
    pub fn update(&mut self, zone: Zone) -> ModeSwitch {
        match zone {
            Zone::Reading => {
                self.score_reading += 1.0;
                self.score_non_reading -= self.forgetting_factor;
            }
            Zone::Neutral => {}
            Zone::Nonreading => {
                self.score_non_reading = self.nonreading_threshold;
                self.score_reading = 0.0;
            }
        }
        self.score_reading = self.score_reading.clamp(0.0, self.reading_threshold);
        self.score_non_reading = self.score_non_reading.clamp(0.0, self.nonreading_threshold);
        trace!(
            "zone {:?}: reading={:.1} nonreading={:.1}",
            zone,
            self.score_reading,
            self.score_non_reading
        );

        match self.mode {
            ReadingMode::NonReading if self.score_reading == self.reading_threshold => {
                self.mode = ReadingMode::Reading;
                ModeSwitch::ToReading
            }
            ReadingMode::Reading if self.score_non_reading == self.nonreading_threshold => {
                self.mode = ReadingMode::NonReading;
                ModeSwitch::ToNonReading
            }
            _ => ModeSwitch::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> ModeMachine {
        ModeMachine::new(3, 2, 0.2)
    }

    #[test]
    fn threshold_reading_saccades_enter_reading() {
        let mut m = machine();
        assert_eq!(m.update(Zone::Reading), ModeSwitch::None);
        assert_eq!(m.update(Zone::Reading), ModeSwitch::None);
        assert!(!m.is_reading());
        assert_eq!(m.update(Zone::Reading), ModeSwitch::ToReading);
        assert!(m.is_reading());
        assert_eq!(m.update(Zone::Reading), ModeSwitch::None);
    }

    #[test]
    fn neutral_zone_keeps_counters() {
        let mut m = machine();
        m.update(Zone::Reading);
        m.update(Zone::Reading);
        assert_eq!(m.update(Zone::Neutral), ModeSwitch::None);
        assert_eq!(m.score_reading(), 2.0);
        assert_eq!(m.update(Zone::Reading), ModeSwitch::ToReading);
    }

    #[test]
    fn nonreading_zone_leaves_reading_at_once() {
        let mut m = machine();
        for _ in 0..3 {
            m.update(Zone::Reading);
        }
        assert_eq!(m.update(Zone::Nonreading), ModeSwitch::ToNonReading);
        assert_eq!(m.score_reading(), 0.0);
        assert_eq!(m.score_non_reading(), 2.0);
    }

    #[test]
    fn forgetting_decays_nonreading_score() {
        let mut m = machine();
        m.update(Zone::Nonreading);
        m.update(Zone::Reading);
        assert!((m.score_non_reading() - 1.8).abs() < 1e-6);
        for _ in 0..20 {
            m.update(Zone::Reading);
        }
        assert_eq!(m.score_non_reading(), 0.0);
        assert_eq!(m.score_reading(), 3.0);
    }
}
