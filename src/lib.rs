#![doc = include_str!("../README.md")]

// Public modules
pub mod diagnostics;
pub mod fixation;
pub mod geometry;
pub mod online;
pub mod static_fit;
pub mod statistics;
pub mod types;
pub mod zone;

// Tool support: configuration files and JSON I/O for the binaries.
pub mod config;
pub mod io;

// --- High-level re-exports -------------------------------------------------

// Online mapping.
pub use crate::online::{MappedWord, ReadingMode, ReadingOptions, ReadingSession};

// Offline mapping.
pub use crate::static_fit::{Recording, StaticFitOptions, StaticFitter};
pub use crate::diagnostics::StaticFitReport;

// Shared data.
pub use crate::fixation::{Fixation, FixationChain, FixationId};
pub use crate::geometry::{GeometryModel, Line, Word, WordId};
pub use crate::statistics::WordStatistics;
pub use crate::types::{Rect, Sample, WordBox};
pub use crate::zone::Zone;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```
/// use reading_mapper::prelude::*;
///
/// let layout = vec![WordBox::new(0.0, 0.0, 80.0, 30.0, "hello")];
/// let mut session = ReadingSession::new(ReadingOptions::default());
/// let mapped = session.feed(Sample::new(40.0, 15.0, 0.0), &layout);
/// assert!(mapped.is_none());
/// ```
pub mod prelude {
    pub use crate::{
        MappedWord, ReadingOptions, ReadingSession, Recording, Sample, StaticFitter, WordBox,
    };
}
