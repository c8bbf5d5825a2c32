//! Serializable reports of a static fit run.
//!
//! `StaticFitReport` is returned by [`StaticFitter::map`](crate::StaticFitter)
//! and records per-stage counts, the outcome of every merge pass, the lines
//! that were rescaled horizontally and the stage timings.

pub mod static_fit;
pub mod timing;

pub use static_fit::{LineRescale, MergePassReport, StaticFitReport};
pub use timing::{elapsed_ms, StageTiming, TimingBreakdown};
