//! # Playtrace Diagnostics
//!
//! Analysis and export tools for recorded playback histories.
//! Provides stall, resolution and buffer analysis, CSV/JSON export, and
//! structured logging setup.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod debug_logger;
pub mod error;
pub mod export;
pub mod playback_analyzer;

// Re-export main types
pub use debug_logger::{DebugLogger, DEFAULT_LOG_FILTER};
pub use error::{DiagnosticsError, DiagnosticsResult};
pub use export::{export_to_file, write_csv, write_json, ExportFormat, CSV_HEADER};
pub use playback_analyzer::{
    AnalysisConfig, BufferReset, PlaybackAnalyzer, PlaybackReport, ResolutionSwitch, StallEvent,
};
