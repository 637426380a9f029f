//! Event type definitions for progress reporting.

use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the duplicate scanner
#[derive(Debug, Clone)]
pub enum Event {
    /// A pair of images was compared
    Comparison(ComparisonEvent),
    /// The scan finished (normally or cancelled)
    Summary(SummaryEvent),
    /// A human-readable log line
    Log { level: LogLevel, message: String },
}

/// Severity of a log line sent through the event sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// One reference/candidate comparison
///
/// Emitted for every pair, duplicate or not.
#[derive(Debug, Clone)]
pub struct ComparisonEvent {
    /// The reference file (outer cursor)
    pub reference: PathBuf,
    /// The candidate file (inner cursor)
    pub candidate: PathBuf,
    /// Index of the reference in the working list at comparison time
    pub reference_index: usize,
    /// Index of the candidate in the working list at comparison time
    pub candidate_index: usize,
    /// Number of differing fingerprint bits
    pub distance: u32,
    /// Largest distance still classified as a duplicate
    pub max_distance: f64,
    /// Whether this pair was classified as a duplicate
    pub is_duplicate: bool,
    /// Duplicates found so far, this pair included
    pub duplicate_count: usize,
    /// Originals on top, fingerprint previews below, count drawn on top
    pub frame: RgbImage,
}

/// Final counters of a scan run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryEvent {
    /// Files listed in the source folder when the scan started
    pub total_files: usize,
    /// Pairs actually compared
    pub comparisons: usize,
    /// Pairs classified as duplicates
    pub duplicate_count: usize,
    /// Duplicates relocated to the destination folder
    pub moved_count: usize,
    /// Confirmed moves that failed and were kept instead
    pub move_failures: usize,
    /// Unreadable files dropped from the scan
    pub skipped_files: usize,
    /// Files left in the working list at the end
    pub remaining_files: usize,
    /// Whether the scan stopped early on request
    pub cancelled: bool,
}
