//! # Core Module
//!
//! The UI-agnostic duplicate detection engine.
//!
//! ## Modules
//! - `hasher` - Reduces images to mean-threshold fingerprints
//! - `comparator` - Hamming distance and the percent threshold
//! - `preview` - Renders the side-by-side comparison frame
//! - `source` - Lists, loads and moves image files
//! - `decision` - Keep/move answers for detected duplicates
//! - `config` - Scan settings
//! - `scanner` - The pairwise scan over a shrinking file list

pub mod comparator;
pub mod config;
pub mod decision;
pub mod hasher;
pub mod preview;
pub mod scanner;
pub mod source;

// Re-export commonly used types
pub use config::{DecodePolicy, ScanConfig};
pub use decision::{Decision, DecisionPort, DecisionRequest};
pub use hasher::{Fingerprint, PerceptualHash, PerceptualHasher};
pub use scanner::{CancelToken, DuplicateScanner, ScanReport, ScanState};
pub use source::{FolderSource, ImageSource, MemorySource};
