//! # Near-Duplicate Mover
//!
//! Finds near-duplicate images in a folder and lets an operator decide,
//! pair by pair, whether each duplicate is moved into another folder.
//!
//! ## Core Philosophy
//! - **Never delete** - duplicates are moved, and only when confirmed
//! - **Show the evidence** - every comparison comes with a preview frame
//! - **Deterministic** - same folder and settings, same pairs in the same order
//!
//! ## Architecture
//! The library is split into a core engine (UI-agnostic) and presentation layers:
//! - `core` - Fingerprinting and the pairwise scan
//! - `events` - Event sink port and channel-based delivery (GUI-ready)
//! - `error` - Error taxonomy
//! - `cli` - Command-line interface (binary only)

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{DuplicateFinderError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point (CLI or GUI).
/// Calling it twice is harmless; the second call leaves the first
/// subscriber in place.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
