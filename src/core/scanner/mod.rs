//! # Scanner Module
//!
//! Walks every unordered pair of files in the source folder, compares their
//! fingerprints and asks the decision port what to do with duplicates.
//!
//! ## State machine
//! `Idle → Listing → Scanning → Done`
//!
//! Listing fails with `SourceNotFound` when the folder is missing.
//! Scanning keeps a reference cursor `i` and a candidate cursor `k > i` into
//! the `WorkingFileList`. A confirmed move removes the candidate and leaves
//! `k` alone so the file that slid into its slot is compared next. A keep, or
//! a non-duplicate pair, advances `k`.
//!
//! ## Example
//! ```rust,ignore
//! use near_duplicate_mover::core::{DuplicateScanner, ScanConfig};
//! use near_duplicate_mover::core::decision::AlwaysKeep;
//! use near_duplicate_mover::events::TracingSink;
//!
//! let config = ScanConfig::new("/photos", "/photos-dupes").threshold(10);
//! let report = DuplicateScanner::new(config).run_folder(&mut TracingSink, &mut AlwaysKeep)?;
//! println!("{} duplicates", report.summary.duplicate_count);
//! ```

mod cancel;
mod working_list;

pub use cancel::CancelToken;
use working_list::WorkingFileList;

use crate::core::comparator::{compare, ThresholdStrategy};
use crate::core::config::{DecodePolicy, ScanConfig};
use crate::core::decision::{Decision, DecisionPort, DecisionRequest};
use crate::core::hasher::{HashOutput, PerceptualHasher};
use crate::core::preview::compose_frame;
use crate::core::source::{FileId, FolderSource, ImageSource};
use crate::error::{DuplicateFinderError, HashError};
use crate::events::{ComparisonEvent, EventSink, LogLevel, SummaryEvent};
use image::imageops::{self, FilterType};
use image::RgbImage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Where a scan run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanState {
    Idle,
    Listing,
    Scanning,
    Done,
}

impl std::fmt::Display for ScanState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanState::Idle => write!(f, "Idle"),
            ScanState::Listing => write!(f, "Listing"),
            ScanState::Scanning => write!(f, "Scanning"),
            ScanState::Done => write!(f, "Done"),
        }
    }
}

/// Result of a completed scan
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Final counters, identical to the emitted summary event
    pub summary: SummaryEvent,
    /// The working list as it stood at Done
    pub remaining: Vec<FileId>,
    /// Always `Done` once a report exists
    pub state: ScanState,
}

/// A decoded file reduced to what comparisons need
struct Fingerprinted {
    hash: HashOutput,
    /// The original scaled to one preview tile
    thumbnail: RgbImage,
}

/// Results of the up-front hashing pass.
///
/// Decode failures are parked in `failed` and only surface when the scan
/// reaches that file, so both modes emit the same events in the same order.
#[derive(Default)]
struct Cache {
    hashed: HashMap<FileId, Arc<Fingerprinted>>,
    failed: HashMap<FileId, HashError>,
}

/// Pairwise near-duplicate scanner with interactive pruning
pub struct DuplicateScanner {
    config: ScanConfig,
    strategy: ThresholdStrategy,
    cancel: CancelToken,
    state: ScanState,
}

impl DuplicateScanner {
    /// Create a scanner for one configuration
    pub fn new(config: ScanConfig) -> Self {
        let strategy = ThresholdStrategy::new(config.threshold);
        Self {
            config,
            strategy,
            cancel: CancelToken::new(),
            state: ScanState::Idle,
        }
    }

    /// Stop early when `token` is cancelled
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// A token that cancels this scanner
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Current state of the last (or running) scan
    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scan the configured source folder on the local filesystem
    pub fn run_folder(
        &mut self,
        sink: &mut dyn EventSink,
        decisions: &mut dyn DecisionPort,
    ) -> Result<ScanReport, DuplicateFinderError> {
        self.run(&FolderSource::new(), sink, decisions)
    }

    /// Run one full scan against `source`.
    ///
    /// Configuration errors are raised before `source` is touched.
    pub fn run(
        &mut self,
        source: &dyn ImageSource,
        sink: &mut dyn EventSink,
        decisions: &mut dyn DecisionPort,
    ) -> Result<ScanReport, DuplicateFinderError> {
        self.transition(ScanState::Idle);
        self.config.validate()?;

        self.transition(ScanState::Listing);
        let files = match source.list(&self.config.source_folder) {
            Ok(files) => files,
            Err(e) => {
                sink.on_log(LogLevel::Error, &e.to_string());
                self.transition(ScanState::Done);
                return Err(e.into());
            }
        };

        sink.on_log(
            LogLevel::Info,
            &format!(
                "Searching duplicates in {}, hash_size: {}, threshold: {}",
                self.config.source_folder.display(),
                self.config.hash_size,
                self.config.threshold
            ),
        );

        self.transition(ScanState::Scanning);
        let result = self.scan(source, files, sink, decisions);
        self.transition(ScanState::Done);

        let report = match result {
            Ok(report) => report,
            Err(e) => {
                sink.on_log(LogLevel::Error, &e.to_string());
                return Err(e);
            }
        };

        sink.on_log(
            LogLevel::Info,
            &format!(
                "Done! Duplicates count: {}, Moved duplicates: {}",
                report.summary.duplicate_count, report.summary.moved_count
            ),
        );
        sink.on_summary(&report.summary);
        Ok(report)
    }

    fn transition(&mut self, next: ScanState) {
        tracing::debug!(from = %self.state, to = %next, "scan state");
        self.state = next;
    }

    fn scan(
        &self,
        source: &dyn ImageSource,
        files: Vec<FileId>,
        sink: &mut dyn EventSink,
        decisions: &mut dyn DecisionPort,
    ) -> Result<ScanReport, DuplicateFinderError> {
        let total_files = files.len();
        let mut list = WorkingFileList::new(files);
        let mut summary = SummaryEvent {
            total_files,
            ..Default::default()
        };
        let mut hasher = PerceptualHasher::new(self.config.hash_size)?;

        let mut cache = Cache::default();
        if self.config.precompute_fingerprints && list.len() > 1 && !self.cancel.is_cancelled() {
            cache = self.precompute(source, list.files());
        }

        let mut reference: Option<(FileId, Arc<Fingerprinted>)> = None;

        while let Some((i, k)) = list.current_pair() {
            if self.cancel.is_cancelled() {
                summary.cancelled = true;
                sink.on_log(LogLevel::Warn, "Scan cancelled");
                break;
            }

            let reference_path = list.files()[i].clone();
            let candidate_path = list.files()[k].clone();

            let current = match reference.take() {
                Some((path, hashed)) if path == reference_path => hashed,
                _ => match self.fingerprint(source, &mut hasher, &mut cache, &reference_path) {
                    Ok(hashed) => hashed,
                    Err(e) => {
                        self.on_decode_error(e, sink)?;
                        list.remove_reference();
                        summary.skipped_files += 1;
                        continue;
                    }
                },
            };
            reference = Some((reference_path.clone(), Arc::clone(&current)));

            let candidate = match self.fingerprint(source, &mut hasher, &mut cache, &candidate_path) {
                Ok(hashed) => hashed,
                Err(e) => {
                    self.on_decode_error(e, sink)?;
                    list.remove_candidate();
                    summary.skipped_files += 1;
                    continue;
                }
            };

            summary.comparisons += 1;
            let result = compare(
                &current.hash.fingerprint,
                &candidate.hash.fingerprint,
                &self.strategy,
            );
            if result.is_duplicate {
                summary.duplicate_count += 1;
            }

            sink.on_log(
                LogLevel::Info,
                &format!(
                    "{} -> {} distance = {}",
                    file_name(&reference_path),
                    file_name(&candidate_path),
                    result.distance
                ),
            );

            let frame = compose_frame(
                &current.thumbnail,
                &candidate.thumbnail,
                &current.hash.preview,
                &candidate.hash.preview,
                summary.duplicate_count,
                self.config.preview_size,
            );
            sink.on_comparison(&ComparisonEvent {
                reference: reference_path.clone(),
                candidate: candidate_path.clone(),
                reference_index: i,
                candidate_index: k,
                distance: result.distance,
                max_distance: result.max_distance,
                is_duplicate: result.is_duplicate,
                duplicate_count: summary.duplicate_count,
                frame,
            });

            if !result.is_duplicate {
                list.advance();
                continue;
            }

            let request = DecisionRequest {
                reference: reference_path,
                candidate: candidate_path.clone(),
                candidate_index: k,
                total_files,
                destination: self.config.destination_folder.clone(),
            };

            match decisions.request(&request) {
                Decision::Move => {
                    match source.move_file(
                        &candidate_path,
                        &self.config.source_folder,
                        &self.config.destination_folder,
                    ) {
                        Ok(()) => {
                            list.remove_candidate();
                            summary.moved_count += 1;
                            sink.on_log(
                                LogLevel::Info,
                                &format!(
                                    "Moved {} element ({}) of {}",
                                    k,
                                    file_name(&candidate_path),
                                    total_files
                                ),
                            );
                        }
                        Err(e) => {
                            summary.move_failures += 1;
                            sink.on_log(LogLevel::Error, &format!("{}; keeping it", e));
                            list.advance();
                        }
                    }
                }
                Decision::Keep => {
                    sink.on_log(
                        LogLevel::Info,
                        &format!(
                            "Ignored {} element ({}) of {}",
                            k,
                            file_name(&candidate_path),
                            total_files
                        ),
                    );
                    list.advance();
                }
            }
        }

        summary.remaining_files = list.len();
        Ok(ScanReport {
            summary,
            remaining: list.into_files(),
            state: ScanState::Done,
        })
    }

    /// Hash every listed file once, in parallel.
    ///
    /// Files not yet started when the token is cancelled are left out; the
    /// scan loop sees the cancellation before its first pair.
    fn precompute(&self, source: &dyn ImageSource, files: &[FileId]) -> Cache {
        let hash_size = self.config.hash_size;
        let tile = self.config.preview_size;
        let cancel = &self.cancel;

        let results: Vec<(FileId, Result<Fingerprinted, HashError>)> = files
            .par_iter()
            .filter(|_| !cancel.is_cancelled())
            .map(|file| {
                let hashed = PerceptualHasher::new(hash_size)
                    .and_then(|mut hasher| load_and_hash(source, &mut hasher, file, tile));
                (file.clone(), hashed)
            })
            .collect();

        let mut cache = Cache::default();
        for (file, hashed) in results {
            match hashed {
                Ok(hashed) => {
                    cache.hashed.insert(file, Arc::new(hashed));
                }
                Err(e) => {
                    cache.failed.insert(file, e);
                }
            }
        }
        cache
    }

    fn fingerprint(
        &self,
        source: &dyn ImageSource,
        hasher: &mut PerceptualHasher,
        cache: &mut Cache,
        file: &Path,
    ) -> Result<Arc<Fingerprinted>, HashError> {
        if let Some(hashed) = cache.hashed.get(file) {
            return Ok(Arc::clone(hashed));
        }
        if let Some(error) = cache.failed.remove(file) {
            return Err(error);
        }
        load_and_hash(source, hasher, file, self.config.preview_size).map(Arc::new)
    }

    /// Abort with the error, or log it and let the caller drop the file.
    fn on_decode_error(
        &self,
        error: HashError,
        sink: &mut dyn EventSink,
    ) -> Result<(), DuplicateFinderError> {
        match self.config.decode_policy {
            DecodePolicy::Abort => Err(error.into()),
            DecodePolicy::Skip => {
                sink.on_log(LogLevel::Warn, &format!("{}; skipping it", error));
                Ok(())
            }
        }
    }
}

fn load_and_hash(
    source: &dyn ImageSource,
    hasher: &mut PerceptualHasher,
    file: &Path,
    tile: u32,
) -> Result<Fingerprinted, HashError> {
    let image = source.load(file)?;
    let hash = hasher.compute(&image).map_err(|e| e.with_path(file))?;
    let thumbnail = imageops::resize(&image, tile, tile, FilterType::Triangle);
    Ok(Fingerprinted { hash, thumbnail })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
