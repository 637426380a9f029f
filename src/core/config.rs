//! Scan configuration.

use crate::core::hasher::{DEFAULT_HASH_SIZE, MAX_HASH_SIZE};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default preview tile edge in pixels
pub const DEFAULT_PREVIEW_SIZE: u32 = 200;

/// Default percentage of bits allowed to differ
pub const DEFAULT_THRESHOLD: u32 = 10;

/// What to do with a file that cannot be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DecodePolicy {
    /// Stop the whole scan with the decode error
    #[default]
    Abort,
    /// Log a warning, drop the file from the scan and continue
    Skip,
}

/// Settings for one scan run
///
/// Immutable once a scan starts; call [`ScanConfig::validate`] (the scanner
/// does) before any file is touched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Folder whose files are compared
    pub source_folder: PathBuf,
    /// Folder confirmed duplicates are moved into
    pub destination_folder: PathBuf,
    /// Percentage of bits allowed to differ (0-100)
    pub threshold: u32,
    /// Side length of the fingerprint grid
    pub hash_size: u32,
    /// Edge of each tile in the comparison frame
    pub preview_size: u32,
    /// Hash every file once before comparing
    pub precompute_fingerprints: bool,
    /// Reaction to undecodable files
    pub decode_policy: DecodePolicy,
}

impl ScanConfig {
    /// Create a configuration with default threshold and hash size
    pub fn new(source_folder: impl Into<PathBuf>, destination_folder: impl Into<PathBuf>) -> Self {
        Self {
            source_folder: source_folder.into(),
            destination_folder: destination_folder.into(),
            threshold: DEFAULT_THRESHOLD,
            hash_size: DEFAULT_HASH_SIZE,
            preview_size: DEFAULT_PREVIEW_SIZE,
            precompute_fingerprints: false,
            decode_policy: DecodePolicy::Abort,
        }
    }

    /// Set the percentage of bits allowed to differ
    pub fn threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the fingerprint grid size
    ///
    /// Larger sizes are more discriminating but slower.
    /// - 8: 64 bits, coarse
    /// - 16: 256 bits (default)
    /// - 32: 1024 bits, very fine
    pub fn hash_size(mut self, size: u32) -> Self {
        self.hash_size = size;
        self
    }

    /// Set the preview tile edge
    pub fn preview_size(mut self, size: u32) -> Self {
        self.preview_size = size;
        self
    }

    /// Hash every file up front instead of once per comparison
    pub fn precompute_fingerprints(mut self, enabled: bool) -> Self {
        self.precompute_fingerprints = enabled;
        self
    }

    /// Set the reaction to undecodable files
    pub fn decode_policy(mut self, policy: DecodePolicy) -> Self {
        self.decode_policy = policy;
        self
    }

    /// Total fingerprint bits, saturating for sizes `validate` rejects
    pub fn bit_count(&self) -> u32 {
        self.hash_size.saturating_mul(self.hash_size)
    }

    /// Check every setting without touching the filesystem
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threshold > 100 {
            return Err(ConfigError::InvalidThreshold {
                value: self.threshold,
            });
        }
        if self.hash_size == 0 || self.hash_size > MAX_HASH_SIZE {
            return Err(ConfigError::InvalidHashSize {
                value: self.hash_size,
            });
        }
        if self.preview_size == 0 {
            return Err(ConfigError::InvalidPreviewSize {
                value: self.preview_size,
            });
        }
        if self.source_folder == self.destination_folder {
            return Err(ConfigError::SameFolder {
                path: self.source_folder.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ScanConfig::new("/in", "/out");

        assert_eq!(config.hash_size, 16);
        assert_eq!(config.threshold, 10);
        assert_eq!(config.preview_size, 200);
        assert_eq!(config.decode_policy, DecodePolicy::Abort);
        assert!(!config.precompute_fingerprints);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_sets_fields() {
        let config = ScanConfig::new("/in", "/out")
            .threshold(50)
            .hash_size(8)
            .preview_size(64)
            .precompute_fingerprints(true)
            .decode_policy(DecodePolicy::Skip);

        assert_eq!(config.threshold, 50);
        assert_eq!(config.bit_count(), 64);
        assert_eq!(config.preview_size, 64);
        assert!(config.precompute_fingerprints);
        assert_eq!(config.decode_policy, DecodePolicy::Skip);
    }

    #[test]
    fn zero_hash_size_is_invalid() {
        let config = ScanConfig::new("/in", "/out").hash_size(0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidHashSize { value: 0 })
        );
    }

    #[test]
    fn hash_size_is_capped_at_256() {
        assert!(ScanConfig::new("/in", "/out").hash_size(256).validate().is_ok());
        assert_eq!(
            ScanConfig::new("/in", "/out").hash_size(257).validate(),
            Err(ConfigError::InvalidHashSize { value: 257 })
        );
        let oversized = ScanConfig::new("/in", "/out").hash_size(70_000);
        assert_eq!(
            oversized.validate(),
            Err(ConfigError::InvalidHashSize { value: 70_000 })
        );
        assert_eq!(oversized.bit_count(), u32::MAX);
    }

    #[test]
    fn threshold_above_100_is_invalid() {
        let config = ScanConfig::new("/in", "/out").threshold(101);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidThreshold { value: 101 })
        );
        assert!(ScanConfig::new("/in", "/out").threshold(100).validate().is_ok());
    }

    #[test]
    fn same_source_and_destination_is_invalid() {
        let config = ScanConfig::new("/photos", "/photos");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SameFolder { .. })
        ));
    }
}
