//! # Comparator Module
//!
//! Decides whether two fingerprints belong to near-duplicate images.
//!
//! The threshold is a percentage of the fingerprint length: with
//! `hash_size = 16` (256 bits) and `threshold = 10`, up to 25.6 differing
//! bits still count as a duplicate. The boundary itself is included.

use crate::core::hasher::{Fingerprint, PerceptualHash};

/// Strategy trait for determining if photos are duplicates
pub trait ComparisonStrategy: Send + Sync {
    /// Largest distance still considered a duplicate for `bit_count` bits
    fn max_distance(&self, bit_count: u32) -> f64;

    /// Determine if a distance over `bit_count` bits is a duplicate
    fn is_duplicate(&self, distance: u32, bit_count: u32) -> bool {
        distance as f64 <= self.max_distance(bit_count)
    }

    /// Human-readable description of the strategy
    fn description(&self) -> String;
}

/// Percent-of-bits threshold strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdStrategy {
    /// Percentage of bits allowed to differ (0-100)
    threshold: u32,
}

impl ThresholdStrategy {
    /// Create a new threshold strategy
    pub fn new(threshold: u32) -> Self {
        Self { threshold }
    }

    /// Get the threshold percentage
    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}

impl ComparisonStrategy for ThresholdStrategy {
    fn max_distance(&self, bit_count: u32) -> f64 {
        bit_count as f64 * self.threshold as f64 / 100.0
    }

    fn description(&self) -> String {
        format!(
            "Threshold strategy: photos differing in at most {}% of bits are duplicates",
            self.threshold
        )
    }
}

/// Outcome of comparing two fingerprints
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult {
    /// Number of differing bits
    pub distance: u32,
    /// Largest distance that still counts as a duplicate
    pub max_distance: f64,
    /// Whether the pair is a duplicate
    pub is_duplicate: bool,
}

/// Compare two fingerprints under a strategy
pub fn compare(
    reference: &Fingerprint,
    candidate: &Fingerprint,
    strategy: &dyn ComparisonStrategy,
) -> MatchResult {
    let distance = reference.distance(candidate);
    let bit_count = reference.bit_count();
    MatchResult {
        distance,
        max_distance: strategy.max_distance(bit_count),
        is_duplicate: strategy.is_duplicate(distance, bit_count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_strategy_at_boundary() {
        // 16x16 hash, half the bits may differ
        let strategy = ThresholdStrategy::new(50);

        assert!(strategy.is_duplicate(127, 256));
        assert!(strategy.is_duplicate(128, 256));
        assert!(!strategy.is_duplicate(129, 256));
    }

    #[test]
    fn fractional_limit_uses_float_comparison() {
        // 3x3 hash at 50% allows 4.5 bits
        let strategy = ThresholdStrategy::new(50);

        assert_eq!(strategy.max_distance(9), 4.5);
        assert!(strategy.is_duplicate(4, 9));
        assert!(!strategy.is_duplicate(5, 9));
    }

    #[test]
    fn zero_threshold_only_matches_identical() {
        let strategy = ThresholdStrategy::new(0);

        assert!(strategy.is_duplicate(0, 256));
        assert!(!strategy.is_duplicate(1, 256));
    }

    #[test]
    fn full_threshold_matches_everything() {
        let strategy = ThresholdStrategy::new(100);
        assert!(strategy.is_duplicate(256, 256));
    }

    #[test]
    fn compare_reports_distance_and_verdict() {
        let a = Fingerprint::from_bits(2, vec![true, true, false, false]).unwrap();
        let b = Fingerprint::from_bits(2, vec![true, false, false, true]).unwrap();

        let result = compare(&a, &b, &ThresholdStrategy::new(50));

        assert_eq!(result.distance, 2);
        assert_eq!(result.max_distance, 2.0);
        assert!(result.is_duplicate);
    }

    #[test]
    fn description_includes_threshold() {
        let desc = ThresholdStrategy::new(7).description();
        assert!(desc.contains("7%"));
    }
}
