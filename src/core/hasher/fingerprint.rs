//! Fingerprint values and the comparison trait.

use serde::{Deserialize, Serialize};

/// A computed perceptual hash that can be compared
pub trait PerceptualHash: Clone + Send + Sync {
    /// Compute the Hamming distance to another hash
    ///
    /// Returns the number of bit positions that differ.
    /// Lower distance = more similar images.
    fn distance(&self, other: &Self) -> u32;

    /// Get the total number of bits in this hash
    fn bit_count(&self) -> u32;

    /// Calculate similarity as a percentage (0-100)
    fn similarity(&self, other: &Self) -> f64 {
        let distance = self.distance(other);
        let max_distance = self.bit_count();
        if max_distance == 0 {
            return 100.0;
        }
        (1.0 - (distance as f64 / max_distance as f64)) * 100.0
    }
}

/// A `hash_size × hash_size` bit grid, flattened row by row.
///
/// Bit `y * hash_size + x` is set when grid cell `(x, y)` is at least as
/// bright as the grid mean.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint {
    hash_size: u32,
    bits: Vec<bool>,
}

impl Fingerprint {
    /// Build a fingerprint from row-major bits.
    ///
    /// Returns `None` unless `bits.len() == hash_size²`.
    pub fn from_bits(hash_size: u32, bits: Vec<bool>) -> Option<Self> {
        let expected = (hash_size as usize).checked_mul(hash_size as usize)?;
        if bits.len() != expected {
            return None;
        }
        Some(Self { hash_size, bits })
    }

    /// Side length of the underlying grid
    pub fn hash_size(&self) -> u32 {
        self.hash_size
    }

    /// Row-major bits
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Bit at grid cell `(x, y)`
    pub fn bit(&self, x: u32, y: u32) -> bool {
        self.bits[y as usize * self.hash_size as usize + x as usize]
    }

    /// Number of set bits
    pub fn count_ones(&self) -> u32 {
        self.bits.iter().filter(|&&bit| bit).count() as u32
    }

    /// Bits packed MSB-first into bytes, as a lowercase hex string
    pub fn to_hex(&self) -> String {
        self.bits
            .chunks(8)
            .map(|chunk| {
                let byte = chunk
                    .iter()
                    .enumerate()
                    .fold(0u8, |acc, (i, &bit)| if bit { acc | (1 << (7 - i)) } else { acc });
                format!("{:02x}", byte)
            })
            .collect()
    }
}

impl PerceptualHash for Fingerprint {
    fn distance(&self, other: &Self) -> u32 {
        let differing = self
            .bits
            .iter()
            .zip(other.bits.iter())
            .filter(|(a, b)| a != b)
            .count();
        // Bits past the shorter fingerprint all count as different.
        let extra = self.bits.len().abs_diff(other.bits.len());
        (differing + extra) as u32
    }

    fn bit_count(&self) -> u32 {
        self.bits.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fingerprint(bits: &[u8]) -> Fingerprint {
        let size = (bits.len() as f64).sqrt() as u32;
        Fingerprint::from_bits(size, bits.iter().map(|&b| b == 1).collect()).unwrap()
    }

    #[test]
    fn from_bits_rejects_wrong_length() {
        assert!(Fingerprint::from_bits(2, vec![true; 3]).is_none());
        assert!(Fingerprint::from_bits(2, vec![true; 4]).is_some());
    }

    #[test]
    fn distance_to_self_is_zero() {
        let fp = fingerprint(&[1, 0, 1, 1]);
        assert_eq!(fp.distance(&fp), 0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = fingerprint(&[1, 1, 0, 0, 1, 0, 1, 0, 1]);
        let b = fingerprint(&[0, 1, 0, 1, 1, 1, 1, 0, 0]);

        assert_eq!(a.distance(&b), b.distance(&a));
        assert_eq!(a.distance(&b), 4);
    }

    #[test]
    fn similarity_is_0_for_opposite() {
        let a = fingerprint(&[1, 1, 1, 1]);
        let b = fingerprint(&[0, 0, 0, 0]);

        assert_eq!(a.similarity(&b), 0.0);
        assert_eq!(a.similarity(&a), 100.0);
    }

    #[test]
    fn bit_reads_row_major() {
        let fp = fingerprint(&[0, 1, 0, 0]);
        assert!(fp.bit(1, 0));
        assert!(!fp.bit(0, 1));
    }

    #[test]
    fn to_hex_packs_msb_first() {
        let mut bits = vec![false; 16];
        bits[0] = true;
        bits[15] = true;
        let fp = Fingerprint::from_bits(4, bits).unwrap();

        assert_eq!(fp.to_hex(), "8001");
        assert_eq!(fp.count_ones(), 2);
    }
}
