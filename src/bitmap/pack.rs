//! Conversion between boolean matrices and the persisted byte form.
//!
//! Stored records hold one byte per pixel. Packing writes strictly `0`
//! or `1`; unpacking treats any non-zero byte as light. The asymmetry is
//! kept for compatibility with rows already in storage.

use super::matrix::BinaryMatrix;
use super::CANONICAL_PIXELS;
use serde::{Deserialize, Serialize};

/// The persisted byte-per-pixel form of a bitmap.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackedBytes {
    data: Vec<u8>,
}

impl PackedBytes {
    /// Wraps bytes loaded from storage. No validation is performed.
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Returns the raw bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns true if the length matches the canonical pixel count.
    #[inline]
    pub fn is_canonical(&self) -> bool {
        self.data.len() == CANONICAL_PIXELS
    }

    /// Unpacks into a freshly allocated matrix.
    pub fn unpack(&self) -> BinaryMatrix {
        unpack(self)
    }
}

impl std::fmt::Debug for PackedBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackedBytes")
            .field("len", &self.data.len())
            .finish()
    }
}

/// Packs a matrix into one byte per pixel (`1` light, `0` dark).
pub fn pack(matrix: &BinaryMatrix) -> PackedBytes {
    PackedBytes::from_vec(matrix.as_slice().iter().map(|&lit| u8::from(lit)).collect())
}

/// Unpacks stored bytes; any non-zero byte is light.
///
/// Never fails and does not check the length.
pub fn unpack(packed: &PackedBytes) -> BinaryMatrix {
    BinaryMatrix::from_bits(packed.as_bytes().iter().map(|&b| b != 0).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_pack_is_zero_or_one() {
        let matrix = BinaryMatrix::from_bits(vec![true, false, false, true]);
        assert_eq!(pack(&matrix).as_bytes(), &[1, 0, 0, 1]);
    }

    #[test]
    fn test_unpack_tolerates_any_nonzero() {
        let packed = PackedBytes::from_vec(vec![1, 200, 0, 2, 255]);
        assert_eq!(
            unpack(&packed).as_slice(),
            &[true, true, false, true, true]
        );
    }

    #[test]
    fn test_unpack_any_length() {
        // Legacy rows can be shorter than a full bitmap.
        let packed = PackedBytes::from_vec(vec![1, 0, 1, 0, 1, 0, 1, 0, 1, 0]);

        assert!(!packed.is_canonical());
        assert_eq!(packed.unpack().len(), 10);
        assert!(unpack(&PackedBytes::from_vec(Vec::new())).is_empty());
    }

    proptest! {
        #[test]
        fn prop_round_trip(bits in proptest::collection::vec(any::<bool>(), CANONICAL_PIXELS)) {
            let matrix = BinaryMatrix::from_bits(bits);
            let packed = pack(&matrix);

            prop_assert!(packed.is_canonical());
            prop_assert_eq!(unpack(&packed), matrix);
        }

        #[test]
        fn prop_unpack_matches_nonzero(bytes in proptest::collection::vec(any::<u8>(), 0..4096)) {
            let matrix = unpack(&PackedBytes::from_vec(bytes.clone()));

            prop_assert_eq!(matrix.len(), bytes.len());
            for (lit, byte) in matrix.as_slice().iter().zip(&bytes) {
                prop_assert_eq!(*lit, *byte != 0);
            }
        }
    }
}
