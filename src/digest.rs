//! The piecewise digest folded between two trigger points.
//!
//! This is 32-bit FNV-1 with ssdeep's offset basis instead of the public one,
//! so the output characters line up with the reference tool.

use crate::ALPHABET;

/// FNV-1 32-bit prime.
pub const HASH_PRIME: u32 = 0x0100_0193;

/// Offset basis the accumulator starts from and returns to on reset.
pub const HASH_INIT: u32 = 0x2802_1967;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DigestAccumulator(u32);

impl Default for DigestAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl DigestAccumulator {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self(HASH_INIT)
    }

    #[inline]
    pub const fn update(&mut self, byte: u8) {
        self.0 = self.0.wrapping_mul(HASH_PRIME) ^ byte as u32;
    }

    #[inline]
    pub const fn reset(&mut self) {
        self.0 = HASH_INIT;
    }

    #[inline]
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Alphabet character for the low 6 bits of the current value.
    #[inline]
    #[must_use]
    pub const fn encode(&self) -> char {
        ALPHABET[(self.0 & 0x3F) as usize] as char
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_not_the_public_offset_basis() {
        assert_ne!(DigestAccumulator::new().value(), 0x811c_9dc5);
        assert_eq!(DigestAccumulator::new().value(), HASH_INIT);
    }

    #[test]
    fn test_update() {
        let mut digest = DigestAccumulator::new();
        digest.update(b'a');
        assert_eq!(
            digest.value(),
            HASH_INIT.wrapping_mul(HASH_PRIME) ^ u32::from(b'a')
        );
        digest.update(b'b');
        assert_eq!(
            digest.value(),
            (HASH_INIT.wrapping_mul(HASH_PRIME) ^ u32::from(b'a')).wrapping_mul(HASH_PRIME)
                ^ u32::from(b'b')
        );
    }

    #[test]
    fn test_reset() {
        let mut digest = DigestAccumulator::new();
        for &byte in b"Hello, world!" {
            digest.update(byte);
        }
        assert_ne!(digest.value(), HASH_INIT);
        digest.reset();
        assert_eq!(digest, DigestAccumulator::new());
    }

    #[test]
    fn test_encode() {
        // 0x28021967 & 0x3F == 39 -> 'n'
        assert_eq!(DigestAccumulator::new().encode(), 'n');
    }
}
