//! Device UUID derivation and discovery search helpers.
//!
//! Every device carries a 32 bit UUID derived once from a stable per-chip
//! key such as a serial number, a MAC address or a flash signature. The
//! value `0` is reserved for legacy devices without one, so the
//! derivation re-salts until the result is nonzero. Masters enumerate an
//! unknown bus by binary search over the UUID space: a broadcast names a
//! bit mask and a pattern, and every device whose masked UUID matches
//! asserts the bus (see [`search_mask`]).

/// Seed for [`uuid_from_key`]. Re-salted by one whenever the hash of a
/// key collides with the reserved zero UUID.
pub const UUID_SEED: u32 = 0x5555_5555;

/// MurmurHash3 x86 32 bit variant of `key` under `seed`.
pub fn murmur3_32(key: &[u8], seed: u32) -> u32 {
    const C1: u32 = 0xCC9E_2D51;
    const C2: u32 = 0x1B87_3593;

    let mut hash = seed;

    let mut blocks = key.chunks_exact(4);
    for block in blocks.by_ref() {
        let mut k = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);
        k = k.wrapping_mul(C1);
        k = k.rotate_left(15);
        k = k.wrapping_mul(C2);
        hash ^= k;
        hash = hash.rotate_left(13);
        hash = hash.wrapping_mul(5).wrapping_add(0xE654_6B64);
    }

    let tail = blocks.remainder();
    if !tail.is_empty() {
        let mut k: u32 = 0;
        for (i, &byte) in tail.iter().enumerate() {
            k ^= (byte as u32) << (8 * i);
        }
        k = k.wrapping_mul(C1);
        k = k.rotate_left(15);
        k = k.wrapping_mul(C2);
        hash ^= k;
    }

    hash ^= key.len() as u32;
    hash ^= hash >> 16;
    hash = hash.wrapping_mul(0x85EB_CA6B);
    hash ^= hash >> 13;
    hash = hash.wrapping_mul(0xC2B2_AE35);
    hash ^= hash >> 16;
    hash
}

/// Derives the device UUID from a stable per-chip key.
///
/// Never returns `0`; that value marks legacy devices without a UUID.
pub fn uuid_from_key(key: &[u8]) -> u32 {
    let uuid = murmur3_32(key, UUID_SEED);
    if uuid == 0 {
        murmur3_32(key, UUID_SEED.wrapping_add(1))
    } else {
        uuid
    }
}

/// Mask selecting the low `bits` bits of a UUID during discovery.
///
/// Bit counts of 32 or more select the whole UUID.
pub const fn search_mask(bits: u8) -> u32 {
    if bits >= 32 {
        u32::MAX
    } else {
        (1u32 << bits) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // Reference values from the canonical MurmurHash3 test suite.
    #[test]
    fn murmur3_reference_values() {
        assert_eq!(murmur3_32(b"", 0), 0x0000_0000);
        assert_eq!(murmur3_32(b"", 1), 0x514E_28B7);
        assert_eq!(murmur3_32(b"test", 0), 0xBA6B_D213);
        assert_eq!(murmur3_32(b"hello", 0), 0x248B_FA47);
    }

    #[test]
    fn uuid_uses_the_fixed_seed() {
        let key = b"0123456789AB";
        assert_eq!(uuid_from_key(key), murmur3_32(key, UUID_SEED));
    }

    #[test]
    fn masks_select_low_bits() {
        assert_eq!(search_mask(0), 0);
        assert_eq!(search_mask(1), 0x0000_0001);
        assert_eq!(search_mask(8), 0x0000_00FF);
        assert_eq!(search_mask(31), 0x7FFF_FFFF);
        assert_eq!(search_mask(32), u32::MAX);
        assert_eq!(search_mask(40), u32::MAX);
    }

    proptest! {
        #[test]
        fn uuid_is_never_zero(key in proptest::collection::vec(any::<u8>(), 0..32)) {
            prop_assert_ne!(uuid_from_key(&key), 0);
        }

        #[test]
        fn mask_width_matches_bit_count(bits in 0u8..=32) {
            prop_assert_eq!(search_mask(bits).count_ones(), bits as u32);
        }

        #[test]
        fn masks_are_contiguous_from_bit_zero(bits in 1u8..32) {
            let mask = search_mask(bits);
            // A contiguous low mask plus one is a power of two.
            prop_assert_eq!(mask & (mask + 1), 0);
        }
    }
}
