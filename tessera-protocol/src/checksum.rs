//! Frame checksum algorithms.
//!
//! Every frame ends in a single checksum byte computed over the address
//! and payload bytes. Which algorithm a bus uses is fixed at deployment
//! time; devices advertise theirs through the device info record.

/// Checksum algorithm in use on a bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChecksumKind {
    /// Plain XOR fold over all covered bytes.
    Xor,
    /// CRC-8 with polynomial `0x1D` and initial value `0xFD` (I-CODE parameters).
    Crc8,
}

impl ChecksumKind {
    /// Number of checksum bytes appended to a frame.
    pub const fn width(self) -> usize {
        match self {
            ChecksumKind::Xor | ChecksumKind::Crc8 => 1,
        }
    }

    /// Identifier reported in the device info record.
    pub const fn wire_id(self) -> u8 {
        match self {
            ChecksumKind::Xor => 0x00,
            ChecksumKind::Crc8 => 0x01,
        }
    }

    /// Checksum over `data`.
    pub fn compute(self, data: &[u8]) -> u8 {
        match self {
            ChecksumKind::Xor => xor_checksum(data),
            ChecksumKind::Crc8 => crc8_icode(data),
        }
    }

    /// Whether `checksum` matches the checksum of `data`.
    pub fn verify(self, data: &[u8], checksum: u8) -> bool {
        self.compute(data) == checksum
    }
}

/// XOR of all bytes in `data`.
pub fn xor_checksum(data: &[u8]) -> u8 {
    data.iter().fold(0, |acc, &byte| acc ^ byte)
}

/// CRC-8 of `data`, polynomial `0x1D`, initial value `0xFD`, no reflection.
///
/// These are the I-CODE parameters; `crc8_icode(b"123456789")` is `0x7E`.
pub fn crc8_icode(data: &[u8]) -> u8 {
    let mut crc: u8 = 0xFD;
    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            if crc & 0x80 != 0 {
                crc = (crc << 1) ^ 0x1D;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn crc8_check_value() {
        assert_eq!(crc8_icode(b"123456789"), 0x7E);
    }

    #[test]
    fn crc8_of_empty_input_is_initial_value() {
        assert_eq!(crc8_icode(&[]), 0xFD);
    }

    #[test]
    fn xor_folds_all_bytes() {
        assert_eq!(xor_checksum(&[]), 0x00);
        assert_eq!(xor_checksum(&[0xA5]), 0xA5);
        assert_eq!(xor_checksum(&[0x01, 0x02, 0x03]), 0x00);
        assert_eq!(xor_checksum(&[0xFF, 0x0F]), 0xF0);
    }

    #[test]
    fn kind_dispatches_to_matching_algorithm() {
        let data = [0x03, 0x00, 0x01];
        assert_eq!(ChecksumKind::Xor.compute(&data), xor_checksum(&data));
        assert_eq!(ChecksumKind::Crc8.compute(&data), crc8_icode(&data));
        assert!(ChecksumKind::Xor.verify(&data, 0x02));
        assert!(!ChecksumKind::Xor.verify(&data, 0x03));
    }

    #[test]
    fn wire_ids_are_distinct() {
        assert_eq!(ChecksumKind::Xor.wire_id(), 0x00);
        assert_eq!(ChecksumKind::Crc8.wire_id(), 0x01);
        assert_eq!(ChecksumKind::Xor.width(), 1);
        assert_eq!(ChecksumKind::Crc8.width(), 1);
    }

    proptest! {
        // Appending the checksum to the covered bytes yields a sequence
        // whose checksum is zero.
        #[test]
        fn crc8_residue_is_zero(data in proptest::collection::vec(any::<u8>(), 0..64)) {
            let mut framed = data.clone();
            framed.push(crc8_icode(&data));
            prop_assert_eq!(crc8_icode(&framed), 0);
        }

        #[test]
        fn xor_residue_is_zero(data in proptest::collection::vec(any::<u8>(), 0..64)) {
            let mut framed = data.clone();
            framed.push(xor_checksum(&data));
            prop_assert_eq!(xor_checksum(&framed), 0);
        }

        #[test]
        fn crc8_detects_single_bit_flips(
            data in proptest::collection::vec(any::<u8>(), 1..32),
            index in 0usize..32,
            bit in 0u8..8,
        ) {
            let index = index % data.len();
            let mut flipped = data.clone();
            flipped[index] ^= 1 << bit;
            prop_assert_ne!(crc8_icode(&data), crc8_icode(&flipped));
        }
    }
}
