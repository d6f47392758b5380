//! Diagnostic packet counters.

/// Per-device packet statistics, readable and resettable over the bus.
///
/// All counters wrap on overflow; on a healthy bus only `correct` ever
/// gets far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PacketCounters {
    /// Frames accepted with a valid checksum.
    pub correct: u32,
    /// Frames discarded because they outgrew the receive buffer.
    pub overflow: u32,
    /// Frames overwritten before the main loop consumed them.
    pub lost: u32,
    /// Frames discarded over a checksum mismatch.
    pub checksum_mismatch: u32,
}

impl PacketCounters {
    /// Clears all four counters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The combined on-wire representation: all four counters
    /// little-endian, correct first, mismatch last.
    pub fn to_le_bytes(&self) -> [u8; 16] {
        let mut bytes = [0u8; 16];
        bytes[0..4].copy_from_slice(&self.correct.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.overflow.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.lost.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.checksum_mismatch.to_le_bytes());
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_layout_is_little_endian_in_wire_order() {
        let counters = PacketCounters {
            correct: 0x0403_0201,
            overflow: 2,
            lost: 3,
            checksum_mismatch: 0x8000_0000,
        };
        let bytes = counters.to_le_bytes();
        assert_eq!(&bytes[0..4], &[0x01, 0x02, 0x03, 0x04]);
        assert_eq!(&bytes[4..8], &[0x02, 0x00, 0x00, 0x00]);
        assert_eq!(&bytes[8..12], &[0x03, 0x00, 0x00, 0x00]);
        assert_eq!(&bytes[12..16], &[0x00, 0x00, 0x00, 0x80]);
    }

    #[test]
    fn reset_clears_every_counter() {
        let mut counters = PacketCounters {
            correct: 1,
            overflow: 2,
            lost: 3,
            checksum_mismatch: 4,
        };
        counters.reset();
        assert_eq!(counters, PacketCounters::default());
    }
}
