//! Bus addressing and the frame codec.
//!
//! A frame is `[address][payload][checksum]`. There is no start marker and
//! no length field; frames are delimited by the idle gap on the line, so
//! the codec here only deals with complete byte sequences.

use heapless::Vec;

use crate::checksum::ChecksumKind;

/// Largest frame the codec will produce, including address and checksum.
pub const MAX_FRAME_SIZE: usize = 64;

/// Address of a device that has not been assigned one yet. Such a device
/// answers UUID-addressed broadcasts but no unicast traffic.
pub const UNASSIGNED_ADDRESS: u16 = 0x0000;

/// Errors raised by the frame codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WireError {
    /// Frame would not fit in [`MAX_FRAME_SIZE`] bytes.
    PayloadTooLarge,
    /// Frame is shorter than address plus checksum.
    FrameTooShort,
    /// Checksum trailer does not match the frame contents.
    InvalidChecksum,
}

/// Number of address bytes on the wire, fixed per bus at deployment time.
///
/// Narrow addressing serves up to 127 devices; wide addressing trades one
/// byte of overhead per frame for a 15 bit device address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressWidth {
    One,
    Two,
}

impl AddressWidth {
    /// Number of address bytes at the start of every frame.
    pub const fn size(self) -> usize {
        match self {
            AddressWidth::One => 1,
            AddressWidth::Two => 2,
        }
    }

    /// Address every device accepts regardless of its own.
    pub const fn broadcast(self) -> u16 {
        match self {
            AddressWidth::One => 0x7F,
            AddressWidth::Two => 0x7FFF,
        }
    }

    /// Flag bit distinguishing replies from requests on the shared line.
    pub const fn master_flag(self) -> u16 {
        match self {
            AddressWidth::One => 0x80,
            AddressWidth::Two => 0x8000,
        }
    }

    /// Origin address a reply to `origin` carries.
    pub const fn reply_address(self, origin: u16) -> u16 {
        self.master_flag() | origin
    }

    /// Address encoded in the leading bytes of a frame.
    ///
    /// `bytes` must hold at least [`size`](Self::size) bytes.
    pub fn decode(self, bytes: &[u8]) -> u16 {
        match self {
            AddressWidth::One => bytes[0] as u16,
            AddressWidth::Two => u16::from_le_bytes([bytes[0], bytes[1]]),
        }
    }

    /// Writes `address` into the leading bytes of `out`.
    pub fn encode(self, address: u16, out: &mut [u8]) {
        match self {
            AddressWidth::One => out[0] = address as u8,
            AddressWidth::Two => out[..2].copy_from_slice(&address.to_le_bytes()),
        }
    }
}

/// Assembles a complete frame: address, payload, checksum trailer.
pub fn build_frame(
    address: u16,
    width: AddressWidth,
    kind: ChecksumKind,
    payload: &[u8],
) -> Result<Vec<u8, MAX_FRAME_SIZE>, WireError> {
    if width.size() + payload.len() + kind.width() > MAX_FRAME_SIZE {
        return Err(WireError::PayloadTooLarge);
    }

    let mut frame = Vec::new();
    let mut addr = [0u8; 2];
    width.encode(address, &mut addr);
    frame
        .extend_from_slice(&addr[..width.size()])
        .map_err(|_| WireError::PayloadTooLarge)?;
    frame
        .extend_from_slice(payload)
        .map_err(|_| WireError::PayloadTooLarge)?;
    let checksum = kind.compute(&frame);
    frame.push(checksum).map_err(|_| WireError::PayloadTooLarge)?;
    Ok(frame)
}

/// Splits a complete frame into destination address and payload.
///
/// The checksum covers everything before the trailer byte and is verified
/// here; the returned payload excludes both address and checksum.
pub fn parse_frame(
    bytes: &[u8],
    width: AddressWidth,
    kind: ChecksumKind,
) -> Result<(u16, &[u8]), WireError> {
    if bytes.len() < width.size() + kind.width() {
        return Err(WireError::FrameTooShort);
    }
    let (body, trailer) = bytes.split_at(bytes.len() - kind.width());
    if !kind.verify(body, trailer[0]) {
        return Err(WireError::InvalidChecksum);
    }
    Ok((width.decode(body), &body[width.size()..]))
}
