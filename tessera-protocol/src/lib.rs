//! Wire-level definitions for the Tessera field bus.
//!
//! Tessera is a multi-drop, half-duplex serial bus with one master and up
//! to 127 (or 32767 in wide-address mode) slave devices. Frames carry no
//! start marker and no length field; receivers delimit them by the idle
//! gap on the line:
//!
//! ```text
//! ┌─────────────┬──────────────┬──────────┐
//! │   ADDRESS   │   PAYLOAD    │ CHECKSUM │
//! │  1–2 bytes  │  0..n bytes  │  1 byte  │
//! └─────────────┴──────────────┴──────────┘
//! ```
//!
//! Two-byte addresses travel little-endian. A reply frame carries the
//! origin address of the request with the master flag bit set, so every
//! participant can tell requests and responses apart without extra state.
//!
//! This crate holds the pieces shared by masters and slaves: address
//! arithmetic and the frame codec ([`wire`]), the two checksum algorithms
//! in use on the bus ([`checksum`]), the base-protocol command tables
//! ([`commands`]) and the UUID derivation used for address bootstrap
//! ([`uuid`]).

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod checksum;
pub mod commands;
pub mod uuid;
pub mod wire;

pub use checksum::ChecksumKind;
pub use uuid::{search_mask, uuid_from_key};
pub use wire::{build_frame, parse_frame, AddressWidth, WireError, MAX_FRAME_SIZE};
