//! Base-protocol command tables.
//!
//! Every slave implements the base protocol regardless of its device
//! class. Unicast requests select it with a leading `0x00` byte followed
//! by one of the `CMD_*` identifiers; broadcasts select it with the
//! [`ALL_DEVICES`] sentinel followed by one of the `BROADCAST_*`
//! identifiers. Anything else is handed to the device-class protocol.

/// First payload byte routing a unicast request to the base protocol.
pub const BASE_PROTOCOL: u8 = 0x00;

/// First payload byte routing a broadcast to every device class.
pub const ALL_DEVICES: u8 = 0x00;

// Base protocol requests, payload `[0x00, CMD_*]`
pub const CMD_DEVICE_NAME: u8 = 0x00;
pub const CMD_UPTIME: u8 = 0x01;
pub const CMD_VERSION_INFO: u8 = 0x02;
pub const CMD_PACKET_COUNT_CORRECT: u8 = 0x03;
pub const CMD_PACKET_COUNT_OVERFLOW: u8 = 0x04;
pub const CMD_PACKET_COUNT_LOST: u8 = 0x05;
pub const CMD_PACKET_COUNT_CHECKSUM: u8 = 0x06;
pub const CMD_PACKET_COUNT_ALL: u8 = 0x07;
pub const CMD_PACKET_COUNT_RESET: u8 = 0x08;
pub const CMD_UUID: u8 = 0x09;
pub const CMD_EXTENDED_INFO: u8 = 0x0A;

// Broadcasts to every device class, payload `[0x00, BROADCAST_*, ..]`
pub const BROADCAST_UUID: u8 = 0x00;
pub const BROADCAST_ENABLE_NEIGHBOURS: u8 = 0x01;
pub const BROADCAST_DISABLE_NEIGHBOURS: u8 = 0x02;
pub const BROADCAST_RESET_ADDRESSES: u8 = 0x03;
pub const BROADCAST_REQUEST_ASSERTION: u8 = 0x04;

// Sub-commands of a UUID-addressed broadcast, following the four UUID bytes
pub const UUID_ADDRESS: u8 = 0x00;
pub const UUID_RESET_ADDRESS: u8 = 0x01;

// Device-class protocol identifiers reported in the device info record
pub const PROTOCOL_ACTUATOR: u8 = 0x01;
pub const PROTOCOL_LOCATOR: u8 = 0x02;
pub const PROTOCOL_REMOTE_IO: u8 = 0x03;
pub const PROTOCOL_BOOTLOADER: u8 = 0x04;

/// Checksum tag carried in the device info record: the low nibble holds
/// the [`wire_id`](crate::ChecksumKind::wire_id), the high bits flag the
/// record layout revision that includes UUID and extended info lengths.
pub const INFO_LAYOUT_FLAGS: u8 = 0x88;
