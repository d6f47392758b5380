//! IO board command identifiers.
//!
//! The first payload byte selects either one of the `CMD_*` queries or a
//! channel directly by its absolute index. Indexes partition into four
//! blocks of 16 by kind; the same absolute index addresses a channel in
//! name queries and in direct get/set requests.

pub const CMD_SYNC: u8 = 0x01;
pub const CMD_SYNC_SIZE: u8 = 0x02;
pub const CMD_DIGITAL_IN_COUNT: u8 = 0x03;
pub const CMD_DIGITAL_OUT_COUNT: u8 = 0x04;
pub const CMD_ANALOG_IN_COUNT: u8 = 0x05;
pub const CMD_ANALOG_RESOLUTION: u8 = 0x06;
pub const CMD_ANALOG_FACTOR: u8 = 0x07;
pub const CMD_PWM_COUNT: u8 = 0x08;
pub const CMD_PWM_FREQUENCY: u8 = 0x09;
pub const CMD_PWM_MAX_VALUE: u8 = 0x0A;
pub const CMD_PWM_SPEED: u8 = 0x0B;
pub const CMD_CHANNEL_NAME: u8 = 0x0C;
pub const CMD_CHANNEL_NAME_LENGTH: u8 = 0x0D;

// Absolute channel index blocks, 16 slots each
pub const DIGITAL_IN_BASE: u8 = 0x10;
pub const ANALOG_IN_BASE: u8 = 0x20;
pub const DIGITAL_OUT_BASE: u8 = 0x30;
pub const PWM_BASE: u8 = 0x40;

/// Slots per channel kind.
pub const CHANNELS_PER_KIND: usize = 16;
