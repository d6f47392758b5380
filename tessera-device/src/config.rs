//! Construction-time device configuration.

use tessera_protocol::wire::UNASSIGNED_ADDRESS;
use tessera_protocol::{AddressWidth, ChecksumKind};

/// Bus-facing configuration, fixed for the lifetime of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    /// Bus address; [`UNASSIGNED_ADDRESS`] until the master assigns one.
    pub address: u16,
    /// Address bytes per frame, uniform across the bus.
    pub address_width: AddressWidth,
    /// Checksum algorithm, uniform across the bus.
    pub checksum: ChecksumKind,
    /// Frequency of [`on_tick`](crate::Device::on_tick) calls in Hz, or
    /// `0` when the embedding provides no tick source.
    pub uptime_frequency_hz: u16,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            address: UNASSIGNED_ADDRESS,
            address_width: AddressWidth::One,
            checksum: ChecksumKind::Crc8,
            uptime_frequency_hz: 0,
        }
    }
}

/// Static identity served by the base-protocol commands.
///
/// The UUID comes from [`uuid_from_key`](tessera_protocol::uuid_from_key)
/// over any per-chip constant (serial number, MAC, flash signature) and
/// must not be `0`. `protocol_id` must be nonzero; `0` selects the base
/// protocol on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceIdentity {
    pub name: &'static str,
    pub version: &'static str,
    pub protocol_id: u8,
    pub device_type: u8,
    pub uuid: u32,
}
