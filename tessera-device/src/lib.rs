//! Slave-side engine for the Tessera field bus.
//!
//! The engine turns a stream of raw bus bytes into dispatched requests and
//! broadcast commands, and produces checksummed replies with half-duplex
//! line turnaround. It owns no hardware: the embedding implements the
//! [`Transport`] trait (byte IO, line direction, notification gating, the
//! receive idle timer) and wires the engine's entry points to its own
//! interrupt handlers and main loop.
//!
//! Two execution contexts share the engine:
//!
//! * a *preemptive* context (interrupt handlers in a typical embedding)
//!   feeding [`Device::on_byte_received`], [`Device::on_receive_timeout`],
//!   [`Device::on_send_ready`], [`Device::on_send_complete`] and
//!   [`Device::on_tick`];
//! * a *cooperative* context calling [`Device::process`] from its main
//!   loop.
//!
//! The two meet in a single pending-frame slot. The engine brackets its
//! access with [`Transport::begin_protected`]/[`Transport::end_protected`]
//! and suspends reception while a frame is borrowed, so an embedding that
//! makes those calls effective (masking interrupts, a critical section)
//! gets race freedom without any further locking. A frame completed while
//! the previous one was still unconsumed replaces it and is counted as
//! lost, never queued.
//!
//! Everything here is `no_std`; host tests drive the entry points
//! sequentially against a scripted transport.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

mod bootstrap;
mod config;
mod counters;
mod device;
mod heartbeat;
mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{DeviceConfig, DeviceIdentity};
pub use counters::PacketCounters;
pub use device::{Device, MIN_BUFFER};
pub use heartbeat::Heartbeat;
pub use traits::{Application, NoApplication, Transport};

pub use tessera_protocol::{AddressWidth, ChecksumKind};
