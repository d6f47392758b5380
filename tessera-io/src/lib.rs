//! Remote IO board protocol for the Tessera field bus.
//!
//! A remote IO board exposes digital inputs, digital outputs, analog
//! inputs and PWM outputs over the bus: up to 16 channels of each kind,
//! each with a static label. The master discovers the channel layout
//! through count and metadata queries, then polls all inputs with a
//! single `sync` request and drives outputs by channel index.
//!
//! [`IoBoard`] implements the engine's
//! [`Application`](tessera_device::Application) trait, so a complete IO
//! device is an `IoBoard` plugged into a
//! [`Device`](tessera_device::Device). The embedding feeds measured
//! values in with the accessor methods, mirrors the output channels to
//! its pins, and calls [`IoBoard::service`] from its main loop to slew
//! PWM outputs toward their targets.

#![no_std]
#![deny(unsafe_code)]

pub mod board;
pub mod channels;
pub mod protocol;

pub use board::{BoardFull, IoBoard};
pub use channels::{AnalogChannel, DigitalChannel, PwmChannel};
