//! Scripted collaborators for host tests.

use std::vec::Vec;

use crate::config::DeviceIdentity;
use crate::device::Device;
use crate::traits::{Application, Transport};

/// One recorded transport call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    TransmitByte(u8),
    LineDrive(bool),
    ReceiveEnabled(bool),
    SendReadyEnabled(bool),
    SendCompleteEnabled(bool),
    RestartTimeout,
    BeginProtected,
    EndProtected,
    SegmentEnabled(bool),
    ToggleHeartbeat,
    AssertBusLow,
}

/// Transport that records every call and mirrors the gating state, so
/// tests can both replay exact call sequences and poll the line state.
pub struct MockTransport {
    pub ops: Vec<Op>,
    pub receive_enabled: bool,
    pub line_drive: bool,
    pub send_ready_enabled: bool,
    pub send_complete_enabled: bool,
    pub segment_enabled: bool,
    pub heartbeat_toggles: usize,
    pub bus_assertions: usize,
    pub timeout_restarts: usize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            receive_enabled: true,
            line_drive: false,
            send_ready_enabled: false,
            send_complete_enabled: false,
            segment_enabled: true,
            heartbeat_toggles: 0,
            bus_assertions: 0,
            timeout_restarts: 0,
        }
    }

    /// Bytes pushed onto the wire so far.
    pub fn sent_bytes(&self) -> Vec<u8> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::TransmitByte(byte) => Some(*byte),
                _ => None,
            })
            .collect()
    }

    /// Clears and returns the recorded calls.
    pub fn take_ops(&mut self) -> Vec<Op> {
        core::mem::take(&mut self.ops)
    }
}

impl Transport for MockTransport {
    fn transmit_byte(&mut self, byte: u8) {
        self.ops.push(Op::TransmitByte(byte));
    }

    fn set_line_drive(&mut self, enabled: bool) {
        self.line_drive = enabled;
        self.ops.push(Op::LineDrive(enabled));
    }

    fn set_receive_enabled(&mut self, enabled: bool) {
        self.receive_enabled = enabled;
        self.ops.push(Op::ReceiveEnabled(enabled));
    }

    fn set_send_ready_enabled(&mut self, enabled: bool) {
        self.send_ready_enabled = enabled;
        self.ops.push(Op::SendReadyEnabled(enabled));
    }

    fn set_send_complete_enabled(&mut self, enabled: bool) {
        self.send_complete_enabled = enabled;
        self.ops.push(Op::SendCompleteEnabled(enabled));
    }

    fn restart_receive_timeout(&mut self) {
        self.timeout_restarts += 1;
        self.ops.push(Op::RestartTimeout);
    }

    fn begin_protected(&mut self) {
        self.ops.push(Op::BeginProtected);
    }

    fn end_protected(&mut self) {
        self.ops.push(Op::EndProtected);
    }

    fn set_segment_enabled(&mut self, enabled: bool) {
        self.segment_enabled = enabled;
        self.ops.push(Op::SegmentEnabled(enabled));
    }

    fn toggle_heartbeat(&mut self) {
        self.heartbeat_toggles += 1;
        self.ops.push(Op::ToggleHeartbeat);
    }

    fn assert_bus_low(&mut self) {
        self.bus_assertions += 1;
        self.ops.push(Op::AssertBusLow);
    }
}

/// Application that echoes every request and records whatever it sees.
#[derive(Default)]
pub struct EchoApplication {
    pub requests: Vec<Vec<u8>>,
    pub broadcasts: Vec<(Vec<u8>, u8)>,
    pub last_capacity: Option<usize>,
}

impl EchoApplication {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Application for EchoApplication {
    fn process_request(&mut self, payload: &[u8], response: &mut [u8]) -> Option<usize> {
        self.requests.push(payload.to_vec());
        self.last_capacity = Some(response.len());
        let len = payload.len().min(response.len());
        response[..len].copy_from_slice(&payload[..len]);
        Some(len)
    }

    fn process_broadcast(&mut self, payload: &[u8], protocol_id: u8) {
        self.broadcasts.push((payload.to_vec(), protocol_id));
    }
}

/// Identity shared by the engine tests.
pub fn test_identity() -> DeviceIdentity {
    DeviceIdentity {
        name: "demo",
        version: "1.0",
        protocol_id: 0x02,
        device_type: 0x17,
        uuid: 0xDEAD_BEEF,
    }
}

/// Feeds a complete frame followed by the idle gap.
pub fn feed_frame<T: Transport, A: Application, const N: usize>(
    device: &mut Device<T, A, N>,
    frame: &[u8],
) {
    for &byte in frame {
        device.on_byte_received(byte);
    }
    device.on_receive_timeout();
}

/// Runs the transmit notifications to completion and returns the bytes
/// that went out; empty when no transmission was started.
pub fn drain_reply<A: Application, const N: usize>(
    device: &mut Device<MockTransport, A, N>,
) -> Vec<u8> {
    let start = device.transport().ops.len();
    while device.transport().send_ready_enabled {
        device.on_send_ready();
    }
    if device.transport().send_complete_enabled {
        device.on_send_complete();
    }
    device.transport().ops[start..]
        .iter()
        .filter_map(|op| match op {
            Op::TransmitByte(byte) => Some(*byte),
            _ => None,
        })
        .collect()
}
