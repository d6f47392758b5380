//! The device engine: reception, frame handoff, dispatch, transmission.

use tessera_protocol::commands;
use tessera_protocol::{AddressWidth, ChecksumKind};

use crate::config::{DeviceConfig, DeviceIdentity};
use crate::counters::PacketCounters;
use crate::heartbeat::Heartbeat;
use crate::traits::{Application, Transport};

/// Smallest allowed buffer parameter: the 16 byte combined-counter reply
/// plus worst-case address and checksum overhead.
pub const MIN_BUFFER: usize = 19;

/// One bus device: owns the buffers, the diagnostic state and the two
/// collaborators, and exposes the entry points both execution contexts
/// drive.
///
/// `N` sizes the receive and transmit buffers and bounds the whole frame,
/// address and checksum included; construction fails to compile for `N`
/// below [`MIN_BUFFER`]. Frames that outgrow the buffer are counted and
/// dropped, never truncated.
///
/// The preemptive entry points ([`on_byte_received`](Self::on_byte_received),
/// [`on_receive_timeout`](Self::on_receive_timeout),
/// [`on_send_ready`](Self::on_send_ready),
/// [`on_send_complete`](Self::on_send_complete), [`on_tick`](Self::on_tick))
/// must never run concurrently with each other or preempt
/// [`process`](Self::process) outside the transport's protected section;
/// mapping them onto equal-priority interrupts gives exactly that. The
/// embedding brings the line up in receive mode before feeding bytes.
pub struct Device<T: Transport, A: Application, const N: usize> {
    pub(crate) transport: T,
    pub(crate) application: A,
    pub(crate) address: u16,
    pub(crate) address_width: AddressWidth,
    pub(crate) checksum: ChecksumKind,
    pub(crate) uptime_frequency: u16,
    pub(crate) identity: DeviceIdentity,

    // receive side, written by the preemptive context
    pub(crate) rx: [u8; N],
    pub(crate) rx_len: usize,
    pub(crate) pending_len: usize,
    pub(crate) frame_overflow: bool,
    pub(crate) lost_pending: bool,
    pub(crate) overflow_pending: bool,

    // transmit side
    pub(crate) tx: [u8; N],
    pub(crate) tx_len: usize,
    pub(crate) tx_pos: usize,

    // diagnostics
    pub(crate) counters: PacketCounters,
    pub(crate) uptime_ticks: u32,
    pub(crate) heartbeat: Heartbeat,
    pub(crate) heartbeat_blocked: bool,
}

impl<T: Transport, A: Application, const N: usize> Device<T, A, N> {
    /// Creates a device from its collaborators and configuration.
    pub fn new(
        transport: T,
        application: A,
        config: DeviceConfig,
        identity: DeviceIdentity,
    ) -> Self {
        const {
            assert!(
                N >= MIN_BUFFER,
                "buffer must hold the largest base-protocol reply"
            )
        }
        Self {
            transport,
            application,
            address: config.address,
            address_width: config.address_width,
            checksum: config.checksum,
            uptime_frequency: config.uptime_frequency_hz,
            identity,
            rx: [0; N],
            rx_len: 0,
            pending_len: 0,
            frame_overflow: false,
            lost_pending: false,
            overflow_pending: false,
            tx: [0; N],
            tx_len: 0,
            tx_pos: 0,
            counters: PacketCounters::default(),
            uptime_ticks: 0,
            heartbeat: Heartbeat::default(),
            heartbeat_blocked: false,
        }
    }

    /// Current bus address; `0` while unassigned.
    pub fn address(&self) -> u16 {
        self.address
    }

    /// The device UUID.
    pub fn uuid(&self) -> u32 {
        self.identity.uuid
    }

    /// Snapshot of the packet counters.
    pub fn counters(&self) -> PacketCounters {
        self.counters
    }

    /// Ticks elapsed since construction.
    pub fn uptime(&self) -> u32 {
        self.uptime_ticks
    }

    /// Usable reply payload bytes per frame.
    pub fn response_capacity(&self) -> usize {
        N - self.address_width.size() - self.checksum.width()
    }

    /// The transport collaborator.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The application collaborator.
    pub fn application(&self) -> &A {
        &self.application
    }

    /// Mutable access to the application, for feeding inputs and mirroring
    /// outputs between frames.
    pub fn application_mut(&mut self) -> &mut A {
        &mut self.application
    }

    /// Accepts one received byte. Preemptive context.
    pub fn on_byte_received(&mut self, byte: u8) {
        // a byte arriving while a frame is still unconsumed supersedes it
        if self.pending_len != 0 {
            self.pending_len = 0;
            self.lost_pending = true;
        }

        if self.rx_len >= N {
            self.rx_len = 0;
            if !self.frame_overflow {
                // only on the first wrap are the leading address bytes
                // still those of the oversized frame
                if self.frame_is_addressed_to_us() {
                    self.overflow_pending = true;
                }
            }
            self.frame_overflow = true;
        }

        self.rx[self.rx_len] = byte;
        self.rx_len += 1;

        self.transport.restart_receive_timeout();
    }

    /// Finalizes the frame delimited by the expired idle timer.
    /// Preemptive context.
    pub fn on_receive_timeout(&mut self) {
        if self.lost_pending {
            self.lost_pending = false;
            self.counters.lost = self.counters.lost.wrapping_add(1);
        }
        if self.overflow_pending {
            self.overflow_pending = false;
            self.counters.overflow = self.counters.overflow.wrapping_add(1);
        }

        if !self.frame_overflow
            && self.rx_len > self.address_width.size()
            && self.frame_is_addressed_to_us()
        {
            self.pending_len = self.rx_len;
            self.heartbeat_blocked = true;
        }

        // the buffered bytes stay readable for processing; only the
        // watermark restarts
        self.rx_len = 0;
        self.frame_overflow = false;
    }

    /// Feeds the transmitter one byte. Preemptive context, enabled only
    /// while a reply is going out.
    pub fn on_send_ready(&mut self) {
        if self.tx_pos >= self.tx_len {
            return;
        }
        self.transport.transmit_byte(self.tx[self.tx_pos]);
        self.tx_pos += 1;
        if self.tx_pos == self.tx_len {
            self.transport.set_send_ready_enabled(false);
            self.transport.set_send_complete_enabled(true);
        }
    }

    /// Releases the line once the last byte has left the wire.
    /// Preemptive context.
    pub fn on_send_complete(&mut self) {
        self.transport.set_line_drive(false);
        self.transport.set_send_complete_enabled(false);
        self.transport.set_receive_enabled(true);
    }

    /// Advances uptime and the heartbeat cadence. Preemptive context, one
    /// call per period of the configured tick frequency.
    pub fn on_tick(&mut self) {
        self.uptime_ticks = self.uptime_ticks.wrapping_add(1);
        if !self.heartbeat_blocked && self.heartbeat.advance(self.uptime_frequency) {
            self.transport.toggle_heartbeat();
        }
    }

    /// Services a pending frame, if any. Cooperative context; returns
    /// immediately when idle.
    ///
    /// Reception stays suspended from the protected handoff until the
    /// frame turns out to need no reply, or until the reply's
    /// transmission completes, so the receive buffer cannot change under
    /// a borrowed payload.
    pub fn process(&mut self) {
        self.transport.begin_protected();
        let len = self.pending_len;
        if len == 0 {
            self.transport.end_protected();
            return;
        }
        self.pending_len = 0;
        self.transport.set_receive_enabled(false);
        self.heartbeat_blocked = false;
        self.transport.end_protected();

        let body_len = len - self.checksum.width();
        if !self.checksum.verify(&self.rx[..body_len], self.rx[body_len]) {
            self.counters.checksum_mismatch = self.counters.checksum_mismatch.wrapping_add(1);
            self.transport.set_receive_enabled(true);
            return;
        }
        self.counters.correct = self.counters.correct.wrapping_add(1);

        let destination = self.address_width.decode(&self.rx);
        let reply = if destination == self.address_width.broadcast() {
            let origin = destination;
            self.handle_broadcast(body_len).map(|len| (origin, len))
        } else {
            self.handle_request(body_len).map(|len| (self.address, len))
        };

        match reply {
            Some((origin, reply_len)) => self.start_transmission(origin, reply_len),
            None => self.transport.set_receive_enabled(true),
        }
    }

    pub(crate) fn frame_is_addressed_to_us(&self) -> bool {
        let destination = self.address_width.decode(&self.rx);
        destination == self.address || destination == self.address_width.broadcast()
    }

    /// Unicast dispatch: ping, base protocol, or the application.
    fn handle_request(&mut self, body_len: usize) -> Option<usize> {
        let addr_len = self.address_width.size();
        if body_len == addr_len {
            return Some(0);
        }
        if self.rx[addr_len] == commands::BASE_PROTOCOL {
            return self.base_request(body_len);
        }
        let trailer = self.checksum.width();
        let Device {
            rx,
            tx,
            application,
            ..
        } = self;
        application.process_request(&rx[addr_len..body_len], &mut tx[addr_len..N - trailer])
    }

    fn base_request(&mut self, body_len: usize) -> Option<usize> {
        let addr_len = self.address_width.size();
        match body_len - addr_len {
            1 => Some(self.write_device_info()),
            2 => self.base_command(self.rx[addr_len + 1]),
            _ => None,
        }
    }

    fn base_command(&mut self, command: u8) -> Option<usize> {
        match command {
            commands::CMD_DEVICE_NAME => Some(self.write_str_reply(self.identity.name)),
            commands::CMD_UPTIME => Some(self.write_u32_reply(self.uptime_ticks)),
            commands::CMD_VERSION_INFO => Some(self.write_str_reply(self.identity.version)),
            commands::CMD_PACKET_COUNT_CORRECT => Some(self.write_u32_reply(self.counters.correct)),
            commands::CMD_PACKET_COUNT_OVERFLOW => {
                Some(self.write_u32_reply(self.counters.overflow))
            }
            commands::CMD_PACKET_COUNT_LOST => Some(self.write_u32_reply(self.counters.lost)),
            commands::CMD_PACKET_COUNT_CHECKSUM => {
                Some(self.write_u32_reply(self.counters.checksum_mismatch))
            }
            commands::CMD_PACKET_COUNT_ALL => {
                let combined = self.counters.to_le_bytes();
                Some(self.write_bytes_reply(&combined))
            }
            commands::CMD_PACKET_COUNT_RESET => {
                self.counters.reset();
                Some(0)
            }
            commands::CMD_UUID => Some(self.write_u32_reply(self.identity.uuid)),
            commands::CMD_EXTENDED_INFO => Some(self.write_extended_info()),
            _ => None,
        }
    }

    /// The fixed 11 byte device info record.
    fn write_device_info(&mut self) -> usize {
        let protocol_id = self.identity.protocol_id;
        let device_type = self.identity.device_type;
        let checksum_tag = self.checksum.wire_id() | commands::INFO_LAYOUT_FLAGS;
        let extended_len = self.extended_info_len() as u16;
        let uuid = self.identity.uuid;
        let frequency = self.uptime_frequency;

        let start = self.address_width.size();
        let info = &mut self.tx[start..start + 11];
        info[0] = protocol_id;
        info[1] = device_type;
        info[2] = checksum_tag;
        info[3..5].copy_from_slice(&extended_len.to_le_bytes());
        info[5..9].copy_from_slice(&uuid.to_le_bytes());
        info[9..11].copy_from_slice(&frequency.to_le_bytes());
        11
    }

    /// Extended info: name and version lengths, reply capacity, then the
    /// strings themselves, truncated in that order to fit one frame.
    fn write_extended_info(&mut self) -> usize {
        let name = self.identity.name.as_bytes();
        let version = self.identity.version.as_bytes();
        let capacity = self.response_capacity();
        let name_len = name.len().min(capacity - 4).min(255);
        let version_len = version.len().min(capacity - 4 - name_len).min(255);

        let start = self.address_width.size();
        let reply = &mut self.tx[start..start + 4 + name_len + version_len];
        reply[0] = name_len as u8;
        reply[1] = version_len as u8;
        reply[2..4].copy_from_slice(&(capacity as u16).to_le_bytes());
        reply[4..4 + name_len].copy_from_slice(&name[..name_len]);
        reply[4 + name_len..].copy_from_slice(&version[..version_len]);
        4 + name_len + version_len
    }

    /// Length advertised for the extended info record.
    fn extended_info_len(&self) -> usize {
        let full = 4 + self.identity.name.len() + self.identity.version.len();
        full.min(self.response_capacity())
    }

    fn write_str_reply(&mut self, text: &str) -> usize {
        let start = self.address_width.size();
        let len = text.len().min(self.response_capacity());
        self.tx[start..start + len].copy_from_slice(&text.as_bytes()[..len]);
        len
    }

    pub(crate) fn write_u32_reply(&mut self, value: u32) -> usize {
        let start = self.address_width.size();
        self.tx[start..start + 4].copy_from_slice(&value.to_le_bytes());
        4
    }

    fn write_bytes_reply(&mut self, bytes: &[u8]) -> usize {
        let start = self.address_width.size();
        self.tx[start..start + bytes.len()].copy_from_slice(bytes);
        bytes.len()
    }

    /// Finalizes the reply in the transmit buffer and claims the line.
    ///
    /// `reply_len` bytes of payload are in place after the reserved
    /// address prefix; the origin decides the reply address (own address
    /// for unicast, the broadcast value for UUID-addressed broadcasts).
    fn start_transmission(&mut self, origin: u16, reply_len: usize) {
        let width = self.address_width;
        let addr_len = width.size();
        width.encode(width.reply_address(origin), &mut self.tx[..addr_len]);
        let body_len = addr_len + reply_len;
        self.tx[body_len] = self.checksum.compute(&self.tx[..body_len]);
        self.tx_len = body_len + self.checksum.width();
        self.tx_pos = 0;

        self.transport.set_receive_enabled(false);
        self.transport.set_line_drive(true);
        self.transport.set_send_ready_enabled(true);
    }
}
