//! Collaborator traits implemented by the embedding.

/// Hardware access the engine needs: byte transmission, half-duplex line
/// control, notification gating and the receive idle timer.
///
/// Implementations are free to make the methods as cheap as possible; the
/// engine calls them from both of its execution contexts. The last three
/// methods cover optional hardware and default to doing nothing.
pub trait Transport {
    /// Hands one byte to the transmitter hardware.
    ///
    /// Called from [`Device::on_send_ready`](crate::Device::on_send_ready)
    /// only, so the transmitter is ready by contract.
    fn transmit_byte(&mut self, byte: u8);

    /// Claims or releases the shared line (driver enable on RS-485).
    fn set_line_drive(&mut self, enabled: bool);

    /// Gates the received-byte notification.
    fn set_receive_enabled(&mut self, enabled: bool);

    /// Gates the transmitter-ready notification.
    fn set_send_ready_enabled(&mut self, enabled: bool);

    /// Gates the transmission-complete notification.
    fn set_send_complete_enabled(&mut self, enabled: bool);

    /// Restarts the one-shot timer whose expiry delimits a frame.
    ///
    /// The timeout must exceed the worst-case gap between two bytes of one
    /// frame and undercut the enforced idle time between frames.
    fn restart_receive_timeout(&mut self);

    /// Enters the section protected from the preemptive context.
    ///
    /// Sections are tiny (a handful of loads and stores) and never nest.
    fn begin_protected(&mut self);

    /// Leaves the protected section.
    fn end_protected(&mut self);

    /// Connects or isolates the downstream bus segment (daisy-chained
    /// buses only).
    fn set_segment_enabled(&mut self, _enabled: bool) {}

    /// Toggles the heartbeat indicator.
    fn toggle_heartbeat(&mut self) {}

    /// Pulls the bus low in answer to a matching assertion request.
    fn assert_bus_low(&mut self) {}
}

/// Device-class protocol layered over the base protocol.
///
/// The engine strips addressing and checksum before calling in, and
/// appends them to whatever a request handler produces.
pub trait Application {
    /// Handles a request not claimed by the base protocol.
    ///
    /// `response` is the entire usable reply region; the returned length
    /// says how much of it to send. `None` sends nothing at all, which is
    /// distinct from `Some(0)`, an empty but addressed and checksummed
    /// reply.
    fn process_request(&mut self, payload: &[u8], response: &mut [u8]) -> Option<usize>;

    /// Handles a broadcast carrying `protocol_id`.
    ///
    /// Broadcasts are never answered; `protocol_id` is `0` for legacy
    /// broadcasts with no protocol selector.
    fn process_broadcast(&mut self, payload: &[u8], protocol_id: u8);
}

/// Application for devices that speak only the base protocol.
pub struct NoApplication;

impl Application for NoApplication {
    fn process_request(&mut self, _payload: &[u8], _response: &mut [u8]) -> Option<usize> {
        None
    }

    fn process_broadcast(&mut self, _payload: &[u8], _protocol_id: u8) {}
}
