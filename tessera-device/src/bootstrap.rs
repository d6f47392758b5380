//! Broadcast dispatch and the address bootstrap protocol.
//!
//! Devices leave the factory with a UUID but no bus address. The master
//! assigns addresses over broadcasts: it either asks the one unaddressed
//! device on an isolated segment to identify itself, or it runs a binary
//! search over the UUID space using bus-assertion requests, to which
//! matching devices answer by pulling the line low instead of sending a
//! frame, so any number of them may answer at once without colliding.
//! UUID-addressed commands then assign, read back or clear the address of
//! exactly one device.

use tessera_protocol::commands;
use tessera_protocol::uuid::search_mask;
use tessera_protocol::wire::UNASSIGNED_ADDRESS;

use crate::device::Device;
use crate::traits::{Application, Transport};

impl<T: Transport, A: Application, const N: usize> Device<T, A, N> {
    /// Broadcast dispatch: legacy, own-protocol, or the all-devices
    /// command set.
    ///
    /// Only UUID-addressed commands ever produce a reply; its origin is
    /// the broadcast address, decided by the caller.
    pub(crate) fn handle_broadcast(&mut self, body_len: usize) -> Option<usize> {
        let addr_len = self.address_width.size();
        let payload_len = body_len - addr_len;

        if payload_len == 0 {
            // legacy broadcast without a protocol selector
            let Device { rx, application, .. } = self;
            application.process_broadcast(&rx[addr_len..body_len], 0);
            return None;
        }

        let selector = self.rx[addr_len];
        if selector == self.identity.protocol_id {
            let Device { rx, application, .. } = self;
            application.process_broadcast(&rx[addr_len + 1..body_len], selector);
            return None;
        }
        if selector != commands::ALL_DEVICES || payload_len < 2 {
            return None;
        }

        match self.rx[addr_len + 1] {
            commands::BROADCAST_UUID => self.uuid_broadcast(body_len),
            commands::BROADCAST_ENABLE_NEIGHBOURS => {
                self.transport.set_segment_enabled(true);
                None
            }
            commands::BROADCAST_DISABLE_NEIGHBOURS => {
                self.transport.set_segment_enabled(false);
                None
            }
            commands::BROADCAST_RESET_ADDRESSES => {
                self.address = UNASSIGNED_ADDRESS;
                None
            }
            commands::BROADCAST_REQUEST_ASSERTION => {
                self.assertion_request(body_len);
                None
            }
            _ => None,
        }
    }

    /// The UUID command: anonymous ping, or sub-commands addressed to
    /// exactly one device by its UUID.
    fn uuid_broadcast(&mut self, body_len: usize) -> Option<usize> {
        let addr_len = self.address_width.size();
        let payload_len = body_len - addr_len;

        if payload_len == 2 {
            // anonymous discovery ping; only devices without an address
            // answer, so an isolated fresh device identifies itself
            if self.address == UNASSIGNED_ADDRESS {
                return Some(self.write_u32_reply(self.identity.uuid));
            }
            return None;
        }
        if payload_len < 6 {
            return None;
        }

        let uuid = u32::from_le_bytes([
            self.rx[addr_len + 2],
            self.rx[addr_len + 3],
            self.rx[addr_len + 4],
            self.rx[addr_len + 5],
        ]);
        if uuid != self.identity.uuid {
            return None;
        }

        if payload_len == 6 {
            return Some(0);
        }
        if payload_len == 7 {
            return match self.rx[addr_len + 6] {
                commands::UUID_ADDRESS => Some(self.write_address_reply()),
                commands::UUID_RESET_ADDRESS => {
                    self.address = UNASSIGNED_ADDRESS;
                    Some(0)
                }
                _ => None,
            };
        }
        if payload_len == 7 + addr_len && self.rx[addr_len + 6] == commands::UUID_ADDRESS {
            return Some(self.set_address_from_frame());
        }
        None
    }

    fn write_address_reply(&mut self) -> usize {
        let width = self.address_width;
        let addr_len = width.size();
        let address = self.address;
        width.encode(address, &mut self.tx[addr_len..addr_len + addr_len]);
        addr_len
    }

    /// Assigns the address carried after the sub-command byte. The reply
    /// is one byte: `1` on success, `0` for a reserved value.
    fn set_address_from_frame(&mut self) -> usize {
        let width = self.address_width;
        let addr_len = width.size();
        let requested = width.decode(&self.rx[addr_len + 7..]);
        let accepted =
            requested != UNASSIGNED_ADDRESS && requested < width.master_flag();
        if accepted {
            self.address = requested;
        }
        self.tx[addr_len] = accepted as u8;
        1
    }

    /// Pulls the bus low when the masked UUID matches the requested
    /// pattern. Never a frame reply.
    fn assertion_request(&mut self, body_len: usize) {
        let addr_len = self.address_width.size();
        let payload_len = body_len - addr_len;
        if payload_len < 3 {
            return;
        }
        let bits = self.rx[addr_len + 2];
        if bits == 0 || bits > 32 {
            return;
        }

        // up to four pattern bytes; missing high bytes read as zero
        let mut pattern = [0u8; 4];
        let given = (payload_len - 3).min(4);
        pattern[..given].copy_from_slice(&self.rx[addr_len + 3..addr_len + 3 + given]);
        let pattern = u32::from_le_bytes(pattern);

        if self.identity.uuid & search_mask(bits) == pattern {
            self.transport.assert_bus_low();
        }
    }
}
