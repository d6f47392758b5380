//! The IO board application.

use heapless::Vec;
use tessera_device::{AddressWidth, Application, ChecksumKind};

use crate::channels::{AnalogChannel, DigitalChannel, PwmChannel};
use crate::protocol;

/// Returned when a channel would not fit its 16 slot block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardFull;

/// A remote IO board: the channel table plus the framing parameters it
/// needs to report its own sync reply size.
///
/// Channels are registered once at startup; their slot order fixes both
/// the absolute bus index and the bit position in the sync mask.
pub struct IoBoard {
    address_width: AddressWidth,
    checksum: ChecksumKind,
    analog_resolution: u8,
    digital_inputs: Vec<DigitalChannel, { protocol::CHANNELS_PER_KIND }>,
    digital_outputs: Vec<DigitalChannel, { protocol::CHANNELS_PER_KIND }>,
    analog_inputs: Vec<AnalogChannel, { protocol::CHANNELS_PER_KIND }>,
    pwm_outputs: Vec<PwmChannel, { protocol::CHANNELS_PER_KIND }>,
}

impl IoBoard {
    /// An empty board. The width and checksum must match the device the
    /// board is plugged into; `analog_resolution` is the ADC bit depth
    /// reported to the master.
    pub fn new(address_width: AddressWidth, checksum: ChecksumKind, analog_resolution: u8) -> Self {
        Self {
            address_width,
            checksum,
            analog_resolution,
            digital_inputs: Vec::new(),
            digital_outputs: Vec::new(),
            analog_inputs: Vec::new(),
            pwm_outputs: Vec::new(),
        }
    }

    pub fn add_digital_input(&mut self, channel: DigitalChannel) -> Result<(), BoardFull> {
        self.digital_inputs.push(channel).map_err(|_| BoardFull)
    }

    pub fn add_digital_output(&mut self, channel: DigitalChannel) -> Result<(), BoardFull> {
        self.digital_outputs.push(channel).map_err(|_| BoardFull)
    }

    pub fn add_analog_input(&mut self, channel: AnalogChannel) -> Result<(), BoardFull> {
        self.analog_inputs.push(channel).map_err(|_| BoardFull)
    }

    pub fn add_pwm_output(&mut self, channel: PwmChannel) -> Result<(), BoardFull> {
        self.pwm_outputs.push(channel).map_err(|_| BoardFull)
    }

    /// Feeds a measured digital level; out of range slots are ignored.
    pub fn set_digital_input(&mut self, slot: usize, value: bool) {
        if let Some(channel) = self.digital_inputs.get_mut(slot) {
            channel.value = value;
        }
    }

    /// Feeds a measured analog reading; out of range slots are ignored.
    pub fn set_analog_input(&mut self, slot: usize, value: i16) {
        if let Some(channel) = self.analog_inputs.get_mut(slot) {
            channel.value = value;
        }
    }

    /// Level commanded for a digital output.
    pub fn digital_output(&self, slot: usize) -> Option<bool> {
        self.digital_outputs.get(slot).map(|channel| channel.value)
    }

    /// Current (slewed) value of a PWM output.
    pub fn pwm_value(&self, slot: usize) -> Option<u16> {
        self.pwm_outputs.get(slot).map(|channel| channel.value)
    }

    /// All PWM channels, for mirroring to the hardware.
    pub fn pwm_outputs(&self) -> &[PwmChannel] {
        &self.pwm_outputs
    }

    /// All digital output channels, for mirroring to the hardware.
    pub fn digital_outputs(&self) -> &[DigitalChannel] {
        &self.digital_outputs
    }

    /// One main loop step: slews every PWM output toward its target.
    pub fn service(&mut self) {
        for channel in &mut self.pwm_outputs {
            channel.step();
        }
    }

    /// Payload bytes of a sync reply: the input mask (only when digital
    /// inputs exist) followed by one i16 per analog input.
    fn sync_payload_len(&self) -> usize {
        let mask = if self.digital_inputs.is_empty() { 0 } else { 2 };
        mask + 2 * self.analog_inputs.len()
    }

    /// On-wire size of a complete sync reply frame.
    fn sync_frame_size(&self) -> usize {
        self.sync_payload_len() + self.address_width.size() + self.checksum.width()
    }

    fn write_sync(&self, response: &mut [u8]) -> Option<usize> {
        let len = self.sync_payload_len();
        if response.len() < len {
            return None;
        }
        let mut offset = 0;
        if !self.digital_inputs.is_empty() {
            let mut mask: u16 = 0;
            for (bit, channel) in self.digital_inputs.iter().enumerate() {
                if channel.value {
                    mask |= 1 << bit;
                }
            }
            response[0..2].copy_from_slice(&mask.to_le_bytes());
            offset = 2;
        }
        for channel in &self.analog_inputs {
            response[offset..offset + 2].copy_from_slice(&channel.value.to_le_bytes());
            offset += 2;
        }
        Some(offset)
    }

    fn channel_name(&self, index: u8) -> Option<&'static str> {
        let slot = (index & 0x0F) as usize;
        match index & 0xF0 {
            protocol::DIGITAL_IN_BASE => self.digital_inputs.get(slot).map(|c| c.name),
            protocol::ANALOG_IN_BASE => self.analog_inputs.get(slot).map(|c| c.name),
            protocol::DIGITAL_OUT_BASE => self.digital_outputs.get(slot).map(|c| c.name),
            protocol::PWM_BASE => self.pwm_outputs.get(slot).map(|c| c.name),
            _ => None,
        }
    }

    fn analog_at(&self, index: u8) -> Option<&AnalogChannel> {
        if index & 0xF0 != protocol::ANALOG_IN_BASE {
            return None;
        }
        self.analog_inputs.get((index & 0x0F) as usize)
    }

    fn pwm_at(&self, index: u8) -> Option<&PwmChannel> {
        if index & 0xF0 != protocol::PWM_BASE {
            return None;
        }
        self.pwm_outputs.get((index & 0x0F) as usize)
    }

    fn pwm_at_mut(&mut self, index: u8) -> Option<&mut PwmChannel> {
        if index & 0xF0 != protocol::PWM_BASE {
            return None;
        }
        self.pwm_outputs.get_mut((index & 0x0F) as usize)
    }

    /// Output access by absolute index: a set is an exact length match,
    /// anything else reads back. Input indexes are not addressable here;
    /// inputs only travel in the sync reply.
    fn channel_request(&mut self, index: u8, args: &[u8], response: &mut [u8]) -> Option<usize> {
        let slot = (index & 0x0F) as usize;
        match index & 0xF0 {
            protocol::DIGITAL_OUT_BASE => {
                let channel = self.digital_outputs.get_mut(slot)?;
                if args.len() == 1 {
                    channel.value = args[0] != 0;
                    Some(0)
                } else {
                    response[0] = channel.value as u8;
                    Some(1)
                }
            }
            protocol::PWM_BASE => {
                let channel = self.pwm_outputs.get_mut(slot)?;
                if args.len() == 2 {
                    channel.target = u16::from_le_bytes([args[0], args[1]]);
                    Some(0)
                } else {
                    // readback follows the set path: the target, not the
                    // slewed value
                    response[..2].copy_from_slice(&channel.target.to_le_bytes());
                    Some(2)
                }
            }
            _ => None,
        }
    }
}

impl Application for IoBoard {
    fn process_request(&mut self, payload: &[u8], response: &mut [u8]) -> Option<usize> {
        let (&command, args) = payload.split_first()?;
        // queries dispatch on the command byte alone; trailing bytes are
        // ignored
        match command {
            protocol::CMD_SYNC => self.write_sync(response),
            protocol::CMD_SYNC_SIZE => {
                response[0] = self.sync_frame_size() as u8;
                Some(1)
            }
            protocol::CMD_DIGITAL_IN_COUNT => {
                response[0] = self.digital_inputs.len() as u8;
                Some(1)
            }
            protocol::CMD_DIGITAL_OUT_COUNT => {
                response[0] = self.digital_outputs.len() as u8;
                Some(1)
            }
            protocol::CMD_ANALOG_IN_COUNT => {
                response[0] = self.analog_inputs.len() as u8;
                Some(1)
            }
            protocol::CMD_ANALOG_RESOLUTION => {
                response[0] = self.analog_resolution;
                Some(1)
            }
            protocol::CMD_PWM_COUNT => {
                response[0] = self.pwm_outputs.len() as u8;
                Some(1)
            }
            protocol::CMD_ANALOG_FACTOR if args.len() == 1 => {
                let channel = self.analog_at(args[0])?;
                response[..4].copy_from_slice(&channel.factor.to_le_bytes());
                Some(4)
            }
            protocol::CMD_PWM_FREQUENCY if args.len() == 1 => {
                let channel = self.pwm_at(args[0])?;
                response[..4].copy_from_slice(&channel.frequency.to_le_bytes());
                Some(4)
            }
            protocol::CMD_PWM_MAX_VALUE if args.len() == 1 => {
                let channel = self.pwm_at(args[0])?;
                response[..2].copy_from_slice(&channel.max_value.to_le_bytes());
                Some(2)
            }
            protocol::CMD_PWM_SPEED => {
                let (&index, rest) = args.split_first()?;
                let channel = self.pwm_at_mut(index)?;
                if rest.len() == 2 {
                    channel.speed = u16::from_le_bytes([rest[0], rest[1]]);
                    Some(0)
                } else {
                    let speed = channel.speed;
                    response[..2].copy_from_slice(&speed.to_le_bytes());
                    Some(2)
                }
            }
            protocol::CMD_CHANNEL_NAME if args.len() == 1 => {
                let name = self.channel_name(args[0])?.as_bytes();
                let len = name.len().min(response.len());
                response[..len].copy_from_slice(&name[..len]);
                Some(len)
            }
            protocol::CMD_CHANNEL_NAME_LENGTH if args.len() == 1 => {
                let name = self.channel_name(args[0])?;
                // advertise no more than a name read can deliver
                response[0] = name.len().min(response.len()).min(255) as u8;
                Some(1)
            }
            _ => self.channel_request(command, args, response),
        }
    }

    fn process_broadcast(&mut self, _payload: &[u8], _protocol_id: u8) {
        // the IO protocol defines no broadcasts
    }
}
