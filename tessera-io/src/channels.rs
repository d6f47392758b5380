//! Channel state for the four IO kinds.

/// A digital input or output: one switched value with a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DigitalChannel {
    pub name: &'static str,
    pub value: bool,
}

impl DigitalChannel {
    pub const fn new(name: &'static str) -> Self {
        Self { name, value: false }
    }
}

/// An analog input: a raw reading plus the factor that scales it to a
/// physical quantity on the master side.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnalogChannel {
    pub name: &'static str,
    pub factor: f32,
    pub value: i16,
}

impl AnalogChannel {
    pub const fn new(name: &'static str, factor: f32) -> Self {
        Self {
            name,
            factor,
            value: 0,
        }
    }
}

/// A PWM output with rate-limited target tracking.
///
/// The bus sets `target`; [`IoBoard::service`](crate::IoBoard::service)
/// moves `value` toward it by at most `speed` per call. A speed of `0`
/// tracks immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmChannel {
    pub name: &'static str,
    pub frequency: u32,
    pub max_value: u16,
    pub speed: u16,
    pub value: u16,
    pub target: u16,
}

impl PwmChannel {
    pub const fn new(name: &'static str, frequency: u32, max_value: u16) -> Self {
        Self {
            name,
            frequency,
            max_value,
            speed: 0,
            value: 0,
            target: 0,
        }
    }

    /// One slew step toward the target.
    pub(crate) fn step(&mut self) {
        if self.speed == 0 {
            self.value = self.target;
        } else if self.value < self.target {
            self.value = self.value.saturating_add(self.speed).min(self.target);
        } else if self.value > self.target {
            self.value = self.value.saturating_sub(self.speed).max(self.target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_speed_tracks_immediately() {
        let mut pwm = PwmChannel::new("valve", 20_000, 1000);
        pwm.target = 800;
        pwm.step();
        assert_eq!(pwm.value, 800);
    }

    #[test]
    fn slew_is_bounded_per_step_in_both_directions() {
        let mut pwm = PwmChannel::new("valve", 20_000, 1000);
        pwm.speed = 300;
        pwm.target = 700;
        pwm.step();
        assert_eq!(pwm.value, 300);
        pwm.step();
        assert_eq!(pwm.value, 600);
        pwm.step();
        assert_eq!(pwm.value, 700); // clamped at the target

        pwm.target = 0;
        pwm.step();
        assert_eq!(pwm.value, 400);
        pwm.step();
        pwm.step();
        assert_eq!(pwm.value, 0);
    }
}
