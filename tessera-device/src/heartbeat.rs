//! Heartbeat indicator cadence.

/// Blink cadence for the liveness indicator, derived from the uptime tick
/// frequency.
///
/// [`advance`](Self::advance) is called once per uptime tick (except while
/// a frame awaits processing, which freezes the cadence) and says whether
/// to toggle the indicator now. Three regimes:
///
/// * `f >= 12` Hz: every `f/12` ticks one of eight phases elapses; the
///   indicator toggles on phases 0 and 1, giving a short blink roughly
///   every two thirds of a second.
/// * `2 <= f < 12` Hz: plain toggling every `f/2` ticks.
/// * below 2 Hz: toggling on every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Heartbeat {
    cycle: u16,
    phase: u8,
}

impl Heartbeat {
    /// Advances the cadence by one tick of `frequency_hz`.
    ///
    /// Returns `true` when the indicator should toggle.
    pub fn advance(&mut self, frequency_hz: u16) -> bool {
        if frequency_hz >= 12 {
            self.cycle += 1;
            if self.cycle >= frequency_hz / 12 {
                self.cycle = 0;
                let toggle = self.phase <= 1;
                self.phase = (self.phase + 1) & 7;
                return toggle;
            }
            false
        } else if frequency_hz >= 2 {
            self.cycle += 1;
            if self.cycle >= frequency_hz / 2 {
                self.cycle = 0;
                return true;
            }
            false
        } else {
            true
        }
    }
}
