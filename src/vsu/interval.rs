//! Duration (interval) timer
//!
//! One-shot counter that silences its channel once the programmed number of
//! duration clocks has elapsed. Also owns the channel's output-enable flag,
//! which the mixer consults every cycle.

/// Mask applied to interval setting writes (5 bits).
const INTERVAL_MASK: u32 = 0x1F;

/// Per-channel interval register.
#[derive(Debug, Clone, Default)]
pub struct IntervalRegister {
    output_enabled: bool,
    interval_enabled: bool,
    setting_value: u32,
    counter: u32,
}

impl IntervalRegister {
    /// Create a silent register with the timer off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch duration mode on or off.
    ///
    /// Any write makes the channel audible; enabling restarts the count.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.interval_enabled = enabled;
        self.output_enabled = true;

        if enabled {
            self.counter = 0;
        }
    }

    /// Store the duration setting (masked to 5 bits).
    pub fn set_setting(&mut self, value: u32) {
        self.setting_value = value & INTERVAL_MASK;
    }

    /// Force the channel output flag.
    pub(crate) fn set_output_enabled(&mut self, enabled: bool) {
        self.output_enabled = enabled;
    }

    /// Whether the channel currently reaches the mixer.
    #[inline]
    pub fn output_enabled(&self) -> bool {
        self.output_enabled
    }

    /// Whether duration mode is on.
    pub fn interval_enabled(&self) -> bool {
        self.interval_enabled
    }

    /// Stored duration setting.
    pub fn setting(&self) -> u32 {
        self.setting_value
    }

    /// Advance by one duration clock.
    pub fn tick(&mut self) {
        if self.output_enabled && self.interval_enabled {
            self.counter += 1;
            if self.counter > self.setting_value {
                self.output_enabled = false;
                tracing::trace!(setting = self.setting_value, "duration expired");
            }
        }
    }
}
