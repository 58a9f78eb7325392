//! VSU Envelope Generator
//!
//! Every channel carries a 4-bit volume ramp. When enabled, the level steps
//! once every `step_interval + 1` envelope clocks towards 15 (grow) or 0
//! (decay). Reaching the bound either holds the level or, with repeat set,
//! reloads it from the reload register for a cyclic ramp.

use super::constants::MAX_LEVEL;

/// Ramp direction of an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvelopeDirection {
    /// Level decreases towards 0
    #[default]
    Down,
    /// Level increases towards 15
    Up,
}

impl EnvelopeDirection {
    /// Direction from a register bit (non-zero = grow).
    pub fn from_bit(up: bool) -> Self {
        if up {
            EnvelopeDirection::Up
        } else {
            EnvelopeDirection::Down
        }
    }
}

/// Per-channel envelope generator state.
#[derive(Debug, Clone, Default)]
pub struct Envelope {
    reload: u8,
    direction: EnvelopeDirection,
    step_interval: u32,
    repeat: bool,
    enabled: bool,
    level: u8,
    counter: u32,
}

impl Envelope {
    /// Create an envelope at level 0, disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the reload value and re-trigger the live level to it.
    pub fn set_reload(&mut self, value: u8) {
        self.reload = value & MAX_LEVEL;
        self.level = self.reload;
    }

    /// Set the ramp direction.
    pub fn set_direction(&mut self, direction: EnvelopeDirection) {
        self.direction = direction;
    }

    /// Set the number of extra envelope clocks between level changes.
    pub fn set_step_interval(&mut self, value: u32) {
        self.step_interval = value;
    }

    /// Select cyclic (repeat) or one-shot behaviour at the ramp bound.
    pub fn set_repeat(&mut self, repeat: bool) {
        self.repeat = repeat;
    }

    /// Enable or disable ramping. Either edge reloads the level.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.level = self.reload;
    }

    /// Restart the step counter without touching the level.
    pub(crate) fn reset_counter(&mut self) {
        self.counter = 0;
    }

    /// Current level (0-15).
    #[inline]
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Configured reload value.
    pub fn reload(&self) -> u8 {
        self.reload
    }

    /// Whether the ramp is running.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Advance by one envelope clock.
    pub fn tick(&mut self) {
        if !self.enabled {
            return;
        }

        self.counter += 1;
        if self.counter <= self.step_interval {
            return;
        }
        self.counter = 0;

        match self.direction {
            EnvelopeDirection::Up if self.level < MAX_LEVEL => self.level += 1,
            EnvelopeDirection::Down if self.level > 0 => self.level -= 1,
            _ => {
                if self.repeat {
                    self.level = self.reload;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(reload: u8, direction: EnvelopeDirection, step: u32, repeat: bool) -> Envelope {
        let mut env = Envelope::new();
        env.set_reload(reload);
        env.set_direction(direction);
        env.set_step_interval(step);
        env.set_repeat(repeat);
        env.set_enabled(true);
        env
    }

    #[test]
    fn test_reload_write_retriggers_level() {
        let mut env = Envelope::new();
        env.set_reload(9);
        assert_eq!(env.level(), 9);
        env.set_reload(3);
        assert_eq!(env.level(), 3, "Writing reload must force the live level");
    }

    #[test]
    fn test_reload_masked_to_four_bits() {
        let mut env = Envelope::new();
        env.set_reload(0x1C);
        assert_eq!(env.level(), 0x0C);
    }

    #[test]
    fn test_enable_forces_reload_level() {
        let mut env = envelope(4, EnvelopeDirection::Up, 0, false);
        for _ in 0..20 {
            env.tick();
        }
        assert_eq!(env.level(), 15);

        env.set_enabled(true);
        assert_eq!(env.level(), 4, "Enable should re-trigger from reload");
    }

    #[test]
    fn test_disabled_envelope_holds() {
        let mut env = Envelope::new();
        env.set_reload(15);
        env.set_step_interval(0);
        for _ in 0..100 {
            env.tick();
        }
        assert_eq!(env.level(), 15);
    }

    #[test]
    fn test_step_interval_sets_period() {
        let mut env = envelope(0, EnvelopeDirection::Up, 3, false);
        for _ in 0..3 {
            env.tick();
            assert_eq!(env.level(), 0);
        }
        env.tick();
        assert_eq!(env.level(), 1, "Level changes on tick step_interval + 1");
        for _ in 0..4 {
            env.tick();
        }
        assert_eq!(env.level(), 2);
    }

    #[test]
    fn test_one_shot_attack_pins_at_max() {
        let mut env = envelope(0, EnvelopeDirection::Up, 1, false);
        let mut previous = env.level();
        for _ in 0..200 {
            env.tick();
            assert!(env.level() >= previous, "Attack must never decrease");
            previous = env.level();
        }
        assert_eq!(env.level(), 15);
    }

    #[test]
    fn test_one_shot_decay_holds_at_zero() {
        let mut env = envelope(5, EnvelopeDirection::Down, 0, false);
        for _ in 0..50 {
            env.tick();
        }
        assert_eq!(env.level(), 0);
    }

    #[test]
    fn test_repeating_decay_cycles() {
        let mut env = envelope(15, EnvelopeDirection::Down, 0, true);
        let mut levels = Vec::new();
        for _ in 0..32 {
            env.tick();
            levels.push(env.level());
        }
        let first: Vec<u8> = (0..15).rev().chain(std::iter::once(15)).collect();
        assert_eq!(&levels[..16], &first[..]);
        assert_eq!(&levels[16..], &first[..], "Ramp repeats every 16 steps");
    }

    #[test]
    fn test_repeating_period_scales_with_step() {
        let step = 2;
        let mut env = envelope(15, EnvelopeDirection::Down, step, true);
        let period = 16 * (step as usize + 1);
        let mut trace = Vec::new();
        for _ in 0..period * 2 {
            env.tick();
            trace.push(env.level());
        }
        assert_eq!(&trace[..period], &trace[period..]);
        assert_eq!(trace[period - 1], 15);
    }

    #[test]
    fn test_repeating_attack_reloads() {
        let mut env = envelope(13, EnvelopeDirection::Up, 0, true);
        env.tick();
        env.tick();
        assert_eq!(env.level(), 15);
        env.tick();
        assert_eq!(env.level(), 13);
    }
}
