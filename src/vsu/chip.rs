//! Virtual Boy VSU
//!
//! Cycle-accurate emulation of the six-channel sound unit. One chip cycle
//! produces exactly one stereo frame at 41 667 Hz; there is no resampling.
//!
//! Every cycle runs, in order:
//! 1. the duration divider (every 160 cycles) ticking all interval timers
//! 2. the envelope divider (every 640 cycles) ticking all envelopes
//! 3. the frequency clocks of channels 1-5
//! 4. the sweep/modulation divider (40 or 320 cycles) ticking channel 5
//! 5. the noise clock of channel 6
//! 6. the mixer, writing one frame

use super::channel::{Channel, WaveTables};
use super::constants::{
    DURATION_CLOCK_PERIOD, ENVELOPE_CLOCK_PERIOD, NUM_CHANNELS, NUM_MOD_DATA_WORDS,
    NUM_WAVEFORM_DATA_TABLES, NUM_WAVEFORM_DATA_WORDS, SAMPLE_RATE, SWEEP_MOD_LARGE_PERIOD,
    SWEEP_MOD_SMALL_PERIOD,
};
use super::envelope::{Envelope, EnvelopeDirection};
use super::mixer::{AudioFrames, Mixer, StereoFrame};
use super::noise::NoiseChannel;
use super::registers::{ChannelId, Field, FieldValue, PackedRegister, RegisterWrite};
use super::standard::StandardChannel;
use super::sweep_mod::{ModTable, SweepModChannel, SweepModFunction};

const WAVE_SAMPLE_MASK: u8 = 0x3F;

/// VSU chip state.
#[derive(Debug, Clone)]
pub struct Vsu {
    channels: [Channel; NUM_CHANNELS],
    waveforms: WaveTables,
    modulation: ModTable,
    duration_clock_counter: u32,
    envelope_clock_counter: u32,
    sweep_mod_clock_counter: u32,
    mixer: Mixer,
}

impl Vsu {
    /// Create a chip with every channel silent and all tables zeroed.
    pub fn new() -> Self {
        tracing::debug!(sample_rate = SAMPLE_RATE, "VSU created");

        Vsu {
            channels: [
                Channel::Standard(StandardChannel::new()),
                Channel::Standard(StandardChannel::new()),
                Channel::Standard(StandardChannel::new()),
                Channel::Standard(StandardChannel::new()),
                Channel::SweepMod(SweepModChannel::new()),
                Channel::Noise(NoiseChannel::new()),
            ],
            waveforms: [[0; NUM_WAVEFORM_DATA_WORDS]; NUM_WAVEFORM_DATA_TABLES],
            modulation: [0; NUM_MOD_DATA_WORDS],
            duration_clock_counter: 0,
            envelope_clock_counter: 0,
            sweep_mod_clock_counter: 0,
            mixer: Mixer::new(),
        }
    }

    /// Apply one field write.
    ///
    /// Writes whose value has the wrong shape for the field (a table sent to
    /// a frequency, say) are ignored.
    pub fn write(&mut self, write: &RegisterWrite) {
        if self.apply(write.field, &write.value).is_none() {
            tracing::debug!(field = %write.field, value = ?write.value, "ignored register write");
        }
    }

    fn apply(&mut self, field: Field, value: &FieldValue) -> Option<()> {
        match field {
            Field::Enabled(ch) => self.channel_mut(ch).set_enabled(value.as_flag()?),
            Field::EnvelopeDirection(ch) => self
                .envelope_mut(ch)
                .set_direction(EnvelopeDirection::from_bit(value.as_flag()?)),
            Field::EnvelopeEnabled(ch) => self.envelope_mut(ch).set_enabled(value.as_flag()?),
            Field::EnvelopeLevel(ch) => self.envelope_mut(ch).set_reload(value.as_scalar()? as u8),
            Field::EnvelopeRepeat(ch) => self.envelope_mut(ch).set_repeat(value.as_flag()?),
            Field::EnvelopeStep(ch) => self.envelope_mut(ch).set_step_interval(value.as_scalar()?),
            Field::Frequency(ch) => self.channel_mut(ch).set_frequency(value.as_scalar()?),
            Field::IntervalEnabled(ch) => {
                self.channel_mut(ch).core_mut().interval.set_enabled(value.as_flag()?)
            }
            Field::IntervalValue(ch) => {
                self.channel_mut(ch).core_mut().interval.set_setting(value.as_scalar()?)
            }
            Field::StereoLevels(ch) => self.channel_mut(ch).core_mut().stereo = value.as_stereo()?,
            Field::Waveform(ch) => self.channel_mut(ch).set_waveform(saturate(value.as_scalar()?)),
            Field::NoiseTap => self.noise_mut()?.tap_select = value.as_scalar()? as u8,
            Field::SweepDirection => self.sweep_mod_mut()?.sweep_up = value.as_flag()?,
            Field::SweepModEnabled => self.sweep_mod_mut()?.sweep_mod_enabled = value.as_flag()?,
            Field::SweepModFunction => {
                self.sweep_mod_mut()?.function = SweepModFunction::from_bit(value.as_flag()?)
            }
            Field::SweepModInterval => self.sweep_mod_mut()?.sweep_mod_interval = value.as_scalar()?,
            Field::SweepModBaseInterval => {
                self.sweep_mod_mut()?.base_interval_long = value.as_flag()?
            }
            Field::SweepShift => self.sweep_mod_mut()?.set_sweep_shift(value.as_scalar()? as u8),
            Field::ModFrequency => self.sweep_mod_mut()?.set_mod_frequency(value.as_scalar()?),
            Field::ModRepeat => self.sweep_mod_mut()?.repeat_modulation = value.as_flag()?,
            Field::WaveformData(table) => {
                if table >= NUM_WAVEFORM_DATA_TABLES {
                    return None;
                }
                self.set_waveform_data(table, value.as_table()?)
            }
            Field::ModulationData => self.set_modulation_data(value.as_table()?),
        }
        Some(())
    }

    /// Apply a raw hardware register byte to one channel.
    pub fn write_packed(&mut self, channel: ChannelId, register: PackedRegister, value: u8) {
        let current_frequency = self.channel(channel).frequency();
        for write in register.decode(channel, value, current_frequency) {
            self.write(&write);
        }
    }

    /// Upload a wavetable.
    ///
    /// Each incoming value is stored as `value - 1` (0 stays 0) in 6 bits;
    /// missing entries read as 0. Tables past the last one are ignored.
    pub fn set_waveform_data(&mut self, table: usize, data: &[i32]) {
        let Some(samples) = self.waveforms.get_mut(table) else {
            tracing::debug!(table, "ignored upload to missing wavetable");
            return;
        };
        for (i, sample) in samples.iter_mut().enumerate() {
            *sample = (upload_value(data, i) as u8) & WAVE_SAMPLE_MASK;
        }
    }

    /// Upload the modulation table (same offset-by-one as wavetables, signed 8-bit).
    pub fn set_modulation_data(&mut self, data: &[i32]) {
        for (i, entry) in self.modulation.iter_mut().enumerate() {
            *entry = upload_value(data, i) as i8;
        }
    }

    /// Key every channel off, as the hardware stop-all register does.
    pub fn stop_all(&mut self) {
        for channel in &mut self.channels {
            channel.set_enabled(false);
        }
    }

    /// Run one chip cycle per frame in `frames`, filling each frame in order.
    pub fn cycles(&mut self, frames: &mut AudioFrames) {
        for cycle in 0..frames.len() {
            let frame = self.clock();
            frames.set(cycle, frame);
        }
    }

    /// Run `num_cycles` chip cycles into a fresh buffer.
    pub fn render(&mut self, num_cycles: usize) -> AudioFrames {
        let mut frames = AudioFrames::new(num_cycles);
        self.cycles(&mut frames);
        frames
    }

    #[inline]
    fn clock(&mut self) -> StereoFrame {
        self.duration_clock_counter += 1;
        if self.duration_clock_counter >= DURATION_CLOCK_PERIOD {
            self.duration_clock_counter = 0;
            for channel in &mut self.channels {
                channel.core_mut().interval.tick();
            }
        }

        self.envelope_clock_counter += 1;
        if self.envelope_clock_counter >= ENVELOPE_CLOCK_PERIOD {
            self.envelope_clock_counter = 0;
            for channel in &mut self.channels {
                channel.core_mut().envelope.tick();
            }
        }

        let (wave_channels, noise) = self.channels.split_at_mut(5);
        for channel in wave_channels.iter_mut() {
            channel.frequency_clock();
        }

        if let Channel::SweepMod(sweep_mod) = &mut wave_channels[4] {
            let period = if sweep_mod.base_interval_long {
                SWEEP_MOD_LARGE_PERIOD
            } else {
                SWEEP_MOD_SMALL_PERIOD
            };
            self.sweep_mod_clock_counter += 1;
            if self.sweep_mod_clock_counter >= period {
                self.sweep_mod_clock_counter = 0;
                sweep_mod.sweep_mod_clock(&self.modulation);
            }
        }

        for channel in noise.iter_mut() {
            channel.frequency_clock();
        }

        self.mixer.mix(&self.channels, &self.waveforms)
    }

    /// Channel state.
    pub fn channel(&self, id: ChannelId) -> &Channel {
        &self.channels[id.index()]
    }

    fn channel_mut(&mut self, id: ChannelId) -> &mut Channel {
        &mut self.channels[id.index()]
    }

    fn envelope_mut(&mut self, id: ChannelId) -> &mut Envelope {
        &mut self.channel_mut(id).core_mut().envelope
    }

    /// All six channels in mixing order.
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Channel 5.
    pub fn sweep_mod(&self) -> Option<&SweepModChannel> {
        match self.channel(ChannelId::Ch5) {
            Channel::SweepMod(ch) => Some(ch),
            _ => None,
        }
    }

    fn sweep_mod_mut(&mut self) -> Option<&mut SweepModChannel> {
        match self.channel_mut(ChannelId::Ch5) {
            Channel::SweepMod(ch) => Some(ch),
            _ => None,
        }
    }

    /// Channel 6.
    pub fn noise(&self) -> Option<&NoiseChannel> {
        match self.channel(ChannelId::Ch6) {
            Channel::Noise(ch) => Some(ch),
            _ => None,
        }
    }

    fn noise_mut(&mut self) -> Option<&mut NoiseChannel> {
        match self.channel_mut(ChannelId::Ch6) {
            Channel::Noise(ch) => Some(ch),
            _ => None,
        }
    }

    /// Wave RAM contents.
    pub fn waveforms(&self) -> &WaveTables {
        &self.waveforms
    }

    /// Modulation table contents.
    pub fn modulation(&self) -> &ModTable {
        &self.modulation
    }
}

impl Default for Vsu {
    fn default() -> Self {
        Self::new()
    }
}

/// Transport upload convention: every non-zero value arrives one too high.
fn upload_value(data: &[i32], index: usize) -> i32 {
    match data.get(index).copied().unwrap_or(0) {
        0 => 0,
        v => v.wrapping_sub(1),
    }
}

/// Narrow a waveform index; anything too wide selects no table.
fn saturate(value: u32) -> u8 {
    u8::try_from(value).unwrap_or(u8::MAX)
}
