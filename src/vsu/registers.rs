//! VSU Register Fields
//!
//! The host programs the chip one field at a time. [`Field`] is the closed
//! set of writable fields, [`FieldValue`] the payload shapes they accept and
//! [`RegisterWrite`] one (field, value) pair. Fields also parse from the
//! wire names used by the audio transport (`ch1Frequency`, `waveform3`, ...).
//!
//! [`PackedRegister`] decodes the raw per-channel register bytes
//! (`SxINT`, `SxLRV`, `SxFQL`/`SxFQH`, `SxEV0`, `SxEV1`, `SxRAM`, `S5SWP`)
//! into the equivalent field writes.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::channel::StereoLevel;
use super::constants::{NUM_CHANNELS, NUM_WAVEFORM_DATA_TABLES};

/// Channel number (1-6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelId {
    /// Wavetable channel 1
    Ch1,
    /// Wavetable channel 2
    Ch2,
    /// Wavetable channel 3
    Ch3,
    /// Wavetable channel 4
    Ch4,
    /// Sweep/modulation channel
    Ch5,
    /// Noise channel
    Ch6,
}

impl ChannelId {
    /// All channels in mixing order.
    pub const ALL: [ChannelId; NUM_CHANNELS] = [
        ChannelId::Ch1,
        ChannelId::Ch2,
        ChannelId::Ch3,
        ChannelId::Ch4,
        ChannelId::Ch5,
        ChannelId::Ch6,
    ];

    /// Channel from its 1-based number.
    pub fn from_number(number: u32) -> Option<Self> {
        match number {
            1 => Some(ChannelId::Ch1),
            2 => Some(ChannelId::Ch2),
            3 => Some(ChannelId::Ch3),
            4 => Some(ChannelId::Ch4),
            5 => Some(ChannelId::Ch5),
            6 => Some(ChannelId::Ch6),
            _ => None,
        }
    }

    /// 0-based index into the channel array.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// 1-based channel number.
    pub fn number(self) -> usize {
        self.index() + 1
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ch{}", self.number())
    }
}

/// A writable VSU field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Key the channel on/off (restarts playback when on)
    Enabled(ChannelId),
    /// Envelope direction (non-zero = grow)
    EnvelopeDirection(ChannelId),
    /// Envelope enable
    EnvelopeEnabled(ChannelId),
    /// Envelope reload level (also re-triggers the live level)
    EnvelopeLevel(ChannelId),
    /// Envelope repeat
    EnvelopeRepeat(ChannelId),
    /// Envelope step interval
    EnvelopeStep(ChannelId),
    /// Frequency register
    Frequency(ChannelId),
    /// Duration mode enable
    IntervalEnabled(ChannelId),
    /// Duration setting
    IntervalValue(ChannelId),
    /// Left/right levels
    StereoLevels(ChannelId),
    /// Wavetable selection
    Waveform(ChannelId),
    /// Noise feedback tap (channel 6)
    NoiseTap,
    /// Sweep direction (non-zero = up, channel 5)
    SweepDirection,
    /// Sweep/modulation unit enable (channel 5)
    SweepModEnabled,
    /// Sweep (0) or modulation (non-zero) (channel 5)
    SweepModFunction,
    /// Secondary clocks between updates (channel 5)
    SweepModInterval,
    /// Long (320 cycle) base interval (channel 5)
    SweepModBaseInterval,
    /// Sweep shift amount (channel 5)
    SweepShift,
    /// Playback frequency of channel 5, applied immediately
    ModFrequency,
    /// Modulation repeat (channel 5)
    ModRepeat,
    /// Wavetable upload (table 0-4)
    WaveformData(usize),
    /// Modulation table upload
    ModulationData,
}

impl Field {
    /// Parse a transport wire name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        let field = match name {
            "ch6Tap" => Field::NoiseTap,
            "ch5SweepDirection" => Field::SweepDirection,
            "ch5SweepModEnabled" => Field::SweepModEnabled,
            "ch5SweepModFunction" => Field::SweepModFunction,
            "regSweepModInterval" | "ch5SweepModInterval" => Field::SweepModInterval,
            "ch5SweepModBaseInterval" => Field::SweepModBaseInterval,
            "ch5SweepShift" => Field::SweepShift,
            "ch5ModFrequency" => Field::ModFrequency,
            "ch5ModRepeat" => Field::ModRepeat,
            "modulation" => Field::ModulationData,
            _ => return Self::indexed_from_name(name),
        };
        Some(field)
    }

    fn indexed_from_name(name: &str) -> Option<Self> {
        if let Some(rest) = name.strip_prefix("waveform") {
            let table = rest.parse::<usize>().ok()?;
            return (1..=NUM_WAVEFORM_DATA_TABLES)
                .contains(&table)
                .then_some(Field::WaveformData(table - 1));
        }

        let rest = name.strip_prefix("ch")?;
        let mut chars = rest.chars();
        let channel = ChannelId::from_number(chars.next()?.to_digit(10)?)?;

        let field = match chars.as_str() {
            "Enabled" => Field::Enabled(channel),
            "EnvDirection" => Field::EnvelopeDirection(channel),
            "EnvEnabled" => Field::EnvelopeEnabled(channel),
            "EnvLevel" => Field::EnvelopeLevel(channel),
            "EnvRepeat" => Field::EnvelopeRepeat(channel),
            "EnvStep" => Field::EnvelopeStep(channel),
            "Frequency" => Field::Frequency(channel),
            "IntervalEnabled" => Field::IntervalEnabled(channel),
            "IntervalValue" => Field::IntervalValue(channel),
            "StereoLevels" => Field::StereoLevels(channel),
            "Waveform" => Field::Waveform(channel),
            _ => return None,
        };
        Some(field)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Enabled(ch) => write!(f, "{ch}Enabled"),
            Field::EnvelopeDirection(ch) => write!(f, "{ch}EnvDirection"),
            Field::EnvelopeEnabled(ch) => write!(f, "{ch}EnvEnabled"),
            Field::EnvelopeLevel(ch) => write!(f, "{ch}EnvLevel"),
            Field::EnvelopeRepeat(ch) => write!(f, "{ch}EnvRepeat"),
            Field::EnvelopeStep(ch) => write!(f, "{ch}EnvStep"),
            Field::Frequency(ch) => write!(f, "{ch}Frequency"),
            Field::IntervalEnabled(ch) => write!(f, "{ch}IntervalEnabled"),
            Field::IntervalValue(ch) => write!(f, "{ch}IntervalValue"),
            Field::StereoLevels(ch) => write!(f, "{ch}StereoLevels"),
            Field::Waveform(ch) => write!(f, "{ch}Waveform"),
            Field::NoiseTap => write!(f, "ch6Tap"),
            Field::SweepDirection => write!(f, "ch5SweepDirection"),
            Field::SweepModEnabled => write!(f, "ch5SweepModEnabled"),
            Field::SweepModFunction => write!(f, "ch5SweepModFunction"),
            Field::SweepModInterval => write!(f, "ch5SweepModInterval"),
            Field::SweepModBaseInterval => write!(f, "ch5SweepModBaseInterval"),
            Field::SweepShift => write!(f, "ch5SweepShift"),
            Field::ModFrequency => write!(f, "ch5ModFrequency"),
            Field::ModRepeat => write!(f, "ch5ModRepeat"),
            Field::WaveformData(table) => write!(f, "waveform{}", table + 1),
            Field::ModulationData => write!(f, "modulation"),
        }
    }
}

/// Payload of a field write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Boolean flag
    Flag(bool),
    /// Integer register value
    Scalar(u32),
    /// Stereo level pair
    Stereo {
        /// Left level, masked to 4 bits on use
        left: u32,
        /// Right level, masked to 4 bits on use
        right: u32,
    },
    /// Table upload; entries past the end read as 0
    Table(Vec<i32>),
}

impl FieldValue {
    /// Integer view; flags read as 0/1.
    pub fn as_scalar(&self) -> Option<u32> {
        match *self {
            FieldValue::Scalar(v) => Some(v),
            FieldValue::Flag(b) => Some(u32::from(b)),
            _ => None,
        }
    }

    /// Boolean view; any non-zero integer is true.
    pub fn as_flag(&self) -> Option<bool> {
        self.as_scalar().map(|v| v != 0)
    }

    /// Stereo level view.
    pub fn as_stereo(&self) -> Option<StereoLevel> {
        match *self {
            FieldValue::Stereo { left, right } => {
                Some(StereoLevel::new(left as u8, right as u8))
            }
            _ => None,
        }
    }

    /// Table view.
    pub fn as_table(&self) -> Option<&[i32]> {
        match self {
            FieldValue::Table(values) => Some(values),
            _ => None,
        }
    }
}

/// One (field, value) write from the host.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterWrite {
    /// Target field
    pub field: Field,
    /// Payload
    pub value: FieldValue,
}

impl RegisterWrite {
    /// Pair a field with a value.
    pub fn new(field: Field, value: FieldValue) -> Self {
        RegisterWrite { field, value }
    }

    /// Integer write.
    pub fn scalar(field: Field, value: u32) -> Self {
        Self::new(field, FieldValue::Scalar(value))
    }

    /// Boolean write.
    pub fn flag(field: Field, value: bool) -> Self {
        Self::new(field, FieldValue::Flag(value))
    }

    /// Stereo level write.
    pub fn stereo(channel: ChannelId, left: u8, right: u8) -> Self {
        Self::new(
            Field::StereoLevels(channel),
            FieldValue::Stereo {
                left: u32::from(left),
                right: u32::from(right),
            },
        )
    }

    /// Table upload.
    pub fn table(field: Field, values: &[i32]) -> Self {
        Self::new(field, FieldValue::Table(values.to_vec()))
    }
}

bitflags! {
    /// `SxINT` control bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IntFlags: u8 {
        /// Duration mode enable
        const AUTO = 0x20;
        /// Channel enable
        const ENABLE = 0x80;
    }
}

bitflags! {
    /// `SxEV0` control bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Ev0Flags: u8 {
        /// Envelope grows
        const DIRECTION_UP = 0x08;
    }
}

bitflags! {
    /// `SxEV1` control bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Ev1Flags: u8 {
        /// Envelope enable
        const ENVELOPE_ENABLE = 0x01;
        /// Envelope repeat
        const ENVELOPE_REPEAT = 0x02;
        /// Channel 5: modulation instead of sweep
        const MOD_FUNCTION = 0x10;
        /// Channel 5: modulation repeat
        const MOD_REPEAT = 0x20;
        /// Channel 5: sweep/modulation enable
        const SWEEP_MOD_ENABLE = 0x40;
    }
}

bitflags! {
    /// `S5SWP` control bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SwpFlags: u8 {
        /// Sweep adds
        const DIRECTION_UP = 0x08;
        /// Long base interval
        const BASE_INTERVAL_LONG = 0x80;
    }
}

/// Raw per-channel hardware register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackedRegister {
    /// `SxINT`: enable, duration mode, duration setting
    Int,
    /// `SxLRV`: left (high nibble) / right (low nibble) level
    Lrv,
    /// `SxFQL`: frequency bits 0-7
    Fql,
    /// `SxFQH`: frequency bits 8-10
    Fqh,
    /// `SxEV0`: envelope reload, direction, step
    Ev0,
    /// `SxEV1`: envelope control plus channel 5/6 extras
    Ev1,
    /// `SxRAM`: wavetable selection
    Ram,
    /// `S5SWP`: sweep/modulation timing (channel 5 only)
    Swp,
}

impl PackedRegister {
    /// Decode a raw byte into field writes, in application order.
    ///
    /// `current_frequency` supplies the half of the frequency register not
    /// covered by an `Fql`/`Fqh` write.
    pub fn decode(self, channel: ChannelId, value: u8, current_frequency: u32) -> Vec<RegisterWrite> {
        let v = u32::from(value);
        match self {
            PackedRegister::Int => {
                let flags = IntFlags::from_bits_truncate(value);
                vec![
                    RegisterWrite::scalar(Field::IntervalValue(channel), v & 0x1F),
                    RegisterWrite::flag(Field::IntervalEnabled(channel), flags.contains(IntFlags::AUTO)),
                    RegisterWrite::flag(Field::Enabled(channel), flags.contains(IntFlags::ENABLE)),
                ]
            }
            PackedRegister::Lrv => vec![RegisterWrite::stereo(channel, value >> 4, value & 0x0F)],
            PackedRegister::Fql => frequency_writes(channel, (current_frequency & 0x700) | v),
            PackedRegister::Fqh => {
                frequency_writes(channel, (current_frequency & 0xFF) | ((v & 0x07) << 8))
            }
            PackedRegister::Ev0 => {
                let flags = Ev0Flags::from_bits_truncate(value);
                vec![
                    RegisterWrite::scalar(Field::EnvelopeStep(channel), v & 0x07),
                    RegisterWrite::flag(
                        Field::EnvelopeDirection(channel),
                        flags.contains(Ev0Flags::DIRECTION_UP),
                    ),
                    RegisterWrite::scalar(Field::EnvelopeLevel(channel), v >> 4),
                ]
            }
            PackedRegister::Ev1 => {
                let flags = Ev1Flags::from_bits_truncate(value);
                let mut writes = vec![
                    RegisterWrite::flag(
                        Field::EnvelopeRepeat(channel),
                        flags.contains(Ev1Flags::ENVELOPE_REPEAT),
                    ),
                    RegisterWrite::flag(
                        Field::EnvelopeEnabled(channel),
                        flags.contains(Ev1Flags::ENVELOPE_ENABLE),
                    ),
                ];
                match channel {
                    ChannelId::Ch5 => writes.extend([
                        RegisterWrite::flag(Field::SweepModFunction, flags.contains(Ev1Flags::MOD_FUNCTION)),
                        RegisterWrite::flag(Field::ModRepeat, flags.contains(Ev1Flags::MOD_REPEAT)),
                        RegisterWrite::flag(
                            Field::SweepModEnabled,
                            flags.contains(Ev1Flags::SWEEP_MOD_ENABLE),
                        ),
                    ]),
                    ChannelId::Ch6 => {
                        writes.push(RegisterWrite::scalar(Field::NoiseTap, (v >> 4) & 0x07));
                    }
                    _ => {}
                }
                writes
            }
            PackedRegister::Ram => vec![RegisterWrite::scalar(Field::Waveform(channel), v & 0x0F)],
            PackedRegister::Swp => {
                if channel != ChannelId::Ch5 {
                    return Vec::new();
                }
                let flags = SwpFlags::from_bits_truncate(value);
                vec![
                    RegisterWrite::scalar(Field::SweepShift, v & 0x07),
                    RegisterWrite::flag(Field::SweepDirection, flags.contains(SwpFlags::DIRECTION_UP)),
                    RegisterWrite::scalar(Field::SweepModInterval, (v >> 4) & 0x07),
                    RegisterWrite::flag(
                        Field::SweepModBaseInterval,
                        flags.contains(SwpFlags::BASE_INTERVAL_LONG),
                    ),
                ]
            }
        }
    }
}

/// Frequency register writes; channel 5 also reloads its playback frequency.
fn frequency_writes(channel: ChannelId, frequency: u32) -> Vec<RegisterWrite> {
    let mut writes = vec![RegisterWrite::scalar(Field::Frequency(channel), frequency)];
    if channel == ChannelId::Ch5 {
        writes.push(RegisterWrite::scalar(Field::ModFrequency, frequency));
    }
    writes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_fields_from_name() {
        assert_eq!(Field::from_name("ch1EnvDirection"), Some(Field::EnvelopeDirection(ChannelId::Ch1)));
        assert_eq!(Field::from_name("ch4Frequency"), Some(Field::Frequency(ChannelId::Ch4)));
        assert_eq!(Field::from_name("ch6Enabled"), Some(Field::Enabled(ChannelId::Ch6)));
        assert_eq!(Field::from_name("ch3StereoLevels"), Some(Field::StereoLevels(ChannelId::Ch3)));
    }

    #[test]
    fn test_channel_five_fields_from_name() {
        assert_eq!(Field::from_name("regSweepModInterval"), Some(Field::SweepModInterval));
        assert_eq!(Field::from_name("ch5SweepModInterval"), Some(Field::SweepModInterval));
        assert_eq!(Field::from_name("ch5ModFrequency"), Some(Field::ModFrequency));
        assert_eq!(Field::from_name("ch6Tap"), Some(Field::NoiseTap));
    }

    #[test]
    fn test_table_fields_from_name() {
        assert_eq!(Field::from_name("waveform1"), Some(Field::WaveformData(0)));
        assert_eq!(Field::from_name("waveform5"), Some(Field::WaveformData(4)));
        assert_eq!(Field::from_name("waveform6"), None);
        assert_eq!(Field::from_name("waveform0"), None);
        assert_eq!(Field::from_name("modulation"), Some(Field::ModulationData));
    }

    #[test]
    fn test_unknown_names_rejected() {
        for name in ["", "ch", "ch7Frequency", "ch0Enabled", "ch1Volume", "chXEnabled", "ch1", "ch1é"] {
            assert_eq!(Field::from_name(name), None, "{name:?} should not parse");
        }
    }

    #[test]
    fn test_display_matches_wire_name() {
        let field = Field::EnvelopeStep(ChannelId::Ch2);
        assert_eq!(field.to_string(), "ch2EnvStep");
        assert_eq!(Field::from_name(&field.to_string()), Some(field));
        assert_eq!(Field::WaveformData(2).to_string(), "waveform3");
    }

    #[test]
    fn test_field_value_views() {
        assert_eq!(FieldValue::Flag(true).as_scalar(), Some(1));
        assert_eq!(FieldValue::Scalar(2).as_flag(), Some(true));
        assert_eq!(FieldValue::Scalar(0).as_flag(), Some(false));
        assert_eq!(FieldValue::Table(vec![1]).as_scalar(), None);
        assert_eq!(
            FieldValue::Stereo { left: 3, right: 0x14 }.as_stereo(),
            Some(StereoLevel::new(3, 4))
        );
    }

    #[test]
    fn test_field_value_json_shapes() {
        let parse = |s: &str| serde_json::from_str::<FieldValue>(s).unwrap();
        assert_eq!(parse("7"), FieldValue::Scalar(7));
        assert_eq!(parse("true"), FieldValue::Flag(true));
        assert_eq!(parse(r#"{"left": 1, "right": 2}"#), FieldValue::Stereo { left: 1, right: 2 });
        assert_eq!(parse("[1, -2, 3]"), FieldValue::Table(vec![1, -2, 3]));
    }

    #[test]
    fn test_decode_int() {
        let writes = PackedRegister::Int.decode(ChannelId::Ch2, 0xA7, 0);
        assert_eq!(
            writes,
            vec![
                RegisterWrite::scalar(Field::IntervalValue(ChannelId::Ch2), 7),
                RegisterWrite::flag(Field::IntervalEnabled(ChannelId::Ch2), true),
                RegisterWrite::flag(Field::Enabled(ChannelId::Ch2), true),
            ]
        );
    }

    #[test]
    fn test_decode_frequency_halves() {
        let low = PackedRegister::Fql.decode(ChannelId::Ch1, 0x34, 0x5FF);
        assert_eq!(low, vec![RegisterWrite::scalar(Field::Frequency(ChannelId::Ch1), 0x534)]);

        let high = PackedRegister::Fqh.decode(ChannelId::Ch1, 0xFE, 0x534);
        assert_eq!(high, vec![RegisterWrite::scalar(Field::Frequency(ChannelId::Ch1), 0x634)]);
    }

    #[test]
    fn test_decode_frequency_channel_five_reloads_playback() {
        let writes = PackedRegister::Fql.decode(ChannelId::Ch5, 0x10, 0);
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[1], RegisterWrite::scalar(Field::ModFrequency, 0x10));
    }

    #[test]
    fn test_decode_ev0() {
        let writes = PackedRegister::Ev0.decode(ChannelId::Ch3, 0xF9, 0);
        assert_eq!(
            writes,
            vec![
                RegisterWrite::scalar(Field::EnvelopeStep(ChannelId::Ch3), 1),
                RegisterWrite::flag(Field::EnvelopeDirection(ChannelId::Ch3), true),
                RegisterWrite::scalar(Field::EnvelopeLevel(ChannelId::Ch3), 15),
            ]
        );
    }

    #[test]
    fn test_decode_ev1_per_channel_extras() {
        assert_eq!(PackedRegister::Ev1.decode(ChannelId::Ch1, 0x73, 0).len(), 2);

        let ch5 = PackedRegister::Ev1.decode(ChannelId::Ch5, 0x51, 0);
        assert!(ch5.contains(&RegisterWrite::flag(Field::SweepModFunction, true)));
        assert!(ch5.contains(&RegisterWrite::flag(Field::ModRepeat, false)));
        assert!(ch5.contains(&RegisterWrite::flag(Field::SweepModEnabled, true)));

        let ch6 = PackedRegister::Ev1.decode(ChannelId::Ch6, 0x50, 0);
        assert_eq!(ch6.last(), Some(&RegisterWrite::scalar(Field::NoiseTap, 5)));
    }

    #[test]
    fn test_decode_swp_only_on_channel_five() {
        assert!(PackedRegister::Swp.decode(ChannelId::Ch1, 0xFF, 0).is_empty());
        let writes = PackedRegister::Swp.decode(ChannelId::Ch5, 0xBA, 0);
        assert_eq!(
            writes,
            vec![
                RegisterWrite::scalar(Field::SweepShift, 2),
                RegisterWrite::flag(Field::SweepDirection, true),
                RegisterWrite::scalar(Field::SweepModInterval, 3),
                RegisterWrite::flag(Field::SweepModBaseInterval, true),
            ]
        );
    }
}
