//! Status record data structures.
//!
//! Contains the wholesale status snapshot reported by the grill controller
//! and the typed decodes layered on top of its raw integer fields.

use std::fmt;

/// Number of food-probe slots on the grill body.
pub const PROBE_COUNT: usize = 2;

/// Raw temperature field paired with its high-range flag.
///
/// The controller packs temperatures into a single byte. Readings of
/// 256 °F and above are reported as `value - 256` with the paired
/// high-range flag set to 1, so the decode is:
/// `degrees = raw + 256 * flag`.
///
/// # Example
///
/// ```
/// use gmg_rust_wifi::RawTemperature;
///
/// // 266 °F is reported as raw 10 with the high-range flag set
/// let temp = RawTemperature::new(10, 1);
/// assert_eq!(temp.degrees(), 266);
///
/// let temp = RawTemperature::new(150, 0);
/// assert_eq!(temp.degrees(), 150);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawTemperature {
    raw: u16,
    high_range: bool,
}

impl RawTemperature {
    /// Offset applied when the high-range flag is set.
    pub const HIGH_RANGE_OFFSET: u16 = 256;

    /// Create from a raw field and its paired high-range flag.
    pub fn new(raw: u16, high_flag: u8) -> Self {
        Self {
            raw,
            high_range: high_flag == 1,
        }
    }

    /// Decoded temperature in °F.
    pub fn degrees(&self) -> u16 {
        if self.high_range {
            self.raw + Self::HIGH_RANGE_OFFSET
        } else {
            self.raw
        }
    }

    /// The raw field as reported, without the offset applied.
    pub fn raw_value(&self) -> u16 {
        self.raw
    }

    /// Whether the high-range flag was set.
    pub fn is_high_range(&self) -> bool {
        self.high_range
    }
}

/// Grill power state decoded from the `on` status field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum PowerState {
    /// Powered off.
    #[default]
    Off = 0,
    /// Igniter and auger running, chamber driving toward the setpoint.
    Heat = 1,
    /// Fan-only cool-down cycle.
    FanOnly = 2,
}

impl PowerState {
    /// Create from the raw status code. Unknown codes read as Off.
    pub fn from_raw(value: u8) -> Self {
        match value {
            1 => Self::Heat,
            2 => Self::FanOnly,
            _ => Self::Off,
        }
    }

    /// Convert to the raw status code.
    pub fn to_raw(&self) -> u8 {
        *self as u8
    }

    /// Check if the grill is powered off.
    pub fn is_off(&self) -> bool {
        matches!(self, Self::Off)
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "off"),
            Self::Heat => write!(f, "heat"),
            Self::FanOnly => write!(f, "fan_only"),
        }
    }
}

/// Food-probe slot (1-based) on the grill body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProbeSlot(u8);

impl ProbeSlot {
    /// Lowest slot number.
    pub const MIN: u8 = 1;
    /// Highest slot number.
    pub const MAX: u8 = PROBE_COUNT as u8;

    /// Create a new ProbeSlot, clamping to the valid range.
    pub fn new(value: u8) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    /// All slots, lowest first.
    pub fn all() -> impl Iterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(Self)
    }

    /// The slot number (1-based).
    pub fn as_u8(&self) -> u8 {
        self.0
    }

    /// Zero-based index into the snapshot's probe arrays.
    pub fn index(&self) -> usize {
        (self.0 - 1) as usize
    }
}

impl fmt::Display for ProbeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One wholesale read of the grill's status record.
///
/// Every poll fully replaces the previous snapshot; nothing is diffed or
/// merged. Fields hold the raw integers reported by the controller; use
/// the accessor methods for decoded values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusSnapshot {
    /// Power/mode code: 0 = off, 1 = heat, 2 = fan-only.
    pub on: u8,
    /// Chamber temperature, low byte.
    pub temp: u16,
    /// High-range flag paired with `temp`.
    pub temp_high: u8,
    /// Chamber target temperature, low byte.
    pub grill_set_temp: u16,
    /// High-range flag paired with `grill_set_temp`.
    pub grill_set_temp_high: u8,
    /// Raw food-probe temperatures, indexed by slot.
    pub probe_temps: [u16; PROBE_COUNT],
    /// Food-probe target temperatures, indexed by slot.
    pub probe_set_temps: [u16; PROBE_COUNT],
}

impl StatusSnapshot {
    /// Decoded power state.
    pub fn power_state(&self) -> PowerState {
        PowerState::from_raw(self.on)
    }

    /// Current chamber temperature in °F.
    pub fn chamber_temp(&self) -> u16 {
        RawTemperature::new(self.temp, self.temp_high).degrees()
    }

    /// Chamber target temperature in °F.
    pub fn chamber_set_temp(&self) -> u16 {
        RawTemperature::new(self.grill_set_temp, self.grill_set_temp_high).degrees()
    }

    /// Current temperature of one food probe, as reported.
    ///
    /// Probe fields carry no high-range flag.
    pub fn probe_temp(&self, slot: ProbeSlot) -> u16 {
        self.probe_temps[slot.index()]
    }

    /// Target temperature of one food probe.
    pub fn probe_set_temp(&self, slot: ProbeSlot) -> u16 {
        self.probe_set_temps[slot.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_raw_temperature_decode() {
        assert_eq!(RawTemperature::new(150, 0).degrees(), 150);
        assert_eq!(RawTemperature::new(10, 1).degrees(), 266);
        assert_eq!(RawTemperature::new(0, 1).degrees(), 256);
        assert_eq!(RawTemperature::new(255, 0).degrees(), 255);
        assert_eq!(RawTemperature::new(255, 1).degrees(), 511);
    }

    proptest! {
        #[test]
        fn decode_adds_offset_iff_flag_set(raw in 0u16..=255, flag in 0u8..=1) {
            let decoded = RawTemperature::new(raw, flag).degrees();
            prop_assert_eq!(decoded, raw + 256 * flag as u16);
        }
    }

    #[test]
    fn test_power_state_from_raw() {
        assert_eq!(PowerState::from_raw(0), PowerState::Off);
        assert_eq!(PowerState::from_raw(1), PowerState::Heat);
        assert_eq!(PowerState::from_raw(2), PowerState::FanOnly);
        // Undocumented codes read as Off
        assert_eq!(PowerState::from_raw(3), PowerState::Off);
        assert_eq!(PowerState::from_raw(99), PowerState::Off);

        assert!(PowerState::Off.is_off());
        assert!(!PowerState::Heat.is_off());
    }

    #[test]
    fn test_probe_slot() {
        let slot = ProbeSlot::new(2);
        assert_eq!(slot.as_u8(), 2);
        assert_eq!(slot.index(), 1);

        // Clamping
        assert_eq!(ProbeSlot::new(0).as_u8(), 1);
        assert_eq!(ProbeSlot::new(9).as_u8(), 2);

        let all: Vec<u8> = ProbeSlot::all().map(|s| s.as_u8()).collect();
        assert_eq!(all, vec![1, 2]);
    }

    #[test]
    fn test_snapshot_accessors() {
        let snapshot = StatusSnapshot {
            on: 1,
            temp: 150,
            temp_high: 0,
            grill_set_temp: 10,
            grill_set_temp_high: 1,
            probe_temps: [89, 145],
            probe_set_temps: [0, 160],
        };

        assert_eq!(snapshot.power_state(), PowerState::Heat);
        assert_eq!(snapshot.chamber_temp(), 150);
        assert_eq!(snapshot.chamber_set_temp(), 266);
        assert_eq!(snapshot.probe_temp(ProbeSlot::new(1)), 89);
        assert_eq!(snapshot.probe_temp(ProbeSlot::new(2)), 145);
        assert_eq!(snapshot.probe_set_temp(ProbeSlot::new(2)), 160);
    }
}
