// Decoded meter state and its bit-field layout

use crate::bitwise::fields::{self, FieldSpec};
use crate::core::segments::lookup_digit;
use crate::core::units::{self, Flag, Unit};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of data bytes carried by one packet after reassembly
pub const DATA_LENGTH: usize = 7;

#[derive(Error, Debug)]
pub enum ReadingError {
    #[error("\"{0}\" is not a numeric reading")]
    NonNumeric(String),
}

pub type Result<T> = std::result::Result<T, ReadingError>;

/// Field layout of the corrected data buffer.
///
/// Offsets count LSB-first through the 7 bytes; the table tiles all 56 bits
/// with no gaps, which is checked at compile time below.
mod layout {
    use super::FieldSpec;

    pub const AC: FieldSpec = FieldSpec::new("ac", 0, 1);
    pub const DC: FieldSpec = FieldSpec::new("dc", 1, 1);
    pub const AUTORANGE: FieldSpec = FieldSpec::new("autorange", 2, 1);
    pub const CONNECTED: FieldSpec = FieldSpec::new("connected", 3, 1);
    pub const NEGATIVE: FieldSpec = FieldSpec::new("negative", 4, 1);
    pub const FIRST_DIGIT: FieldSpec = FieldSpec::new("first_digit", 5, 7);
    pub const FIRST_DP: FieldSpec = FieldSpec::new("first_dp", 12, 1);
    pub const SECOND_DIGIT: FieldSpec = FieldSpec::new("second_digit", 13, 7);
    pub const SECOND_DP: FieldSpec = FieldSpec::new("second_dp", 20, 1);
    pub const THIRD_DIGIT: FieldSpec = FieldSpec::new("third_digit", 21, 7);
    pub const THIRD_DP: FieldSpec = FieldSpec::new("third_dp", 28, 1);
    pub const FOURTH_DIGIT: FieldSpec = FieldSpec::new("fourth_digit", 29, 7);
    pub const MICRO: FieldSpec = FieldSpec::new("micro", 36, 1);
    pub const NANO: FieldSpec = FieldSpec::new("nano", 37, 1);
    pub const KILO: FieldSpec = FieldSpec::new("kilo", 38, 1);
    pub const DIODE: FieldSpec = FieldSpec::new("diode", 39, 1);
    pub const MILLI: FieldSpec = FieldSpec::new("milli", 40, 1);
    pub const PERCENT: FieldSpec = FieldSpec::new("percent", 41, 1);
    pub const MEGA: FieldSpec = FieldSpec::new("mega", 42, 1);
    pub const CONTINUITY: FieldSpec = FieldSpec::new("continuity", 43, 1);
    pub const CAPACITANCE: FieldSpec = FieldSpec::new("capacitance", 44, 1);
    pub const OHM: FieldSpec = FieldSpec::new("ohm", 45, 1);
    pub const RELATIVE: FieldSpec = FieldSpec::new("relative", 46, 1);
    pub const HOLD: FieldSpec = FieldSpec::new("hold", 47, 1);
    pub const AMP: FieldSpec = FieldSpec::new("amp", 48, 1);
    pub const VOLTS: FieldSpec = FieldSpec::new("volts", 49, 1);
    pub const HERTZ: FieldSpec = FieldSpec::new("hertz", 50, 1);
    pub const LOW_BATTERY: FieldSpec = FieldSpec::new("low_battery", 51, 1);
    pub const MINIMUM: FieldSpec = FieldSpec::new("minimum", 52, 1);
    pub const CELSIUS: FieldSpec = FieldSpec::new("celsius", 53, 1);
    pub const FAHRENHEIT: FieldSpec = FieldSpec::new("fahrenheit", 54, 1);
    pub const MAXIMUM: FieldSpec = FieldSpec::new("maximum", 55, 1);

    pub const ALL: &[FieldSpec] = &[
        AC,
        DC,
        AUTORANGE,
        CONNECTED,
        NEGATIVE,
        FIRST_DIGIT,
        FIRST_DP,
        SECOND_DIGIT,
        SECOND_DP,
        THIRD_DIGIT,
        THIRD_DP,
        FOURTH_DIGIT,
        MICRO,
        NANO,
        KILO,
        DIODE,
        MILLI,
        PERCENT,
        MEGA,
        CONTINUITY,
        CAPACITANCE,
        OHM,
        RELATIVE,
        HOLD,
        AMP,
        VOLTS,
        HERTZ,
        LOW_BATTERY,
        MINIMUM,
        CELSIUS,
        FAHRENHEIT,
        MAXIMUM,
    ];
}

// The layout must account for every bit of the buffer exactly once
const _: () = {
    assert!(fields::total_width(layout::ALL) == DATA_LENGTH * 8);
    assert!(fields::is_contiguous(layout::ALL));
};

/// One decoded packet: the meter's full display and mode state at the moment
/// the packet was sent.
///
/// Holds the 7 corrected data bytes and extracts each field on access.
/// Immutable after construction; copying it copies the whole reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    data: [u8; DATA_LENGTH],
}

impl Reading {
    /// Build a reading from an already validated and bit-corrected buffer
    pub fn from_data(data: [u8; DATA_LENGTH]) -> Self {
        Self { data }
    }

    /// The corrected data bytes backing this reading
    pub fn data(&self) -> &[u8; DATA_LENGTH] {
        &self.data
    }

    fn field(&self, spec: FieldSpec) -> u8 {
        spec.extract(&self.data)
    }

    fn flag(&self, spec: FieldSpec) -> bool {
        self.field(spec) != 0
    }

    pub fn ac(&self) -> bool {
        self.flag(layout::AC)
    }

    pub fn dc(&self) -> bool {
        self.flag(layout::DC)
    }

    pub fn autorange(&self) -> bool {
        self.flag(layout::AUTORANGE)
    }

    /// RS232 icon: the meter's serial link is active
    pub fn connected(&self) -> bool {
        self.flag(layout::CONNECTED)
    }

    pub fn negative(&self) -> bool {
        self.flag(layout::NEGATIVE)
    }

    /// Segment pattern of the leftmost digit
    pub fn first_digit(&self) -> u8 {
        self.field(layout::FIRST_DIGIT)
    }

    pub fn first_dp(&self) -> bool {
        self.flag(layout::FIRST_DP)
    }

    pub fn second_digit(&self) -> u8 {
        self.field(layout::SECOND_DIGIT)
    }

    pub fn second_dp(&self) -> bool {
        self.flag(layout::SECOND_DP)
    }

    pub fn third_digit(&self) -> u8 {
        self.field(layout::THIRD_DIGIT)
    }

    pub fn third_dp(&self) -> bool {
        self.flag(layout::THIRD_DP)
    }

    pub fn fourth_digit(&self) -> u8 {
        self.field(layout::FOURTH_DIGIT)
    }

    pub fn micro(&self) -> bool {
        self.flag(layout::MICRO)
    }

    pub fn nano(&self) -> bool {
        self.flag(layout::NANO)
    }

    pub fn kilo(&self) -> bool {
        self.flag(layout::KILO)
    }

    pub fn diode(&self) -> bool {
        self.flag(layout::DIODE)
    }

    pub fn milli(&self) -> bool {
        self.flag(layout::MILLI)
    }

    pub fn percent(&self) -> bool {
        self.flag(layout::PERCENT)
    }

    pub fn mega(&self) -> bool {
        self.flag(layout::MEGA)
    }

    pub fn continuity(&self) -> bool {
        self.flag(layout::CONTINUITY)
    }

    pub fn capacitance(&self) -> bool {
        self.flag(layout::CAPACITANCE)
    }

    pub fn ohm(&self) -> bool {
        self.flag(layout::OHM)
    }

    pub fn relative(&self) -> bool {
        self.flag(layout::RELATIVE)
    }

    pub fn hold(&self) -> bool {
        self.flag(layout::HOLD)
    }

    pub fn amp(&self) -> bool {
        self.flag(layout::AMP)
    }

    pub fn volts(&self) -> bool {
        self.flag(layout::VOLTS)
    }

    pub fn hertz(&self) -> bool {
        self.flag(layout::HERTZ)
    }

    pub fn low_battery(&self) -> bool {
        self.flag(layout::LOW_BATTERY)
    }

    pub fn minimum(&self) -> bool {
        self.flag(layout::MINIMUM)
    }

    pub fn celsius(&self) -> bool {
        self.flag(layout::CELSIUS)
    }

    pub fn fahrenheit(&self) -> bool {
        self.flag(layout::FAHRENHEIT)
    }

    pub fn maximum(&self) -> bool {
        self.flag(layout::MAXIMUM)
    }

    /// Iterate over every (field name, raw value) pair of the layout
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, u8)> + '_ {
        layout::ALL
            .iter()
            .map(move |spec| (spec.name, spec.extract(&self.data)))
    }

    /// The reading as shown on the LCD, e.g. "-12.34" or "0L"
    ///
    /// Unmapped segment patterns render as nothing, matching a blank digit.
    pub fn display(&self) -> String {
        let digits = [
            (self.first_digit(), self.first_dp()),
            (self.second_digit(), self.second_dp()),
            (self.third_digit(), self.third_dp()),
            (self.fourth_digit(), false),
        ];

        let mut out = String::new();
        if self.negative() {
            out.push('-');
        }
        for (pattern, dp) in digits {
            if let Some(c) = lookup_digit(pattern) {
                out.push(c);
            }
            if dp {
                out.push('.');
            }
        }
        out
    }

    /// The displayed value as a number, in the displayed unit
    ///
    /// Fails when the display is not numeric, e.g. over-range ("0L") or a
    /// blank display.
    pub fn value(&self) -> Result<f64> {
        let text = self.display();
        text.parse::<f64>()
            .map_err(|_| ReadingError::NonNumeric(text))
    }

    /// The displayed value scaled to its base unit, e.g. 2.0 mV -> 0.002 V
    pub fn base_value(&self) -> Result<f64> {
        Ok(units::base_value(&self.units(), self.value()?))
    }

    /// Every unit annunciator lit on the display, in layout order
    pub fn units(&self) -> Vec<Unit> {
        let mut out = Vec::new();
        let lit = [
            (self.micro(), Unit::Micro),
            (self.nano(), Unit::Nano),
            (self.kilo(), Unit::Kilo),
            (self.milli(), Unit::Milli),
            (self.percent(), Unit::Percent),
            (self.mega(), Unit::Mega),
            (self.ohm(), Unit::Ohm),
            (self.amp(), Unit::Amp),
            (self.volts(), Unit::Volt),
            (self.hertz(), Unit::Hertz),
            (self.celsius(), Unit::Celsius),
            (self.fahrenheit(), Unit::Fahrenheit),
        ];
        for (set, unit) in lit {
            if set {
                out.push(unit);
            }
        }
        out
    }

    /// Every mode/state annunciator lit on the display, in layout order
    pub fn flags(&self) -> Vec<Flag> {
        let mut out = Vec::new();
        let lit = [
            (self.ac(), Flag::Ac),
            (self.dc(), Flag::Dc),
            (self.autorange(), Flag::Auto),
            (self.connected(), Flag::Connected),
            (self.diode(), Flag::Diode),
            (self.continuity(), Flag::Continuity),
            (self.capacitance(), Flag::Capacitance),
            (self.relative(), Flag::Relative),
            (self.hold(), Flag::Hold),
            (self.low_battery(), Flag::LowBattery),
            (self.minimum(), Flag::Minimum),
            (self.maximum(), Flag::Maximum),
        ];
        for (set, flag) in lit {
            if set {
                out.push(flag);
            }
        }
        out
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = units::readable_unit(&self.units());
        if unit.is_empty() {
            write!(f, "{}", self.display())
        } else {
            write!(f, "{} {}", self.display(), unit)
        }
    }
}
