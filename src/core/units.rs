// Units and mode flags reported by the meter
// A reading carries at most one SI prefix and one base unit at a time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Measurement unit annunciator, either an SI prefix or a base unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    Nano,
    Micro,
    Milli,
    Kilo,
    Mega,
    Volt,
    Amp,
    Ohm,
    Percent,
    Fahrenheit,
    Celsius,
    Hertz,
}

impl Unit {
    /// SI prefix multiplier, None for base units
    pub fn multiplier(&self) -> Option<f64> {
        match self {
            Unit::Nano => Some(1e-9),
            Unit::Micro => Some(1e-6),
            Unit::Milli => Some(1e-3),
            Unit::Kilo => Some(1e3),
            Unit::Mega => Some(1e6),
            _ => None,
        }
    }

    /// Printable symbol, e.g. "m" for milli or "V" for volts
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Nano => "n",
            Unit::Micro => "u",
            Unit::Milli => "m",
            Unit::Kilo => "k",
            Unit::Mega => "M",
            Unit::Volt => "V",
            Unit::Amp => "A",
            Unit::Ohm => "Ohm",
            Unit::Percent => "%",
            Unit::Fahrenheit => "F",
            Unit::Celsius => "C",
            Unit::Hertz => "Hz",
        }
    }

    pub fn is_prefix(&self) -> bool {
        self.multiplier().is_some()
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Device state annunciator: mode, hold, battery and min/max indicators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Flag {
    Ac,
    Dc,
    Auto,
    Connected,
    Diode,
    Continuity,
    Capacitance,
    Relative,
    Hold,
    Minimum,
    Maximum,
    LowBattery,
}

impl Flag {
    /// Label as shown on the meter LCD
    pub fn label(&self) -> &'static str {
        match self {
            Flag::Ac => "AC",
            Flag::Dc => "DC",
            Flag::Auto => "AUTO",
            Flag::Connected => "RS232",
            Flag::Diode => "DIODE",
            Flag::Continuity => "BEEP",
            Flag::Capacitance => "CAP",
            Flag::Relative => "REL",
            Flag::Hold => "HOLD",
            Flag::Minimum => "MIN",
            Flag::Maximum => "MAX",
            Flag::LowBattery => "LOWBAT",
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Render a unit list as a single string, e.g. [Milli, Volt] -> "mV"
///
/// The first prefix and the first base unit present are used; a well-formed
/// packet never sets more than one of each.
pub fn readable_unit(units: &[Unit]) -> String {
    let prefix = units.iter().find(|u| u.is_prefix());
    let base = units.iter().find(|u| !u.is_prefix());

    let mut out = String::new();
    if let Some(p) = prefix {
        out.push_str(p.symbol());
    }
    if let Some(b) = base {
        out.push_str(b.symbol());
    }
    out
}

/// Scale a displayed value into the base unit, e.g. 2.0 with [Milli, Volt]
/// becomes 0.002 (volts)
pub fn base_value(units: &[Unit], value: f64) -> f64 {
    match units.iter().find_map(|u| u.multiplier()) {
        Some(multiplier) => value * multiplier,
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readable_unit() {
        assert_eq!(readable_unit(&[Unit::Milli, Unit::Volt]), "mV");
        assert_eq!(readable_unit(&[Unit::Volt, Unit::Milli]), "mV");
        assert_eq!(readable_unit(&[Unit::Mega, Unit::Ohm]), "MOhm");
        assert_eq!(readable_unit(&[Unit::Celsius]), "C");
        assert_eq!(readable_unit(&[Unit::Kilo]), "k");
        assert_eq!(readable_unit(&[]), "");
    }

    #[test]
    fn test_base_value() {
        assert_eq!(base_value(&[Unit::Milli, Unit::Volt], 2.0), 0.002);
        assert_eq!(base_value(&[Unit::Kilo, Unit::Ohm], 4.7), 4700.0);
        assert_eq!(base_value(&[Unit::Mega, Unit::Hertz], 1.5), 1_500_000.0);
        assert_eq!(base_value(&[Unit::Volt], 3.3), 3.3);
        assert_eq!(base_value(&[], 9.0), 9.0);
    }

    #[test]
    fn test_flag_labels() {
        assert_eq!(Flag::Auto.to_string(), "AUTO");
        assert_eq!(Flag::LowBattery.to_string(), "LOWBAT");
    }
}
