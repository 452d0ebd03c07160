// Serializable snapshot of a decoded reading

use crate::core::units::{readable_unit, Flag, Unit};
use crate::core::Reading;
use serde::{Deserialize, Serialize};

/// A reading flattened into plain values for export (JSON, CSV)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ReadingRecord {
    /// LCD text, e.g. "-12.34" or "0L"
    pub display: String,

    /// Numeric value in the displayed unit; None for non-numeric displays
    pub value: Option<f64>,

    /// Rendered unit string, e.g. "mV"
    pub unit: String,

    /// Unit annunciators, in layout order
    pub units: Vec<Unit>,

    /// Mode/state annunciators, in layout order
    pub flags: Vec<Flag>,
}

impl ReadingRecord {
    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<&Reading> for ReadingRecord {
    fn from(reading: &Reading) -> Self {
        let units = reading.units();
        Self {
            display: reading.display(),
            value: reading.value().ok(),
            unit: readable_unit(&units),
            units,
            flags: reading.flags(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::decode;

    const SAMPLE: [u8; 14] = [
        0x17, 0x27, 0x3D, 0x47, 0x5D, 0x65, 0x7B, 0x89, 0x97, 0xA0, 0xB8, 0xC0, 0xD4, 0xE1,
    ];

    #[test]
    fn test_record_from_reading() {
        let reading = decode(&SAMPLE).unwrap();
        let record = ReadingRecord::from(&reading);

        assert_eq!(record.display, "002.");
        assert_eq!(record.value, Some(2.0));
        assert_eq!(record.unit, "mV");
        assert_eq!(record.units, vec![Unit::Milli, Unit::Volt]);
        assert!(record.flags.contains(&Flag::Dc));
    }

    #[test]
    fn test_non_numeric_value_is_none() {
        let record = ReadingRecord {
            display: "0L".to_string(),
            ..Default::default()
        };
        assert_eq!(record.value, None);
    }

    #[test]
    fn test_json_round_trip() {
        let reading = decode(&SAMPLE).unwrap();
        let record = ReadingRecord::from(&reading);

        let json = record.to_json().unwrap();
        let parsed = ReadingRecord::from_json(&json).unwrap();
        assert_eq!(parsed, record);
    }
}
