// FS9721-RS: decoder for the FS9721_LP3 multimeter serial packet format

pub mod bitwise;
pub mod core;
pub mod formats;
pub mod protocol;

// Re-export commonly used types
pub use bitwise::{reverse_bits, FieldSpec};
pub use self::core::{
    lookup_digit, readable_unit, reading::DATA_LENGTH, Flag, Reading, ReadingError, Unit,
};
pub use formats::{parse_hex, CsvLog, ReadingRecord};
pub use protocol::{decode, DecodeError, PACKET_LENGTH};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
