// Input/output formats around the decoder
pub mod csv;
pub mod hex;
pub mod record;

pub use csv::{CsvError, CsvLog};
pub use hex::{parse_hex, HexError};
pub use record::ReadingRecord;
