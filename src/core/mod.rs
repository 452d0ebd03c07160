// Core data structures: the decoded reading and its vocabulary

pub mod reading;
pub mod segments;
pub mod units;

// Re-export commonly used types
pub use reading::{Reading, ReadingError, DATA_LENGTH};
pub use segments::lookup_digit;
pub use units::{base_value, readable_unit, Flag, Unit};
