//! CSV logging of decoded readings

use crate::core::Reading;
use crate::formats::record::ReadingRecord;
use chrono::{DateTime, Local};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CsvError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CsvError>;

/// Log column order
const COLUMNS: &[&str] = &["time", "value", "unit"];

/// Append-mode CSV log of meter readings.
///
/// Each open writes a fresh header row, so a reused file reads as a sequence
/// of logging sessions.
pub struct CsvLog {
    file: File,
}

impl CsvLog {
    /// Open `path` for appending and write the header row
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        tracing::debug!("logging readings to {}", path.as_ref().display());

        let mut log = Self { file };
        log.write_row(&COLUMNS.join(","))?;
        Ok(log)
    }

    /// Append one decoded reading, stamped with the current local time
    pub fn log_reading(&mut self, reading: &Reading) -> Result<()> {
        self.log_record(Local::now(), &ReadingRecord::from(reading))
    }

    /// Append an explicit value/unit pair
    pub fn log_value(&mut self, value: f64, unit: &str) -> Result<()> {
        let row = format!("{},{},{}", Local::now().to_rfc3339(), value, unit);
        self.write_row(&row)
    }

    fn log_record(&mut self, time: DateTime<Local>, record: &ReadingRecord) -> Result<()> {
        // Non-numeric readings (e.g. over-range "0L") log their display text
        let value = match record.value {
            Some(v) => v.to_string(),
            None => record.display.clone(),
        };
        let row = format!("{},{},{}", time.to_rfc3339(), value, record.unit);
        self.write_row(&row)
    }

    fn write_row(&mut self, row: &str) -> Result<()> {
        writeln!(self.file, "{}", row)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::decode;
    use std::fs;
    use tempfile::NamedTempFile;

    const SAMPLE: [u8; 14] = [
        0x17, 0x27, 0x3D, 0x47, 0x5D, 0x65, 0x7B, 0x89, 0x97, 0xA0, 0xB8, 0xC0, 0xD4, 0xE1,
    ];

    #[test]
    fn test_log_values() -> Result<()> {
        let temp = NamedTempFile::new().unwrap();

        let mut log = CsvLog::create(temp.path())?;
        for i in 0..5 {
            log.log_value(i as f64, "V")?;
        }
        drop(log);

        let content = fs::read_to_string(temp.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "time,value,unit");

        for (i, line) in lines[1..].iter().enumerate() {
            let cells: Vec<&str> = line.split(',').collect();
            assert_eq!(cells.len(), 3);
            assert!(cells[0].contains('T')); // RFC 3339 timestamp
            assert_eq!(cells[1], i.to_string());
            assert_eq!(cells[2], "V");
        }

        Ok(())
    }

    #[test]
    fn test_log_reading() -> Result<()> {
        let temp = NamedTempFile::new().unwrap();
        let reading = decode(&SAMPLE).unwrap();

        let mut log = CsvLog::create(temp.path())?;
        log.log_reading(&reading)?;
        drop(log);

        let content = fs::read_to_string(temp.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let cells: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(cells[1], "2");
        assert_eq!(cells[2], "mV");

        Ok(())
    }

    #[test]
    fn test_reopen_appends_new_header() -> Result<()> {
        let temp = NamedTempFile::new().unwrap();

        let mut log = CsvLog::create(temp.path())?;
        log.log_value(1.0, "V")?;
        drop(log);

        let mut log = CsvLog::create(temp.path())?;
        log.log_value(2.0, "V")?;
        drop(log);

        let content = fs::read_to_string(temp.path()).unwrap();
        let headers = content
            .lines()
            .filter(|l| *l == "time,value,unit")
            .count();
        assert_eq!(headers, 2);

        Ok(())
    }
}
