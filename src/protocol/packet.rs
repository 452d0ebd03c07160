// Wire format of the 14-byte control packet
//
// Each packet byte carries a 1-based sequence tag in its high nibble and
// 4 bits of payload in its low nibble. Consecutive byte pairs merge into one
// data byte, and every merged byte is bit-reversed before the field layout
// applies.

use crate::bitwise::{high_nibble, low_nibble, merge_nibbles, reverse_bits};
use crate::core::reading::{Reading, DATA_LENGTH};
use thiserror::Error;

/// Number of raw bytes in one packet as sent by the meter
pub const PACKET_LENGTH: usize = 14;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid packet length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("packet out of sequence at byte {index}: tag {tag:#x}")]
    SequenceMismatch { index: usize, tag: u8 },
}

pub type Result<T> = std::result::Result<T, DecodeError>;

/// Decode one raw packet into a [`Reading`].
///
/// Validates the length and the per-byte sequence tags, merges the payload
/// nibbles into 7 data bytes and applies the bit-order correction. Fails on
/// the first byte whose tag does not match its position; nothing is decoded
/// past that point.
///
/// Pure function over its input: no state is retained across calls, and a
/// malformed packet never produces a partial reading.
pub fn decode(raw: &[u8]) -> Result<Reading> {
    if raw.len() != PACKET_LENGTH {
        return Err(DecodeError::InvalidLength {
            expected: PACKET_LENGTH,
            actual: raw.len(),
        });
    }

    let mut data = [0u8; DATA_LENGTH];
    for (index, &byte) in raw.iter().enumerate() {
        let tag = high_nibble(byte);
        if tag as usize != index + 1 {
            return Err(DecodeError::SequenceMismatch { index, tag });
        }

        let payload = low_nibble(byte);
        if index % 2 == 0 {
            data[index / 2] = merge_nibbles(payload, 0);
        } else {
            data[index / 2] |= payload;
        }
    }

    for byte in &mut data {
        *byte = reverse_bits(*byte);
    }

    Ok(Reading::from_data(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::units::{Flag, Unit};

    // Real capture: 002. mV, DC, autorange, RS232 connected
    const SAMPLE: [u8; PACKET_LENGTH] = [
        0x17, 0x27, 0x3D, 0x47, 0x5D, 0x65, 0x7B, 0x89, 0x97, 0xA0, 0xB8, 0xC0, 0xD4, 0xE1,
    ];

    #[test]
    fn test_decode_golden_packet() {
        let reading = decode(&SAMPLE).unwrap();
        assert_eq!(reading.data(), &[0xEE, 0xEB, 0xAB, 0x9D, 0x0E, 0x01, 0x82]);
        assert_eq!(reading.display(), "002.");
        assert_eq!(reading.units(), vec![Unit::Milli, Unit::Volt]);
        assert_eq!(
            reading.flags(),
            vec![Flag::Dc, Flag::Auto, Flag::Connected, Flag::Maximum]
        );
    }

    #[test]
    fn test_decode_more_captures() {
        // 010.9 mV
        let raw = [
            0x17, 0x27, 0x3D, 0x40, 0x55, 0x67, 0x7D, 0x8B, 0x9F, 0xA0, 0xB8, 0xC0, 0xD4, 0xE1,
        ];
        let reading = decode(&raw).unwrap();
        assert_eq!(reading.display(), "010.9");
        assert_eq!(reading.units(), vec![Unit::Milli, Unit::Volt]);

        // 0006 Celsius
        let raw = [
            0x15, 0x27, 0x3D, 0x47, 0x5D, 0x67, 0x7D, 0x87, 0x9E, 0xA0, 0xB0, 0xC0, 0xD0, 0xE4,
        ];
        let reading = decode(&raw).unwrap();
        assert_eq!(reading.display(), "0006");
        assert_eq!(reading.units(), vec![Unit::Celsius]);
        assert_eq!(reading.flags(), vec![Flag::Dc, Flag::Connected]);
    }

    #[test]
    fn test_decode_negative_reading() {
        // Same capture with the sign bit set in byte 1's payload
        let mut raw = SAMPLE;
        raw[1] = 0x2F;
        let reading = decode(&raw).unwrap();
        assert!(reading.negative());
        assert_eq!(reading.display(), "-002.");
        assert_eq!(reading.value().unwrap(), -2.0);
    }

    #[test]
    fn test_decode_is_idempotent() {
        let first = decode(&SAMPLE).unwrap();
        let second = decode(&SAMPLE).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.display(), second.display());
    }

    #[test]
    fn test_invalid_length() {
        assert_eq!(
            decode(&[]),
            Err(DecodeError::InvalidLength {
                expected: PACKET_LENGTH,
                actual: 0
            })
        );
        assert_eq!(
            decode(&SAMPLE[..13]),
            Err(DecodeError::InvalidLength {
                expected: PACKET_LENGTH,
                actual: 13
            })
        );

        let mut long = SAMPLE.to_vec();
        long.push(0xF0);
        assert_eq!(
            decode(&long),
            Err(DecodeError::InvalidLength {
                expected: PACKET_LENGTH,
                actual: 15
            })
        );
    }

    #[test]
    fn test_sequence_mismatch_reports_index() {
        // Corrupt the tag of each byte in turn
        for index in 0..PACKET_LENGTH {
            let mut raw = SAMPLE;
            let bad_tag = if index == 0 { 0x2 } else { 0x1 };
            raw[index] = (bad_tag << 4) | (raw[index] & 0x0F);
            assert_eq!(
                decode(&raw),
                Err(DecodeError::SequenceMismatch {
                    index,
                    tag: bad_tag
                })
            );
        }
    }

    #[test]
    fn test_sequence_check_fails_fast() {
        // Bytes after the first bad tag never affect the outcome
        let mut raw = SAMPLE;
        raw[3] = 0x17;
        raw[7] = 0x00;
        assert_eq!(
            decode(&raw),
            Err(DecodeError::SequenceMismatch { index: 3, tag: 0x1 })
        );
    }
}
