//! Hex text input format
//!
//! Parses byte listings like "17 27 3D 47" (optionally with 0x prefixes or
//! comma separators) into raw bytes for the decoder.

use nom::bytes::complete::{tag, take_while, take_while_m_n};
use nom::combinator::{map_res, opt};
use nom::multi::many1;
use nom::sequence::{delimited, preceded};
use nom::{IResult, Parser};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum HexError {
    #[error("not a hex byte listing: {0}")]
    Parse(String),

    #[error("trailing input after hex bytes: {0:?}")]
    Trailing(String),
}

pub type Result<T> = std::result::Result<T, HexError>;

fn is_separator(c: char) -> bool {
    c.is_ascii_whitespace() || c == ','
}

fn separator0(input: &str) -> IResult<&str, &str> {
    take_while(is_separator).parse(input)
}

/// One byte: two hex digits, optionally prefixed with "0x"
fn hex_byte(input: &str) -> IResult<&str, u8> {
    preceded(
        opt(tag("0x")),
        map_res(
            take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit()),
            |s: &str| u8::from_str_radix(s, 16),
        ),
    )
    .parse(input)
}

/// Parse a hex byte listing into raw bytes.
///
/// The whole input must be consumed; leftover text (including an odd
/// trailing digit) is an error rather than being silently dropped.
pub fn parse_hex(input: &str) -> Result<Vec<u8>> {
    let (rest, bytes) = many1(delimited(separator0, hex_byte, separator0))
        .parse(input)
        .map_err(|e| HexError::Parse(format!("{e:?}")))?;

    if !rest.is_empty() {
        return Err(HexError::Trailing(rest.to_string()));
    }

    Ok(bytes)
}
