//! Token discriminator.
//!
//! Every block in the stream starts with a 2- or 3-bit prefix:
//!
//! ```text
//! 00  separator A      100  integer (nibble-chunked)
//! 01  separator B      101  part
//!                      110  bit-run (length-prefixed)
//!                      111  unsupported
//! ```

use crate::bitio::{BitReader, BitWriter};
use crate::error::Result;

/// Width of the longest token pattern.
pub const MAX_TOKEN_BITS: usize = 3;

/// One of the six token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// `00`, rendered as `|`; also closes part lists
    SeparatorA,
    /// `01`, rendered as `,`; also opens part lists
    SeparatorB,
    /// `100`
    Integer,
    /// `101`
    Part,
    /// `110`
    BitRun,
    /// `111`
    Unsupported,
}

impl Token {
    /// Wire pattern, right-aligned.
    pub const fn bits(self) -> u64 {
        match self {
            Token::SeparatorA => 0b00,
            Token::SeparatorB => 0b01,
            Token::Integer => 0b100,
            Token::Part => 0b101,
            Token::BitRun => 0b110,
            Token::Unsupported => 0b111,
        }
    }

    /// Wire pattern length in bits.
    pub const fn width(self) -> usize {
        match self {
            Token::SeparatorA | Token::SeparatorB => 2,
            _ => 3,
        }
    }

    /// Append this token's pattern.
    pub fn write(self, writer: &mut BitWriter) -> Result<()> {
        writer.write_bits(self.bits(), self.width())
    }
}

/// Read the next token.
///
/// Returns `None` when fewer bits remain than the token needs; the cursor is
/// then left where it was.
pub fn next_token(reader: &mut BitReader<'_>) -> Option<Token> {
    let mut cursor = reader.clone();
    let token = read_token(&mut cursor)?;
    *reader = cursor;
    Some(token)
}

fn read_token(reader: &mut BitReader<'_>) -> Option<Token> {
    if !reader.read_bit().ok()? {
        return Some(if reader.read_bit().ok()? {
            Token::SeparatorB
        } else {
            Token::SeparatorA
        });
    }
    Some(match reader.read_bits(2).ok()? {
        0b00 => Token::Integer,
        0b01 => Token::Part,
        0b10 => Token::BitRun,
        _ => Token::Unsupported,
    })
}
