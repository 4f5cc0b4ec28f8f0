//! Serial assembly and disassembly.
//!
//! # Wire Format
//!
//! ```text
//! "@U" + alphabet( mirror( magic(7) ‖ block* ‖ zero padding ) )
//! ```
//!
//! The magic header is the 7-bit value 16 (`0010000`). Each block is a token
//! (see [`crate::token`]) followed by its payload:
//!
//! | token       | payload                    |
//! |-------------|----------------------------|
//! | separator A | none                       |
//! | separator B | none                       |
//! | integer     | nibble-chunked value       |
//! | bit-run     | length-prefixed value      |
//! | part        | [`Part`] record            |
//! | unsupported | stream ends                |
//!
//! # Trailing Padding
//!
//! The zero bits that pad the last byte read back as separator-A tokens. A
//! decoded serial keeps at most one trailing separator-A; the rest are
//! dropped.

use tracing::{debug, trace};

use crate::alphabet;
use crate::bitio::{BitReader, BitWriter};
use crate::error::{Result, SerialError};
use crate::mirror::{mirror, mirror_in_place};
use crate::part::Part;
use crate::stats::DecodeStats;
use crate::token::{next_token, Token};
use crate::varint::{read_bit_run, read_nibble, write_bit_run, write_nibble};

/// Value of the 7-bit magic header.
pub const MAGIC: u8 = 16;

/// Width of the magic header in bits.
pub const MAGIC_BITS: usize = 7;

/// One unit of a serial.
///
/// The variant fixes which payload is present, so a block can never carry
/// both a value and a part.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Block {
    /// `|`
    SeparatorA,
    /// `,`
    SeparatorB,
    /// Nibble-chunked integer (at most 16 bits)
    Integer(u32),
    /// Length-prefixed integer (at most 31 bits)
    BitRun(u32),
    Part(Part),
}

impl Block {
    pub fn token(&self) -> Token {
        match self {
            Block::SeparatorA => Token::SeparatorA,
            Block::SeparatorB => Token::SeparatorB,
            Block::Integer(_) => Token::Integer,
            Block::BitRun(_) => Token::BitRun,
            Block::Part(_) => Token::Part,
        }
    }

    /// Integer payload of integer and bit-run blocks.
    pub fn value(&self) -> Option<u32> {
        match *self {
            Block::Integer(v) | Block::BitRun(v) => Some(v),
            _ => None,
        }
    }

    pub fn part(&self) -> Option<&Part> {
        match self {
            Block::Part(part) => Some(part),
            _ => None,
        }
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, Block::SeparatorA | Block::SeparatorB)
    }

    /// Append token and payload.
    pub fn write(&self, writer: &mut BitWriter) -> Result<()> {
        self.token().write(writer)?;
        match self {
            Block::SeparatorA | Block::SeparatorB => Ok(()),
            Block::Integer(v) => write_nibble(writer, *v),
            Block::BitRun(v) => write_bit_run(writer, *v),
            Block::Part(part) => part.write(writer),
        }
    }
}

/// Ordered block sequence for one item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Serial {
    blocks: Vec<Block>,
}

impl Serial {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Part blocks in order.
    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.blocks.iter().filter_map(Block::part)
    }
}

impl From<Vec<Block>> for Serial {
    fn from(blocks: Vec<Block>) -> Self {
        Self::new(blocks)
    }
}

impl FromIterator<Block> for Serial {
    fn from_iter<I: IntoIterator<Item = Block>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Serial {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

impl IntoIterator for Serial {
    type Item = Block;
    type IntoIter = std::vec::IntoIter<Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.into_iter()
    }
}

/// Decode a wire string into a serial.
///
/// Surrounding whitespace is ignored and the `@U` prefix is optional.
///
/// # Errors
/// - `AlphabetError` if the text is not valid alphabet text
/// - `SerialError::InvalidMagicHeader` if the first 7 bits are not 16, or
///   there are fewer than 7
/// - `SerialError::UnsupportedItemToken` if the unsupported token appears
///   before any part
/// - `SerialError::MalformedPart` for a broken part record
/// - `BitIoError::Truncated` if the stream ends inside a payload, parts
///   included
pub fn decode(text: &str) -> Result<Serial> {
    decode_with_stats(text).map(|(serial, _)| serial)
}

/// Decode a wire string, also returning per-call statistics.
pub fn decode_with_stats(text: &str) -> Result<(Serial, DecodeStats)> {
    let text = text.trim();
    let bytes = mirror(&alphabet::decode(text)?);
    let mut reader = BitReader::new(&bytes);

    let mut stats = DecodeStats::new();
    stats.text_len = text.chars().count();
    stats.payload_bits = reader.bit_len();

    // A payload too short for the header is reported as a bad header.
    let header_bits = reader.bits_remaining().min(MAGIC_BITS);
    let magic = reader.read_bits(header_bits)? as u8;
    if header_bits < MAGIC_BITS || magic != MAGIC {
        return Err(SerialError::InvalidMagicHeader {
            expected: MAGIC,
            found: magic,
        }
        .into());
    }

    let mut blocks = Vec::new();
    let mut seen_part = false;
    let mut trailing_separators = 0usize;

    while let Some(token) = next_token(&mut reader) {
        trace!(?token, position = reader.position(), "token");

        let block = match token {
            Token::Unsupported if seen_part => {
                stats.stopped_at_unsupported = true;
                break;
            }
            Token::Unsupported => {
                return Err(SerialError::UnsupportedItemToken {
                    position: reader.position() - token.width(),
                }
                .into());
            }
            Token::SeparatorA => Block::SeparatorA,
            Token::SeparatorB => Block::SeparatorB,
            Token::Integer => Block::Integer(read_nibble(&mut reader)?),
            Token::BitRun => Block::BitRun(read_bit_run(&mut reader)?),
            Token::Part => {
                seen_part = true;
                Block::Part(Part::read(&mut reader)?)
            }
        };

        if token == Token::SeparatorA {
            trailing_separators += 1;
        } else {
            trailing_separators = 0;
        }

        stats.record(token);
        blocks.push(block);
    }
    stats.bits_consumed = reader.position();

    let excess = trailing_separators.saturating_sub(1);
    blocks.truncate(blocks.len() - excess);
    stats.strip_padding(excess);

    debug!(
        blocks = blocks.len(),
        bits = stats.payload_bits,
        consumed = stats.bits_consumed,
        stripped = excess,
        stopped_at_unsupported = stats.stopped_at_unsupported,
        "decoded serial"
    );

    Ok((Serial::new(blocks), stats))
}

/// Encode a serial into its wire string.
///
/// # Errors
/// `EncodeError::ValueOutOfRange` if an integer does not fit its scheme.
pub fn encode(serial: &Serial) -> Result<String> {
    let mut writer = BitWriter::new();
    writer.write_bits(MAGIC as u64, MAGIC_BITS)?;
    for block in serial {
        block.write(&mut writer)?;
    }

    let bits = writer.bit_len();
    let mut bytes = writer.finish();
    mirror_in_place(&mut bytes);
    let text = alphabet::encode(&bytes);

    debug!(blocks = serial.len(), bits, chars = text.len(), "encoded serial");
    Ok(text)
}
