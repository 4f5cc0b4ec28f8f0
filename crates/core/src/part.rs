//! Part records: the compound payload behind `Token::Part`.
//!
//! # Layout
//!
//! ```text
//! index(nibble) 0 1 0                                   None
//! index(nibble) 1 value(nibble) 0 0 0                   Int
//! index(nibble) 0 0 1  01 [token value]* 00             List
//! ```
//!
//! List entries are `100` + nibble-chunked or `110` + length-prefixed
//! integers; the list opens with the separator-B pattern and closes with the
//! separator-A pattern.

use crate::bitio::{BitReader, BitWriter};
use crate::error::{BitIoError, Error, PartFault, Result, SerialError};
use crate::token::{next_token, Token, MAX_TOKEN_BITS};
use crate::varint::{
    cheapest_scheme, read_bit_run, read_nibble, write_bit_run, write_nibble, Scheme,
};

/// Sub-type flags after the index, when the first flag bit is 0.
const FLAGS_NONE: u64 = 0b10;
const FLAGS_LIST: u64 = 0b01;

/// Width of the fixed trailer after an Int part's value.
const INT_TERMINATOR_BITS: usize = 3;

/// Part shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubType {
    None,
    Int,
    List,
}

/// One entry of a list part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListValue {
    /// Written as `Token::Integer` + nibble-chunked value
    Int(u32),
    /// Written as `Token::BitRun` + length-prefixed value
    Bit(u32),
}

impl ListValue {
    /// Tag `value` with whichever scheme encodes it in fewer bits.
    pub fn cheapest(value: u32) -> Self {
        match cheapest_scheme(value) {
            Scheme::Nibble => ListValue::Int(value),
            Scheme::BitRun => ListValue::Bit(value),
        }
    }

    pub fn value(&self) -> u32 {
        match *self {
            ListValue::Int(v) | ListValue::Bit(v) => v,
        }
    }
}

/// Payload of a part, determined by its sub-type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PartBody {
    None,
    Int(u32),
    List(Vec<ListValue>),
}

/// An item component reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Part {
    pub index: u32,
    pub body: PartBody,
}

impl Part {
    /// `{index}`
    pub fn none(index: u32) -> Self {
        Self {
            index,
            body: PartBody::None,
        }
    }

    /// `{index:value}`
    pub fn int(index: u32, value: u32) -> Self {
        Self {
            index,
            body: PartBody::Int(value),
        }
    }

    /// `{index:[values]}`
    pub fn list(index: u32, values: Vec<ListValue>) -> Self {
        Self {
            index,
            body: PartBody::List(values),
        }
    }

    pub fn sub_type(&self) -> SubType {
        match self.body {
            PartBody::None => SubType::None,
            PartBody::Int(_) => SubType::Int,
            PartBody::List(_) => SubType::List,
        }
    }

    /// Append this part (without its leading `Token::Part`).
    ///
    /// # Errors
    /// `EncodeError::ValueOutOfRange` if any integer exceeds its scheme.
    pub fn write(&self, writer: &mut BitWriter) -> Result<()> {
        write_nibble(writer, self.index)?;

        match &self.body {
            PartBody::None => {
                writer.write_bit(false);
                writer.write_bits(FLAGS_NONE, 2)?;
            }
            PartBody::Int(value) => {
                writer.write_bit(true);
                write_nibble(writer, *value)?;
                writer.write_bits(0, INT_TERMINATOR_BITS)?;
            }
            PartBody::List(values) => {
                writer.write_bit(false);
                writer.write_bits(FLAGS_LIST, 2)?;
                Token::SeparatorB.write(writer)?;
                for entry in values {
                    match *entry {
                        ListValue::Int(v) => {
                            Token::Integer.write(writer)?;
                            write_nibble(writer, v)?;
                        }
                        ListValue::Bit(v) => {
                            Token::BitRun.write(writer)?;
                            write_bit_run(writer, v)?;
                        }
                    }
                }
                Token::SeparatorA.write(writer)?;
            }
        }

        Ok(())
    }

    /// Read a part whose `Token::Part` prefix has already been consumed.
    ///
    /// # Errors
    /// - `SerialError::MalformedPart` for unknown flags or a bad list token
    /// - `BitIoError::Truncated` if the stream ends inside the part
    pub fn read(reader: &mut BitReader<'_>) -> Result<Self> {
        let start = reader.position();
        let index = read_nibble(reader)?;

        if reader.read_bit()? {
            let value = read_nibble(reader)?;
            reader.read_bits(INT_TERMINATOR_BITS)?;
            return Ok(Self::int(index, value));
        }

        match reader.read_bits(2)? {
            FLAGS_NONE => Ok(Self::none(index)),
            FLAGS_LIST => {
                let values = read_list(reader, start)?;
                Ok(Self::list(index, values))
            }
            flags => Err(malformed(start, PartFault::UnknownFlags(flags as u8))),
        }
    }
}

fn read_list(reader: &mut BitReader<'_>, start: usize) -> Result<Vec<ListValue>> {
    match list_token(reader)? {
        Token::SeparatorB => {}
        other => return Err(malformed(start, PartFault::MissingListOpen(other))),
    }

    let mut values = Vec::new();
    loop {
        match list_token(reader)? {
            Token::SeparatorA => return Ok(values),
            Token::Integer => values.push(ListValue::Int(read_nibble(reader)?)),
            Token::BitRun => values.push(ListValue::Bit(read_bit_run(reader)?)),
            token => return Err(malformed(start, PartFault::UnexpectedListToken(token))),
        }
    }
}

/// Next token inside a list, where running out of bits is an error.
fn list_token(reader: &mut BitReader<'_>) -> Result<Token> {
    next_token(reader).ok_or_else(|| {
        BitIoError::Truncated {
            requested: MAX_TOKEN_BITS,
            available: reader.bits_remaining(),
        }
        .into()
    })
}

fn malformed(position: usize, reason: PartFault) -> Error {
    SerialError::MalformedPart { position, reason }.into()
}
