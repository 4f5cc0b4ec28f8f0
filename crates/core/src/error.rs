//! Error types for the serial codec.
//!
//! All operations return structured errors rather than panicking.
//! Every error is terminal for the call that produced it: there is no
//! partial result and no internal retry.

use thiserror::Error;

use crate::token::Token;

/// Top-level error type for all codec operations.
///
/// Each variant corresponds to a specific failure domain:
/// - Alphabet: text <-> byte transcoding
/// - Bit I/O: reading/writing bits from/to byte buffers
/// - Serial: structural decode failures (header, tokens, parts)
/// - Encode: values the wire format cannot represent
/// - Text: the human-editable textual form
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Text could not be transcoded into bytes
    #[error("alphabet error: {0}")]
    Alphabet(#[from] AlphabetError),

    /// Bit I/O operation failed (e.g., reading past end of buffer)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Decoded bit stream is structurally invalid
    #[error("serial error: {0}")]
    Serial(#[from] SerialError),

    /// A block carries a value the wire format cannot hold
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Textual form could not be parsed
    #[error("text error: {0}")]
    Text(#[from] TextError),
}

/// Custom-alphabet transcoding errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AlphabetError {
    /// Character outside the 85-symbol alphabet
    #[error("invalid character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },

    /// Exactly one character left over after the last full group
    #[error("truncated group: single trailing character at position {position}")]
    TruncatedGroup { position: usize },
}

/// Bit-level I/O errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BitIoError {
    /// Attempted to read more bits than available
    #[error("truncated bit stream: requested {requested} bits, available {available}")]
    Truncated { requested: usize, available: usize },

    /// Invalid bit count (more than 64 bits in one call)
    #[error("invalid bit count: {0}")]
    InvalidBitCount(usize),

    /// Attempted to move the cursor before the first bit
    #[error("cannot rewind {requested} bits from position {position}")]
    RewindPastStart { requested: usize, position: usize },
}

/// Structural decode errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerialError {
    /// First 7 bits are not the fixed magic value
    #[error("invalid magic header: expected {expected}, got {found}")]
    InvalidMagicHeader { expected: u8, found: u8 },

    /// Unsupported token seen before any part block
    #[error("unparseable item: unsupported token at bit {position} before any part")]
    UnsupportedItemToken { position: usize },

    /// Unexpected flag combination or token inside a part
    #[error("malformed part at bit {position}: {reason}")]
    MalformedPart { position: usize, reason: PartFault },
}

/// What exactly went wrong inside a part record.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PartFault {
    /// The two sub-type flag bits form no known shape
    #[error("unknown sub-type flags {0:#04b}")]
    UnknownFlags(u8),

    /// List body does not start with the open marker
    #[error("expected list-open marker, got {0:?}")]
    MissingListOpen(Token),

    /// List body holds something other than integer or bit-run entries
    #[error("unexpected token {0:?} in list")]
    UnexpectedListToken(Token),
}

/// Values that do not fit their wire encoding.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// Value exceeds the ceiling of the integer scheme it must be written with
    #[error("{scheme} value {value} exceeds maximum {max}")]
    ValueOutOfRange {
        scheme: &'static str,
        value: u32,
        max: u32,
    },
}

/// Textual form parse errors. Positions are byte offsets into the input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TextError {
    /// Opening quote without a closing one
    #[error("unterminated text literal starting at {position}")]
    UnterminatedLiteral { position: usize },

    /// Opening brace without a closing one
    #[error("unmatched '{{' at {position}")]
    UnmatchedBrace { position: usize },

    /// Braces present but the contents are not a part
    #[error("invalid part {text:?} at {position}")]
    InvalidPart { text: String, position: usize },

    /// Character that starts no token
    #[error("invalid character {character:?} at {position}")]
    InvalidCharacter { character: char, position: usize },

    /// Digits that do not fit in 32 bits
    #[error("number {text} at {position} is out of range")]
    NumberOutOfRange { text: String, position: usize },

    /// Quoted name with no alias entry
    #[error("unknown alias {name:?} at {position}")]
    UnknownAlias { name: String, position: usize },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
