//! The two variable-length integer encodings.
//!
//! # Nibble-chunked (`Token::Integer`)
//!
//! ```text
//! [d0 d1 d2 d3 c] [d4 d5 d6 d7 c] ...   at most 4 groups, 16 value bits
//! ```
//! Value bits go out least-significant first; `c` = 1 means another group
//! follows. The last group is zero-padded.
//!
//! # Length-prefixed (`Token::BitRun`)
//!
//! ```text
//! [l0 l1 l2 l3 l4] [v0 v1 ... v(len-1)]   up to 31 value bits
//! ```
//! Both the length and the value are written least-significant bit first.
//!
//! The reader is MSB-first, so decoding passes LSB-first fields through
//! fixed bit-reversal tables.

use crate::bitio::{BitReader, BitWriter};
use crate::error::{EncodeError, Result};

/// Value bits per nibble-chunked group.
const NIBBLE_BITS: usize = 4;

/// Maximum groups in one nibble-chunked integer.
const NIBBLE_MAX_GROUPS: usize = 4;

/// Largest value the nibble-chunked scheme can carry.
pub const NIBBLE_MAX: u32 = u16::MAX as u32;

/// Width of the bit-run length prefix.
const LENGTH_PREFIX_BITS: usize = 5;

/// Largest value the length-prefixed scheme can carry.
pub const BIT_RUN_MAX: u32 = (1 << 31) - 1;

/// 4-bit reversal: `NIBBLE_MIRROR[0b0001] == 0b1000`.
pub const NIBBLE_MIRROR: [u8; 16] = build_mirror::<16>(4);

/// 5-bit reversal: `LENGTH_MIRROR[0b00001] == 0b10000`.
pub const LENGTH_MIRROR: [u8; 32] = build_mirror::<32>(5);

const fn build_mirror<const N: usize>(width: u32) -> [u8; N] {
    let mut table = [0u8; N];
    let mut i = 0;
    while i < N {
        let mut reversed = 0u8;
        let mut bit = 0;
        while bit < width {
            if (i >> bit) & 1 == 1 {
                reversed |= 1 << (width - 1 - bit);
            }
            bit += 1;
        }
        table[i] = reversed;
        i += 1;
    }
    table
}

/// Number of significant bits in `value` (0 for 0).
fn bit_width(value: u32) -> usize {
    (u32::BITS - value.leading_zeros()) as usize
}

/// Write `value` in the nibble-chunked scheme.
///
/// # Errors
/// `EncodeError::ValueOutOfRange` if `value` > 65535.
pub fn write_nibble(writer: &mut BitWriter, value: u32) -> Result<()> {
    if value > NIBBLE_MAX {
        return Err(EncodeError::ValueOutOfRange {
            scheme: "nibble-chunked",
            value,
            max: NIBBLE_MAX,
        }
        .into());
    }

    let groups = bit_width(value).max(1).div_ceil(NIBBLE_BITS);
    let mut rest = value;
    for group in 0..groups {
        let nibble = (rest & 0xF) as usize;
        rest >>= NIBBLE_BITS;
        let more = group + 1 < groups;
        let chunk = (NIBBLE_MIRROR[nibble] as u64) << 1 | more as u64;
        writer.write_bits(chunk, NIBBLE_BITS + 1)?;
    }
    Ok(())
}

/// Read a nibble-chunked integer.
pub fn read_nibble(reader: &mut BitReader<'_>) -> Result<u32> {
    let mut value = 0u32;
    for group in 0..NIBBLE_MAX_GROUPS {
        let chunk = reader.read_bits(NIBBLE_BITS + 1)? as usize;
        let data = NIBBLE_MIRROR[chunk >> 1] as u32;
        value |= data << (group * NIBBLE_BITS);
        if chunk & 1 == 0 {
            break;
        }
    }
    Ok(value)
}

/// Write `value` in the length-prefixed scheme.
///
/// # Errors
/// `EncodeError::ValueOutOfRange` if `value` needs more than 31 bits.
pub fn write_bit_run(writer: &mut BitWriter, value: u32) -> Result<()> {
    if value > BIT_RUN_MAX {
        return Err(EncodeError::ValueOutOfRange {
            scheme: "bit-run",
            value,
            max: BIT_RUN_MAX,
        }
        .into());
    }

    let len = bit_width(value);
    writer.write_bits(LENGTH_MIRROR[len] as u64, LENGTH_PREFIX_BITS)?;
    for i in 0..len {
        writer.write_bit((value >> i) & 1 == 1);
    }
    Ok(())
}

/// Read a length-prefixed integer.
pub fn read_bit_run(reader: &mut BitReader<'_>) -> Result<u32> {
    let prefix = reader.read_bits(LENGTH_PREFIX_BITS)? as usize;
    let len = LENGTH_MIRROR[prefix] as usize;

    let mut value = 0u32;
    for i in 0..len {
        if reader.read_bit()? {
            value |= 1 << i;
        }
    }
    Ok(value)
}

/// Encoded size of `value` in the nibble-chunked scheme, if representable.
pub fn nibble_len(value: u32) -> Option<usize> {
    (value <= NIBBLE_MAX)
        .then(|| bit_width(value).max(1).div_ceil(NIBBLE_BITS) * (NIBBLE_BITS + 1))
}

/// Encoded size of `value` in the length-prefixed scheme, if representable.
pub fn bit_run_len(value: u32) -> Option<usize> {
    (value <= BIT_RUN_MAX).then(|| LENGTH_PREFIX_BITS + bit_width(value))
}

/// The two integer schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Nibble,
    BitRun,
}

/// Pick the scheme that writes `value` in fewer bits.
///
/// Ties go to the nibble-chunked scheme, and values above its ceiling always
/// use the bit-run scheme.
pub fn cheapest_scheme(value: u32) -> Scheme {
    match (nibble_len(value), bit_run_len(value)) {
        (Some(nibble), Some(run)) if nibble <= run => Scheme::Nibble,
        (Some(_), Some(_)) | (None, _) => Scheme::BitRun,
        (Some(_), None) => Scheme::Nibble,
    }
}
