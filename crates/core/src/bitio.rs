//! Bit-addressable cursor over a byte buffer.
//!
//! The serial payload is not byte-aligned: tokens are 2 or 3 bits wide and
//! integers are written in 5-bit groups. `BitWriter` and `BitReader` handle
//! that bookkeeping. Both operate MSB-first within each byte; the per-byte
//! bit mirroring of the wire format is applied outside this module.
//!
//! # Padding Rules
//! - BitWriter: pads the final partial byte with trailing zeros
//! - BitReader: cannot tell padding from data; the serial decoder strips the
//!   separator tokens that padding decodes into
//!
//! # Example
//! ```
//! use userial_core::bitio::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b0010000, 7).unwrap(); // magic header
//! writer.write_bits(0b01, 2).unwrap();      // separator token
//!
//! let bytes = writer.finish();
//! assert_eq!(bytes, vec![0b0010_0000, 0b1000_0000]);
//!
//! let mut reader = BitReader::new(&bytes);
//! assert_eq!(reader.read_bits(7).unwrap(), 16);
//! assert_eq!(reader.read_bits(2).unwrap(), 0b01);
//! ```

use crate::error::{BitIoError, Result};

/// Writes bits MSB-first into a growing byte buffer.
///
/// # Invariants
/// - `bit_count` is always < 8
/// - bits of `bit_buffer` below the current position are zero
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    /// Completed bytes
    bytes: Vec<u8>,
    /// Accumulator for the current partial byte (MSB-aligned)
    bit_buffer: u8,
    /// Number of bits in bit_buffer (0-7)
    bit_count: u8,
}

impl BitWriter {
    /// Create a new BitWriter with empty output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the lowest `count` bits of `value`, most significant first.
    ///
    /// Writing value=0b101 with count=3 appends bits 1, 0, 1 in that order.
    ///
    /// # Errors
    /// Returns `BitIoError::InvalidBitCount` if count > 64.
    pub fn write_bits(&mut self, value: u64, count: usize) -> Result<()> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }

        let mut remaining = count;
        while remaining > 0 {
            let free = 8 - self.bit_count as usize;
            let take = remaining.min(free);

            let shift = remaining - take;
            let bits = ((value >> shift) & ((1u64 << take) - 1)) as u8;

            self.bit_buffer |= bits << (free - take);
            self.bit_count += take as u8;
            self.flush_full_byte();

            remaining -= take;
        }

        Ok(())
    }

    /// Write a single bit.
    pub fn write_bit(&mut self, bit: bool) {
        self.bit_buffer |= (bit as u8) << (7 - self.bit_count);
        self.bit_count += 1;
        self.flush_full_byte();
    }

    fn flush_full_byte(&mut self) {
        if self.bit_count == 8 {
            self.bytes.push(self.bit_buffer);
            self.bit_buffer = 0;
            self.bit_count = 0;
        }
    }

    /// Finish writing and return the output bytes.
    ///
    /// The final partial byte, if any, is padded with zero bits.
    pub fn finish(mut self) -> Vec<u8> {
        if self.bit_count > 0 {
            self.bytes.push(self.bit_buffer);
        }
        self.bytes
    }

    /// Return the total number of bits written (including partial byte).
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 + self.bit_count as usize
    }
}

/// Reads bits MSB-first from a borrowed byte buffer.
///
/// # Invariants
/// - `bit_position` never exceeds `data.len() * 8`
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    /// Source data
    data: &'a [u8],
    /// Current bit position (0 = MSB of first byte)
    bit_position: usize,
}

impl<'a> BitReader<'a> {
    /// Create a new BitReader positioned at the first bit.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            bit_position: 0,
        }
    }

    /// Read `count` bits (0-64) as an unsigned integer, MSB first.
    ///
    /// On error the cursor does not move.
    ///
    /// # Errors
    /// - `BitIoError::InvalidBitCount` if count > 64
    /// - `BitIoError::Truncated` if fewer than `count` bits remain
    pub fn read_bits(&mut self, count: usize) -> Result<u64> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }

        let available = self.bits_remaining();
        if count > available {
            return Err(BitIoError::Truncated {
                requested: count,
                available,
            }
            .into());
        }

        let mut result = 0u64;
        let mut remaining = count;

        while remaining > 0 {
            let byte_idx = self.bit_position / 8;
            let bit_offset = self.bit_position % 8;

            let bits_in_byte = 8 - bit_offset;
            let take = remaining.min(bits_in_byte);

            let mask = ((1u16 << take) - 1) as u8;
            let bits = (self.data[byte_idx] >> (bits_in_byte - take)) & mask;

            // `take` is 1..=8, so a 64-bit read never shifts out live bits
            result = (result << take) | bits as u64;

            self.bit_position += take;
            remaining -= take;
        }

        Ok(result)
    }

    /// Read a single bit.
    pub fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read_bits(1)? == 1)
    }

    /// Move the cursor `count` bits backward.
    ///
    /// # Errors
    /// Returns `BitIoError::RewindPastStart` if fewer than `count` bits have
    /// been consumed.
    pub fn rewind(&mut self, count: usize) -> Result<()> {
        if count > self.bit_position {
            return Err(BitIoError::RewindPastStart {
                requested: count,
                position: self.bit_position,
            }
            .into());
        }
        self.bit_position -= count;
        Ok(())
    }

    /// Return the number of bits remaining in the buffer.
    pub fn bits_remaining(&self) -> usize {
        self.data.len() * 8 - self.bit_position
    }

    /// Return the current bit position.
    pub fn position(&self) -> usize {
        self.bit_position
    }

    /// Total number of bits in the underlying buffer.
    pub fn bit_len(&self) -> usize {
        self.data.len() * 8
    }

    /// Check if we're at the end of the buffer.
    pub fn is_empty(&self) -> bool {
        self.bit_position >= self.data.len() * 8
    }
}
