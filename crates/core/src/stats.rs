//! Statistics gathered while decoding one serial.
//!
//! Decoding is a pure function, so these are plain per-call counters: the
//! decoder fills a fresh `DecodeStats` and hands it back alongside the
//! `Serial`. Nothing is shared between calls.

use crate::token::Token;

/// Counters for a single decode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeStats {
    // === Input ===
    /// Characters in the trimmed input text
    pub text_len: usize,

    /// Bits available after transcoding (bytes * 8)
    pub payload_bits: usize,

    /// Bits read up to the point decoding stopped
    pub bits_consumed: usize,

    // === Blocks ===
    pub separators_a: usize,
    pub separators_b: usize,
    pub integers: usize,
    pub bit_runs: usize,
    pub parts: usize,

    // === Termination ===
    /// Trailing separator-A blocks dropped as padding
    pub padding_separators_stripped: usize,

    /// Decoding ended on the unsupported token after a part
    pub stopped_at_unsupported: bool,
}

impl DecodeStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one token. `Token::Unsupported` is not a block and is ignored.
    pub fn record(&mut self, token: Token) {
        match token {
            Token::SeparatorA => self.separators_a += 1,
            Token::SeparatorB => self.separators_b += 1,
            Token::Integer => self.integers += 1,
            Token::BitRun => self.bit_runs += 1,
            Token::Part => self.parts += 1,
            Token::Unsupported => {}
        }
    }

    /// Undo `count` separator-A blocks removed as trailing padding.
    pub fn strip_padding(&mut self, count: usize) {
        self.separators_a -= count;
        self.padding_separators_stripped += count;
    }

    /// Total blocks in the returned serial.
    pub fn blocks(&self) -> usize {
        self.separators_a + self.separators_b + self.integers + self.bit_runs + self.parts
    }

    /// Bits left unread when decoding stopped (padding or ignored tail).
    pub fn unread_bits(&self) -> usize {
        self.payload_bits.saturating_sub(self.bits_consumed)
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Decode Summary ===");
        println!("Text: {} chars", self.text_len);
        println!("Payload: {} bits ({} consumed, {} unread)", self.payload_bits, self.bits_consumed, self.unread_bits());
        println!();

        println!("=== Blocks ===");
        println!("Total: {}", self.blocks());
        println!("Separators: {} '|', {} ','", self.separators_a, self.separators_b);
        println!("Integers: {}", self.integers);
        println!("Bit runs: {}", self.bit_runs);
        println!("Parts: {}", self.parts);
        println!();

        println!("=== Termination ===");
        println!("Padding separators stripped: {}", self.padding_separators_stripped);
        if self.stopped_at_unsupported {
            println!("Stopped at unsupported token after last part");
        } else {
            println!("Reached end of stream");
        }
        println!();
    }

    /// Export counters as `key=value` lines (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "payload_bits={}\n\
             bits_consumed={}\n\
             blocks={}\n\
             separators_a={}\n\
             separators_b={}\n\
             integers={}\n\
             bit_runs={}\n\
             parts={}\n\
             padding_separators_stripped={}\n\
             stopped_at_unsupported={}\n",
            self.payload_bits,
            self.bits_consumed,
            self.blocks(),
            self.separators_a,
            self.separators_b,
            self.integers,
            self.bit_runs,
            self.parts,
            self.padding_separators_stripped,
            self.stopped_at_unsupported,
        )
    }
}
