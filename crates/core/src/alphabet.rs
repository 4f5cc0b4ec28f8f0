//! Text <-> byte transcoding over the serial alphabet.
//!
//! Every 4 bytes become 5 characters from a fixed 85-symbol alphabet (not
//! RFC 1924 / Ascii85). Encoded text always carries the `@U` prefix.
//!
//! # Partial Groups
//!
//! A trailing group of 1-3 bytes is zero-padded to 4 bytes and only the first
//! `remaining + 1` characters are kept. Decoding pads a trailing group of 2-4
//! characters with the highest symbol and keeps `count - 1` bytes, which
//! reproduces the original bytes exactly. A single trailing character carries
//! less than one byte and is rejected.

use crate::error::{AlphabetError, Result};

/// The 85 symbols in index order.
pub const ALPHABET: &[u8; 85] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz!#$%&()*+-;<=>?@^_`{/}~";

/// Literal marker in front of every encoded serial.
pub const PREFIX: &str = "@U";

const BASE: u64 = 85;
const GROUP_BYTES: usize = 4;
const GROUP_CHARS: usize = 5;

/// Reverse lookup: ASCII code -> alphabet index, `NONE` when absent.
const NONE: u8 = u8::MAX;
const INDEX: [u8; 128] = build_index();

const fn build_index() -> [u8; 128] {
    let mut table = [NONE; 128];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
}

fn index_of(c: char) -> Option<u8> {
    let code = c as u32;
    if code < 128 && INDEX[code as usize] != NONE {
        Some(INDEX[code as usize])
    } else {
        None
    }
}

/// Encode bytes into `@U`-prefixed text.
pub fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(PREFIX.len() + bytes.len().div_ceil(GROUP_BYTES) * GROUP_CHARS);
    out.push_str(PREFIX);

    for group in bytes.chunks(GROUP_BYTES) {
        let mut padded = [0u8; GROUP_BYTES];
        padded[..group.len()].copy_from_slice(group);

        let chars = encode_group(u32::from_be_bytes(padded));
        let keep = if group.len() == GROUP_BYTES {
            GROUP_CHARS
        } else {
            group.len() + 1
        };
        out.extend(chars[..keep].iter().map(|&c| c as char));
    }

    out
}

fn encode_group(mut value: u32) -> [u8; GROUP_CHARS] {
    let mut chars = [0u8; GROUP_CHARS];
    for slot in chars.iter_mut().rev() {
        *slot = ALPHABET[(value % BASE as u32) as usize];
        value /= BASE as u32;
    }
    chars
}

/// Decode text into bytes. A leading `@U` is optional.
///
/// # Errors
/// - `AlphabetError::InvalidCharacter` for any symbol outside the alphabet
/// - `AlphabetError::TruncatedGroup` when exactly one character is left over
pub fn decode(text: &str) -> Result<Vec<u8>> {
    let (offset, body) = match text.strip_prefix(PREFIX) {
        Some(rest) => (PREFIX.len(), rest),
        None => (0, text),
    };

    let mut out = Vec::with_capacity(body.len() / GROUP_CHARS * GROUP_BYTES + GROUP_BYTES);
    let mut acc = 0u64;
    let mut count = 0usize;
    let mut group_start = offset;

    for (i, c) in body.char_indices() {
        let idx = index_of(c).ok_or(AlphabetError::InvalidCharacter {
            character: c,
            position: offset + i,
        })?;
        if count == 0 {
            group_start = offset + i;
        }

        acc = acc * BASE + idx as u64;
        count += 1;

        if count == GROUP_CHARS {
            out.extend_from_slice(&(acc as u32).to_be_bytes());
            acc = 0;
            count = 0;
        }
    }

    match count {
        0 => {}
        1 => {
            return Err(AlphabetError::TruncatedGroup {
                position: group_start,
            }
            .into())
        }
        _ => {
            for _ in count..GROUP_CHARS {
                acc = acc * BASE + (BASE - 1);
            }
            // Values past u32 wrap, matching the reference consumer.
            let word = (acc as u32).to_be_bytes();
            out.extend_from_slice(&word[..count - 1]);
        }
    }

    Ok(out)
}
