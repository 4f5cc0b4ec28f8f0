//! Per-byte bit reversal.
//!
//! The wire bytes store each byte's bits in reverse order relative to the
//! token stream. `mirror` is its own inverse and is applied once in each
//! direction.

/// Reverse the 8 bits of every byte.
pub fn mirror(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().map(|b| b.reverse_bits()).collect()
}

/// In-place variant of [`mirror`].
pub fn mirror_in_place(bytes: &mut [u8]) {
    for b in bytes.iter_mut() {
        *b = b.reverse_bits();
    }
}
