//! userial-core: bit-exact codec for `@U` item serials
//!
//! A serial is an item's attributes packed into a non-byte-aligned bit stream
//! and written as text. This library converts between that text and an
//! ordered sequence of typed blocks, and between blocks and a human-editable
//! textual form.
//!
//! # Architecture
//!
//! Leaves first:
//! - `alphabet`: text <-> bytes over the 85-symbol alphabet
//! - `mirror`: per-byte bit reversal
//! - `bitio`: bit-level reading/writing
//! - `token`: 2/3-bit block discriminator
//! - `varint`: nibble-chunked and length-prefixed integers
//! - `part`: compound part records
//! - `serial`: magic header, block loop, padding cleanup
//! - `text`: textual form and alias tables
//! - `stats`: per-decode counters
//! - `item_kind`: manufacturer/type lookup for the leading integer
//!
//! # Design Principles
//!
//! - **No panics**: all errors are structured and recoverable
//! - **Stateless**: every call is a pure function of its input, safe to run
//!   from any number of threads
//! - **Bit-exact**: `encode(decode(w)) == w` for every string `encode` produces
//!
//! # Example
//! ```
//! let serial = userial_core::text_to_serial("3, 0, 1, 50| 2, 1292|| {95} {2} {7} {14} {25} {42} {70}|").unwrap();
//! let wire = userial_core::encode(&serial).unwrap();
//! assert_eq!(wire, "@UgbV{rFme!KI4sa#RG}W#sX3@xsFnx");
//! assert_eq!(userial_core::decode(&wire).unwrap(), serial);
//! ```

pub mod alphabet;
pub mod bitio;
pub mod error;
pub mod item_kind;
pub mod mirror;
pub mod part;
pub mod serial;
pub mod stats;
pub mod text;
pub mod token;
pub mod varint;

// Re-export commonly used types
pub use error::{Error, Result};
pub use item_kind::{ItemKind, ItemType, Manufacturer};
pub use part::{ListValue, Part, PartBody, SubType};
pub use serial::{decode, decode_with_stats, encode, Block, Serial};
pub use stats::DecodeStats;
pub use text::{
    serial_to_text, serial_to_text_with_aliases, text_to_serial, text_to_serial_with_aliases,
    Aliases,
};
pub use token::Token;
