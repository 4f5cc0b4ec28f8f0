//! Random serial generation for self-testing.
//!
//! Generated serials follow the rough shape of real items so the round trip
//! exercises every block kind:
//! - a leading item id and a few header integers split by `,`
//! - a `||` gap
//! - a run of parts of every sub-type
//! - a closing `|`
//!
//! Values are kept inside each scheme's range, so encoding never fails.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use userial_core::{
    varint::{BIT_RUN_MAX, NIBBLE_MAX},
    Block, ListValue, Part, Serial,
};

/// Generate `count` serials from `seed`.
pub fn generate_serials(seed: u64, count: usize) -> Vec<Serial> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count).map(|_| generate_serial(&mut rng)).collect()
}

/// Generate one serial.
pub fn generate_serial(rng: &mut ChaCha8Rng) -> Serial {
    let mut blocks = Vec::new();

    // Header: item id, then comma-separated integers
    blocks.push(Block::Integer(rng.gen_range(2..=321)));
    for _ in 0..rng.gen_range(0..=5) {
        blocks.push(Block::SeparatorB);
        blocks.push(number(rng));
    }
    blocks.push(Block::SeparatorA);
    blocks.push(Block::SeparatorA);

    for _ in 0..rng.gen_range(0..=12) {
        blocks.push(Block::Part(part(rng)));
    }

    // Occasionally leave the serial open, as some real items are
    if rng.gen_bool(0.9) {
        blocks.push(Block::SeparatorA);
    }

    Serial::from(blocks)
}

fn number(rng: &mut ChaCha8Rng) -> Block {
    match rng.gen_range(0..10) {
        0..=6 => Block::Integer(rng.gen_range(0..=255)),
        7..=8 => Block::Integer(rng.gen_range(0..=NIBBLE_MAX)),
        _ => Block::BitRun(rng.gen_range(0..=BIT_RUN_MAX)),
    }
}

fn part(rng: &mut ChaCha8Rng) -> Part {
    let index = rng.gen_range(1..=400);

    match rng.gen_range(0..10) {
        // Most parts carry no payload
        0..=6 => Part::none(index),
        7..=8 => Part::int(index, rng.gen_range(0..=NIBBLE_MAX)),
        _ => {
            let values = (0..rng.gen_range(0..=4))
                .map(|_| {
                    if rng.gen_bool(0.5) {
                        ListValue::Int(rng.gen_range(0..=NIBBLE_MAX))
                    } else {
                        ListValue::Bit(rng.gen_range(0..=BIT_RUN_MAX))
                    }
                })
                .collect();
            Part::list(index, values)
        }
    }
}
