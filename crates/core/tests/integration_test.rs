//! Integration tests for the full serial pipeline.
//!
//! These tests go through the public API only: text -> serial -> wire string
//! -> serial -> text, with known wire strings pinned bit for bit.

use proptest::prelude::*;
use userial_core::{
    decode, decode_with_stats, encode,
    error::{BitIoError, Error, SerialError},
    serial_to_text, serial_to_text_with_aliases, text_to_serial, text_to_serial_with_aliases,
    varint::{BIT_RUN_MAX, NIBBLE_MAX},
    Aliases, Block, ListValue, Part, PartBody, Serial,
};

const SAMPLE_TEXT: &str = "3, 0, 1, 50| 2, 1292|| {95} {2} {7} {14} {25} {42} {70}|";
const SAMPLE_WIRE: &str = "@UgbV{rFme!KI4sa#RG}W#sX3@xsFnx";

fn strip_trailing_separators(serial: &Serial) -> Vec<Block> {
    let mut blocks = serial.blocks().to_vec();
    while blocks.last() == Some(&Block::SeparatorA) {
        blocks.pop();
    }
    blocks
}

/// Text form of the sample item encodes to its known wire string.
#[test]
fn test_sample_text_to_wire() {
    let serial = text_to_serial(SAMPLE_TEXT).expect("parse failed");
    let wire = encode(&serial).expect("encode failed");
    assert_eq!(wire, SAMPLE_WIRE);
}

/// Known wire string decodes and renders back to the same text.
#[test]
fn test_sample_wire_to_text() {
    let serial = decode(SAMPLE_WIRE).expect("decode failed");
    assert_eq!(serial_to_text(&serial), SAMPLE_TEXT);
    assert_eq!(encode(&serial).expect("encode failed"), SAMPLE_WIRE);
}

/// The sample's leading integer names a known item kind.
#[test]
fn test_sample_item_kind() {
    let serial = decode(SAMPLE_WIRE).expect("decode failed");
    let kind = serial.item_kind().expect("no item kind");
    assert_eq!(kind.to_string(), "Jacobs Pistol");
}

/// Statistics for the sample account for every block.
#[test]
fn test_sample_stats() {
    let (serial, stats) = decode_with_stats(SAMPLE_WIRE).expect("decode failed");

    println!("{}", stats.export_text());

    assert_eq!(stats.blocks(), serial.len());
    assert_eq!(stats.parts, 7);
    assert_eq!(stats.integers, 6);
    assert_eq!(stats.separators_b, 4);
    assert_eq!(stats.separators_a, 4);
    assert_eq!(stats.text_len, SAMPLE_WIRE.len());
    assert!(stats.bits_consumed <= stats.payload_bits);
    assert!(!stats.stopped_at_unsupported);
}

/// Real item serials survive decode -> encode and text -> serial unchanged.
#[test]
fn test_known_items_round_trip() {
    let items = [
        "@Ug!pHG2__CA%$*B*hq}}VgZg1mAq^^LDp%^iLG?SR+R>og0R",
        "@Uga`vnFme!K<Ude5RG}7is6q8Z{X=bP4k{M{",
        "@Uga`vnFme!KGCxo/RG}7?s6!2EQ*%(c5C",
        "@Uga`vnFme!KJYP^dRG}6%sD7w_s7=j5<w5`",
        LONG_ITEM,
    ];

    for wire in items {
        let serial = decode(wire).expect("decode failed");
        assert_eq!(encode(&serial).expect("encode failed"), wire);

        let text = serial_to_text(&serial);
        let parsed = text_to_serial(&text).expect("parse failed");
        assert_eq!(parsed, serial, "{}", text);
    }

    let serial = decode(items[1]).expect("decode failed");
    assert_eq!(
        serial_to_text(&serial),
        "2, 0, 1, 50| 2, 2034|| {54} {2} {5} {3} {1} {62} {63} {13} {25} {44}|"
    );
    assert_eq!(serial.item_kind().expect("no item kind").to_string(), "Daedalus Pistol");

    let serial = decode(items[0]).expect("decode failed");
    assert_eq!(serial.item_kind().expect("no item kind").to_string(), "Vex Class Mod");
    assert_eq!(
        serial.parts().last(),
        Some(&Part::list(234, vec![ListValue::Int(8), ListValue::Int(55)]))
    );
}

const LONG_ITEM: &str =
    "@Uge9B?m/)}}!ffxLNwtrrhUgJFvP19)9>F7c1drg69->2ZNDt8=I>e4x5g)=u;D`>fBRx?3?tmf{sYpdCQjv<(7NJN*DpHY(R3rc";

/// The long item mixes every part shape and leads with a bit-run id.
#[test]
fn test_long_item_structure() {
    let serial = decode(LONG_ITEM).expect("decode failed");

    assert_eq!(serial.blocks()[0], Block::BitRun(312));
    assert_eq!(serial.item_kind().expect("no item kind").to_string(), "Daedalus Shield");

    let list = serial
        .parts()
        .find_map(|part| match &part.body {
            PartBody::List(values) => Some((part.index, values.len())),
            _ => None,
        })
        .expect("no list part");
    assert_eq!(list, (246, 24));

    assert!(serial.parts().any(|part| *part == Part::int(248, 27)));
    assert!(serial.parts().any(|part| *part == Part::int(13, 8)));
    assert_eq!(serial.parts().count(), 17);
    assert_eq!(serial.blocks().last(), Some(&Block::SeparatorA));
}

/// Magic header plus one padding bit is a valid, empty serial.
#[test]
fn test_minimal_wire() {
    let serial = decode("@U1O").expect("decode failed");
    assert!(serial.is_empty());
    assert_eq!(serial_to_text(&serial), "");
}

/// A wrong magic header is rejected with the value found.
#[test]
fn test_bad_magic() {
    match decode("@UL;") {
        Err(Error::Serial(SerialError::InvalidMagicHeader { found, .. })) => assert_eq!(found, 17),
        other => panic!("expected InvalidMagicHeader, got {:?}", other),
    }

    // no payload at all
    assert!(matches!(
        decode("@U"),
        Err(Error::Serial(SerialError::InvalidMagicHeader { .. }))
    ));
}

/// Running out of bits is the same error inside a part and outside one.
#[test]
fn test_truncated_stream() {
    for wire in ["@UgrW", "@Ug!}"] {
        assert!(
            matches!(decode(wire), Err(Error::BitIo(BitIoError::Truncated { .. }))),
            "{}",
            wire
        );
    }
}

/// Text that is not in the alphabet never reaches the bit decoder.
#[test]
fn test_invalid_alphabet() {
    assert!(matches!(decode("@Ugb V"), Err(Error::Alphabet(_))));
    assert!(matches!(decode("@Ugb\"V"), Err(Error::Alphabet(_))));
}

/// The unsupported token ends a serial after its parts, but not before.
#[test]
fn test_unsupported_token() {
    let (serial, stats) = decode_with_stats("@UgoF/u").expect("decode failed");
    assert_eq!(serial_to_text(&serial), "1 {4}");
    assert!(stats.stopped_at_unsupported);

    assert!(matches!(
        decode("@UgoFb"),
        Err(Error::Serial(SerialError::UnsupportedItemToken { .. }))
    ));
}

/// Every part form survives the wire.
#[test]
fn test_part_forms_round_trip() {
    let text = "7| {1:5} {3:[1 2 300 70000]}|";
    let serial = text_to_serial(text).expect("parse failed");
    let wire = encode(&serial).expect("encode failed");

    assert_eq!(wire, "@Ugd7?cbkKx/C6<eD5di");
    assert_eq!(serial_to_text(&decode(&wire).expect("decode failed")), text);
}

/// Named parts go through the alias table in both directions.
#[test]
fn test_aliases_round_trip() {
    let aliases: Aliases = [("Body", 95u32), ("Barrel", 2)].into_iter().collect();

    let serial = text_to_serial_with_aliases("3, 0| \"Jakobs::Body\" \"Barrel\" {7}|", &aliases)
        .expect("parse failed");
    let decoded = decode(&encode(&serial).expect("encode failed")).expect("decode failed");

    assert_eq!(decoded, serial);
    assert_eq!(
        serial_to_text_with_aliases(&decoded, &aliases),
        "3, 0| \"Body\" \"Barrel\" {7}|"
    );
    assert_eq!(serial_to_text(&decoded), "3, 0| {95} {2} {7}|");
}

/// A decoded serial never ends with two separator-A blocks.
#[test]
fn test_trailing_padding_collapsed() {
    for count in 0..12 {
        let mut blocks = vec![Block::Integer(1)];
        blocks.extend(std::iter::repeat(Block::SeparatorA).take(count));
        let serial = Serial::from(blocks);

        let decoded = decode(&encode(&serial).expect("encode failed")).expect("decode failed");
        let tail = &decoded.blocks()[decoded.len().saturating_sub(2)..];

        assert_ne!(tail, &[Block::SeparatorA, Block::SeparatorA], "count {}", count);
        assert_eq!(strip_trailing_separators(&decoded), vec![Block::Integer(1)]);
    }
}

fn list_value() -> impl Strategy<Value = ListValue> {
    prop_oneof![
        (0..=NIBBLE_MAX).prop_map(ListValue::Int),
        (0..=BIT_RUN_MAX).prop_map(ListValue::Bit),
    ]
}

fn part() -> impl Strategy<Value = Part> {
    let index = 0..=NIBBLE_MAX;
    prop_oneof![
        index.clone().prop_map(Part::none),
        (index.clone(), 0..=NIBBLE_MAX).prop_map(|(i, v)| Part::int(i, v)),
        (index, prop::collection::vec(list_value(), 0..6)).prop_map(|(i, vs)| Part::list(i, vs)),
    ]
}

fn block() -> impl Strategy<Value = Block> {
    prop_oneof![
        Just(Block::SeparatorA),
        Just(Block::SeparatorB),
        (0..=NIBBLE_MAX).prop_map(Block::Integer),
        (0..=BIT_RUN_MAX).prop_map(Block::BitRun),
        part().prop_map(Block::Part),
    ]
}

/// Serials with at most one trailing separator-A, the shape `decode` returns.
fn serial() -> impl Strategy<Value = Serial> {
    (prop::collection::vec(block(), 0..24), any::<bool>()).prop_map(|(blocks, closed)| {
        let mut blocks = strip_trailing_separators(&Serial::from(blocks));
        if closed {
            blocks.push(Block::SeparatorA);
        }
        Serial::from(blocks)
    })
}

proptest! {
    #[test]
    fn prop_decode_inverts_encode(serial in serial()) {
        let wire = encode(&serial).unwrap();
        let decoded = decode(&wire).unwrap();
        prop_assert_eq!(strip_trailing_separators(&decoded), strip_trailing_separators(&serial));
    }

    #[test]
    fn prop_wire_is_stable(serial in serial()) {
        let wire = encode(&serial).unwrap();
        let decoded = decode(&wire).unwrap();
        prop_assert_eq!(encode(&decoded).unwrap(), wire);
    }

    #[test]
    fn prop_text_is_stable(serial in serial()) {
        let text = serial_to_text(&serial);
        let parsed = text_to_serial(&text).unwrap();
        prop_assert_eq!(serial_to_text(&parsed), text);
        prop_assert_eq!(parsed.len(), serial.len());
    }
}
