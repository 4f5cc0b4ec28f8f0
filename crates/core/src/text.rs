//! Human-editable textual form of a serial.
//!
//! # Grammar
//!
//! ```text
//! |                 separator A
//! ,                 separator B
//! 1292              integer or bit-run (whichever encodes shorter)
//! {95}              part, no payload
//! {1:5}             part with an integer
//! {3:[1 2 300]}     part with a list
//! "name"            part named through an alias table
//! "Prefix::name"    same, the prefix is ignored
//! ```
//!
//! Rendering puts a space after `,`, after `|` unless another `|` follows,
//! and between any two non-separator tokens; nothing goes before a
//! separator. The example serial renders as
//! `3, 0, 1, 50| 2, 1292|| {95} {2} {7} {14} {25} {42} {70}|`.
//!
//! Parsing is a single left-to-right scan without backtracking.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result, TextError};
use crate::part::{ListValue, Part, PartBody};
use crate::serial::{Block, Serial};
use crate::varint::{cheapest_scheme, Scheme};

/// Marker splitting an optional prefix from an alias name.
const ALIAS_SEPARATOR: &str = "::";

/// Bidirectional map between part names and part indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aliases {
    by_name: BTreeMap<String, u32>,
    by_index: BTreeMap<u32, String>,
}

impl Aliases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a name. A later name for the same index wins when rendering; both
    /// names still parse.
    pub fn insert(&mut self, name: impl Into<String>, index: u32) {
        let name = name.into();
        self.by_index.insert(index, name.clone());
        self.by_name.insert(name, index);
    }

    pub fn index_of(&self, name: &str) -> Option<u32> {
        self.by_name.get(name).copied()
    }

    pub fn name_of(&self, index: u32) -> Option<&str> {
        self.by_index.get(&index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for Aliases {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        let mut aliases = Self::new();
        for (name, index) in iter {
            aliases.insert(name, index);
        }
        aliases
    }
}

/// Render a serial without aliases.
pub fn serial_to_text(serial: &Serial) -> String {
    render(serial, None)
}

/// Render a serial, naming payload-free parts found in `aliases`.
pub fn serial_to_text_with_aliases(serial: &Serial, aliases: &Aliases) -> String {
    render(serial, Some(aliases))
}

/// Parse the textual form. Quoted names are rejected.
pub fn text_to_serial(text: &str) -> Result<Serial> {
    Parser::new(text, None).parse()
}

/// Parse the textual form, resolving quoted names through `aliases`.
pub fn text_to_serial_with_aliases(text: &str, aliases: &Aliases) -> Result<Serial> {
    Parser::new(text, Some(aliases)).parse()
}

fn render(serial: &Serial, aliases: Option<&Aliases>) -> String {
    let mut out = String::new();
    let mut blocks = serial.iter().peekable();

    while let Some(block) = blocks.next() {
        render_block(&mut out, block, aliases);

        let Some(next) = blocks.peek() else { break };
        let space = match block {
            Block::SeparatorB => true,
            Block::SeparatorA => !matches!(next, Block::SeparatorA),
            _ => !next.is_separator(),
        };
        if space {
            out.push(' ');
        }
    }

    out
}

fn render_block(out: &mut String, block: &Block, aliases: Option<&Aliases>) {
    let named = match block {
        Block::Part(Part {
            index,
            body: PartBody::None,
        }) => aliases.and_then(|a| a.name_of(*index)),
        _ => None,
    };
    if let Some(name) = named {
        push_quoted(out, name);
        return;
    }

    out.push_str(&block.to_string());
}

fn push_quoted(out: &mut String, name: &str) {
    out.push('"');
    for c in name.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.body {
            PartBody::None => write!(f, "{{{}}}", self.index),
            PartBody::Int(value) => write!(f, "{{{}:{}}}", self.index, value),
            PartBody::List(values) => {
                write!(f, "{{{}:[", self.index)?;
                for (i, entry) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", entry.value())?;
                }
                f.write_str("]}")
            }
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Block::SeparatorA => f.write_str("|"),
            Block::SeparatorB => f.write_str(","),
            Block::Integer(v) | Block::BitRun(v) => write!(f, "{v}"),
            Block::Part(part) => write!(f, "{part}"),
        }
    }
}

impl fmt::Display for Serial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&serial_to_text(self))
    }
}

impl FromStr for Serial {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        text_to_serial(s)
    }
}

/// Integer block for `value`, tagged with the cheaper scheme.
fn number_block(value: u32) -> Block {
    match cheapest_scheme(value) {
        Scheme::Nibble => Block::Integer(value),
        Scheme::BitRun => Block::BitRun(value),
    }
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
    aliases: Option<&'a Aliases>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str, aliases: Option<&'a Aliases>) -> Self {
        Self {
            text,
            pos: 0,
            aliases,
        }
    }

    fn parse(mut self) -> Result<Serial> {
        let mut blocks = Vec::new();

        while let Some(c) = self.peek() {
            let start = self.pos;
            match c {
                c if c.is_whitespace() => self.bump(c),
                '|' => {
                    self.bump(c);
                    blocks.push(Block::SeparatorA);
                }
                ',' => {
                    self.bump(c);
                    blocks.push(Block::SeparatorB);
                }
                '{' => blocks.push(self.part()?),
                '"' => blocks.push(self.quoted()?),
                '0'..='9' => {
                    let digits = self.take_while(|c| c.is_ascii_digit());
                    blocks.push(number_block(parse_number(digits, start)?));
                }
                other => {
                    return Err(TextError::InvalidCharacter {
                        character: other,
                        position: start,
                    }
                    .into())
                }
            }
        }

        Ok(Serial::new(blocks))
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self, c: char) {
        self.pos += c.len_utf8();
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let text = self.text;
        let rest = &text[self.pos..];
        let len = rest.find(|c: char| !pred(c)).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn part(&mut self) -> Result<Block> {
        let start = self.pos;
        let close = self.text[start..]
            .find('}')
            .ok_or(TextError::UnmatchedBrace { position: start })?;
        let raw = &self.text[start..=start + close];
        self.pos = start + close + 1;

        parse_part_body(&raw[1..raw.len() - 1])
            .map(Block::Part)
            .ok_or_else(|| {
                TextError::InvalidPart {
                    text: raw.to_string(),
                    position: start,
                }
                .into()
            })
    }

    fn quoted(&mut self) -> Result<Block> {
        let start = self.pos;
        let mut content = String::new();
        let mut chars = self.text[start + 1..].char_indices();

        let end = loop {
            match chars.next() {
                Some((i, '"')) => break start + 1 + i,
                Some((_, '\\')) => match chars.next() {
                    Some((_, escaped)) => content.push(escaped),
                    None => return Err(TextError::UnterminatedLiteral { position: start }.into()),
                },
                Some((_, c)) => content.push(c),
                None => return Err(TextError::UnterminatedLiteral { position: start }.into()),
            }
        };
        self.pos = end + 1;

        let name = match content.find(ALIAS_SEPARATOR) {
            Some(at) => &content[at + ALIAS_SEPARATOR.len()..],
            None => content.as_str(),
        };

        self.aliases
            .and_then(|a| a.index_of(name))
            .map(|index| Block::Part(Part::none(index)))
            .ok_or_else(|| {
                TextError::UnknownAlias {
                    name: name.to_string(),
                    position: start,
                }
                .into()
            })
    }
}

fn parse_number(digits: &str, position: usize) -> Result<u32> {
    digits.parse().map_err(|_| {
        TextError::NumberOutOfRange {
            text: digits.to_string(),
            position,
        }
        .into()
    })
}

/// Contents between the braces: `index`, `index:value` or `index:[v ...]`.
fn parse_part_body(body: &str) -> Option<Part> {
    let field = |s: &str| s.trim().parse::<u32>().ok();

    let Some((index, rest)) = body.split_once(':') else {
        return field(body).map(Part::none);
    };
    let index = field(index)?;
    let rest = rest.trim();

    match rest.strip_prefix('[') {
        Some(list) => {
            let list = list.strip_suffix(']')?;
            let values = list
                .split_whitespace()
                .map(|v| field(v).map(ListValue::cheapest))
                .collect::<Option<Vec<_>>>()?;
            Some(Part::list(index, values))
        }
        None => field(rest).map(|value| Part::int(index, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "3, 0, 1, 50| 2, 1292|| {95} {2} {7} {14} {25} {42} {70}|";

    #[test]
    fn test_parse_sample() {
        let serial = text_to_serial(SAMPLE).unwrap();
        assert_eq!(serial.len(), 21);
        assert_eq!(serial.blocks()[0], Block::Integer(3));
        assert_eq!(serial.blocks()[1], Block::SeparatorB);
        assert_eq!(serial.blocks()[10], Block::Integer(1292));
        assert_eq!(serial.blocks()[11], Block::SeparatorA);
        assert_eq!(serial.blocks()[12], Block::SeparatorA);
        assert_eq!(serial.blocks()[13], Block::Part(Part::none(95)));
        assert_eq!(serial.parts().count(), 7);
    }

    #[test]
    fn test_render_sample() {
        let serial: Serial = SAMPLE.parse().unwrap();
        assert_eq!(serial.to_string(), SAMPLE);
    }

    #[test]
    fn test_part_forms() {
        let serial = text_to_serial("{1} {2:30} {3:[4 300 70000]} {4:[]}").unwrap();
        assert_eq!(
            serial.blocks(),
            &[
                Block::Part(Part::none(1)),
                Block::Part(Part::int(2, 30)),
                Block::Part(Part::list(
                    3,
                    vec![ListValue::Int(4), ListValue::Bit(300), ListValue::Bit(70_000)]
                )),
                Block::Part(Part::list(4, vec![])),
            ]
        );
        assert_eq!(
            serial_to_text(&serial),
            "{1} {2:30} {3:[4 300 70000]} {4:[]}"
        );
    }

    #[test]
    fn test_numbers_pick_cheapest_scheme() {
        let serial = text_to_serial("255 256 70000").unwrap();
        assert_eq!(
            serial.blocks(),
            &[Block::Integer(255), Block::BitRun(256), Block::BitRun(70_000)]
        );
    }

    #[test]
    fn test_spacing_rules() {
        let serial = Serial::from(vec![
            Block::SeparatorA,
            Block::SeparatorA,
            Block::Integer(1),
            Block::SeparatorB,
            Block::SeparatorB,
            Block::Integer(2),
            Block::Integer(3),
            Block::SeparatorA,
        ]);
        assert_eq!(serial_to_text(&serial), "|| 1, , 2 3|");
        assert_eq!(serial_to_text(&Serial::default()), "");
    }

    #[test]
    fn test_unmatched_brace() {
        assert_eq!(
            text_to_serial("1, {95").unwrap_err(),
            Error::Text(TextError::UnmatchedBrace { position: 3 })
        );
    }

    #[test]
    fn test_invalid_part() {
        for text in ["{}", "{a}", "{1:2:3}", "{1:[2 x]}", "{1:[2}"] {
            assert!(
                matches!(
                    text_to_serial(text),
                    Err(Error::Text(TextError::InvalidPart { position: 0, .. }))
                ),
                "{text}"
            );
        }
    }

    #[test]
    fn test_invalid_character() {
        assert_eq!(
            text_to_serial("1 + 2").unwrap_err(),
            Error::Text(TextError::InvalidCharacter {
                character: '+',
                position: 2
            })
        );
    }

    #[test]
    fn test_number_out_of_range() {
        assert!(matches!(
            text_to_serial("99999999999"),
            Err(Error::Text(TextError::NumberOutOfRange { position: 0, .. }))
        ));
    }

    #[test]
    fn test_unterminated_literal() {
        assert_eq!(
            text_to_serial("1 \"abc").unwrap_err(),
            Error::Text(TextError::UnterminatedLiteral { position: 2 })
        );
        assert_eq!(
            text_to_serial("\"abc\\").unwrap_err(),
            Error::Text(TextError::UnterminatedLiteral { position: 0 })
        );
    }

    #[test]
    fn test_quoted_alias() {
        let aliases: Aliases = [("Bullet Hose", 95u32), ("quote\"d", 7)].into_iter().collect();

        let serial =
            text_to_serial_with_aliases("1| \"Bullet Hose\" \"Class::Bullet Hose\" \"quote\\\"d\" {2}", &aliases)
                .unwrap();
        assert_eq!(
            serial.blocks(),
            &[
                Block::Integer(1),
                Block::SeparatorA,
                Block::Part(Part::none(95)),
                Block::Part(Part::none(95)),
                Block::Part(Part::none(7)),
                Block::Part(Part::none(2)),
            ]
        );

        assert_eq!(
            serial_to_text_with_aliases(&serial, &aliases),
            "1| \"Bullet Hose\" \"Bullet Hose\" \"quote\\\"d\" {2}"
        );
    }

    #[test]
    fn test_unknown_alias() {
        assert_eq!(
            text_to_serial("\"Prefix::Nope\"").unwrap_err(),
            Error::Text(TextError::UnknownAlias {
                name: "Nope".to_string(),
                position: 0
            })
        );
    }

    #[test]
    fn test_aliases_lookup() {
        let mut aliases = Aliases::new();
        assert!(aliases.is_empty());
        aliases.insert("a", 1);
        aliases.insert("b", 1);
        assert_eq!(aliases.len(), 2);
        assert_eq!(aliases.index_of("a"), Some(1));
        assert_eq!(aliases.name_of(1), Some("b"));
        assert_eq!(aliases.name_of(2), None);
    }
}
