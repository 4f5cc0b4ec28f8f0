//! userial: command-line front end for `userial-core`.
//!
//! Converts between `@U` wire strings and the textual form, one input per
//! line, and can round-trip randomly generated serials as a self-test.

mod config;
mod sample;

use std::io::BufRead;
use std::path::Path;

use anyhow::{bail, Context, Result};
use config::{Config, Mode};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use userial_core::{
    alphabet::PREFIX, decode, decode_with_stats, encode, serial_to_text,
    serial_to_text_with_aliases, text_to_serial, text_to_serial_with_aliases, Aliases, Block,
    Serial,
};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("Run with --help for usage");
            std::process::exit(1);
        }
    };

    init_tracing(config.log_filter.as_deref());

    if config.print_config {
        config.print();
    }

    if let Err(e) = run(&config) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

/// Log to stderr so stdout only carries results.
fn init_tracing(filter: Option<&str>) {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(config: &Config) -> Result<()> {
    let aliases = match &config.aliases_file {
        Some(path) => load_aliases(path)?,
        None => Aliases::new(),
    };

    if let Some(count) = config.sample_count {
        return self_test(config.seed, count);
    }

    let inputs = match &config.input {
        Some(value) => vec![value.clone()],
        None => read_stdin()?,
    };
    if inputs.is_empty() {
        bail!("no input (pass a value or pipe lines on stdin)");
    }

    for input in &inputs {
        let output = convert(config, input, &aliases)?;
        println!("{}", output);
    }

    Ok(())
}

fn convert(config: &Config, input: &str, aliases: &Aliases) -> Result<String> {
    match config.mode {
        Mode::Decode => decode_line(input, aliases, config.print_stats),
        Mode::Encode => encode_line(input, aliases),
        // The prefix is optional for `decode`, so plain text like `12` would
        // also transcode; only prefixed input is treated as a wire string.
        Mode::Auto if input.trim_start().starts_with(PREFIX) => decode_line(input, aliases, config.print_stats),
        Mode::Auto => {
            debug!("no {} prefix, encoding as text", PREFIX);
            encode_line(input, aliases)
        }
    }
}

fn decode_line(input: &str, aliases: &Aliases, print_stats: bool) -> Result<String> {
    let (serial, stats) =
        decode_with_stats(input).with_context(|| format!("failed to decode {:?}", input))?;

    match serial.item_kind() {
        Some(kind) => info!(%kind, blocks = serial.len(), "decoded item"),
        None => info!(blocks = serial.len(), "decoded item of unknown kind"),
    }
    if print_stats {
        stats.print_summary();
    }

    Ok(serial_to_text_with_aliases(&serial, aliases))
}

fn encode_line(input: &str, aliases: &Aliases) -> Result<String> {
    let serial = text_to_serial_with_aliases(input, aliases)
        .with_context(|| format!("failed to parse {:?}", input))?;
    encode(&serial).context("failed to encode serial")
}

/// Non-empty, trimmed stdin lines.
fn read_stdin() -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for line in std::io::stdin().lock().lines() {
        let line = line.context("failed to read stdin")?;
        let line = line.trim();
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }
    Ok(lines)
}

/// Load a JSON object of `"name": index` pairs.
fn load_aliases(path: &Path) -> Result<Aliases> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read alias file {}", path.display()))?;
    let entries: std::collections::BTreeMap<String, u32> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse alias file {}", path.display()))?;

    debug!(entries = entries.len(), path = %path.display(), "loaded aliases");
    Ok(entries.into_iter().collect())
}

fn without_trailing_separators(serial: &Serial) -> &[Block] {
    let blocks = serial.blocks();
    let end = blocks
        .iter()
        .rposition(|b| *b != Block::SeparatorA)
        .map_or(0, |i| i + 1);
    &blocks[..end]
}

/// Round-trip `count` generated serials through the wire and text forms.
fn self_test(seed: u64, count: usize) -> Result<()> {
    println!("Self-test: {} serials, seed {}", count, seed);

    let mut failures = 0usize;
    let mut wire_chars = 0usize;

    for (i, serial) in sample::generate_serials(seed, count).iter().enumerate() {
        let wire = encode(serial).with_context(|| format!("sample {} failed to encode", i))?;
        wire_chars += wire.len();

        let decoded = match decode(&wire) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!(sample = i, %wire, error = %e, "decode failed");
                failures += 1;
                continue;
            }
        };
        if without_trailing_separators(&decoded) != without_trailing_separators(serial) {
            warn!(sample = i, %wire, "wire round trip mismatch");
            failures += 1;
            continue;
        }

        let text = serial_to_text(serial);
        match text_to_serial(&text) {
            Ok(parsed) if serial_to_text(&parsed) == text => {}
            _ => {
                warn!(sample = i, %text, "text round trip mismatch");
                failures += 1;
            }
        }
    }

    println!("Passed: {}/{}", count - failures, count);
    if count > 0 {
        println!("Average wire length: {:.1} chars", wire_chars as f64 / count as f64);
    }

    if failures > 0 {
        bail!("{} of {} samples failed to round-trip", failures, count);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(mode: Mode) -> Config {
        Config {
            mode,
            ..Config::from_args(&[]).unwrap()
        }
    }

    #[test]
    fn test_convert_modes() {
        let aliases = Aliases::new();

        assert_eq!(
            convert(&config(Mode::Decode), "@UgaiQ", &aliases).unwrap(),
            "1, |"
        );
        assert_eq!(
            convert(&config(Mode::Encode), "1| {4}", &aliases).unwrap(),
            "@Ugak?i"
        );
        assert!(convert(&config(Mode::Decode), "1 {4}", &aliases).is_err());
    }

    #[test]
    fn test_auto_mode() {
        let aliases = Aliases::new();
        let auto = config(Mode::Auto);

        assert_eq!(convert(&auto, "@U1O", &aliases).unwrap(), "");
        assert_eq!(convert(&auto, "1| {4}", &aliases).unwrap(), "@Ugak?i");
        assert!(convert(&auto, "@UL;", &aliases).is_err());
    }

    #[test]
    fn test_without_trailing_separators() {
        let serial = Serial::from(vec![Block::Integer(1), Block::SeparatorA, Block::SeparatorA]);
        assert_eq!(without_trailing_separators(&serial), &[Block::Integer(1)]);
        assert!(without_trailing_separators(&Serial::from(vec![Block::SeparatorA])).is_empty());
    }

    #[test]
    fn test_self_test_passes() {
        self_test(42, 200).unwrap();
    }
}
