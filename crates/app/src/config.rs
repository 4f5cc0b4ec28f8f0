//! Configuration for the userial command-line tool.
//!
//! Handles parsing command-line arguments and filling in defaults.
//!
//! # Philosophy
//!
//! The tool should work with ZERO arguments: it reads lines from stdin
//! and picks decode or encode from the `@U` prefix. The seed used for
//! `--sample` is printed so self-test runs are reproducible.

use std::path::PathBuf;

/// What to do with the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Decode `@U` input, encode anything else
    Auto,
    /// Wire string -> text
    Decode,
    /// Text -> wire string
    Encode,
}

/// Complete configuration for one invocation.
#[derive(Debug, Clone)]
pub struct Config {
    // === Input ===
    pub mode: Mode,

    /// Input value (None = read stdin)
    pub input: Option<String>,

    /// JSON alias table (`{"name": index, ...}`)
    pub aliases_file: Option<PathBuf>,

    // === Self-test ===
    /// Number of random serials to round-trip (None = no self-test)
    pub sample_count: Option<usize>,

    /// Random seed for sample generation
    pub seed: u64,

    // === Behavior ===
    /// Tracing filter, overrides `RUST_LOG`
    pub log_filter: Option<String>,

    /// Whether to print decode statistics
    pub print_stats: bool,

    /// Whether to print resolved configuration
    pub print_config: bool,
}

impl Config {
    /// Parse configuration from command-line arguments (program name excluded).
    ///
    /// `--decode` and `--encode` take an optional value; without one the
    /// input comes from stdin. A bare argument is taken as the input.
    pub fn from_args(args: &[String]) -> Result<Self, String> {
        let mut mode = Mode::Auto;
        let mut input: Option<String> = None;
        let mut aliases_file: Option<PathBuf> = None;
        let mut sample_count: Option<usize> = None;
        let mut seed: Option<u64> = None;
        let mut log_filter: Option<String> = None;
        let mut print_stats = false;
        let mut print_config = false;

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                flag @ ("-d" | "--decode" | "-e" | "--encode") => {
                    if mode != Mode::Auto {
                        return Err("--decode and --encode are mutually exclusive".to_string());
                    }
                    mode = if matches!(flag, "-d" | "--decode") {
                        Mode::Decode
                    } else {
                        Mode::Encode
                    };
                    if let Some(value) = args.get(i + 1).filter(|v| !v.starts_with('-')) {
                        input = Some(value.clone());
                        i += 1;
                    }
                }
                "--aliases" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--aliases requires a path".to_string());
                    }
                    aliases_file = Some(PathBuf::from(&args[i]));
                }
                "--sample" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--sample requires a number".to_string());
                    }
                    sample_count = Some(args[i].parse().map_err(|_| "invalid sample count")?);
                }
                "--seed" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--seed requires a number".to_string());
                    }
                    seed = Some(args[i].parse().map_err(|_| "invalid seed")?);
                }
                "--log" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--log requires a filter".to_string());
                    }
                    log_filter = Some(args[i].clone());
                }
                "--stats" => {
                    print_stats = true;
                }
                "--print-config" => {
                    print_config = true;
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                other if other.starts_with('-') && other.len() > 1 => {
                    return Err(format!("unknown argument: {}", other));
                }
                value => {
                    if input.is_some() {
                        return Err(format!("unexpected extra input: {}", value));
                    }
                    input = Some(value.to_string());
                }
            }
            i += 1;
        }

        // Determine seed (explicit or time-based)
        let seed = seed.unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|t| t.as_millis() as u64)
                .unwrap_or(0)
        });

        Ok(Config {
            mode,
            input,
            aliases_file,
            sample_count,
            seed,
            log_filter,
            print_stats,
            print_config,
        })
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        println!("Mode: {:?}", self.mode);
        println!("Input: {}", self.input.as_deref().unwrap_or("(stdin)"));
        println!(
            "Aliases: {}",
            self.aliases_file
                .as_ref()
                .map_or_else(|| "(none)".to_string(), |p| p.display().to_string())
        );
        println!();
        println!("=== Self-test ===");
        match self.sample_count {
            Some(count) => println!("Samples: {} (seed {})", count, self.seed),
            None => println!("Samples: off"),
        }
        println!();
        println!("Log filter: {}", self.log_filter.as_deref().unwrap_or("(RUST_LOG)"));
        println!("Statistics: {}", if self.print_stats { "on" } else { "off" });
        println!();
    }
}

fn print_help() {
    println!("userial: decode and encode @U item serials");
    println!();
    println!("USAGE:");
    println!("    userial [OPTIONS] [INPUT]");
    println!();
    println!("OPTIONS:");
    println!("    -d, --decode [SERIAL]   Decode a wire string to text (default: stdin)");
    println!("    -e, --encode [TEXT]     Encode text to a wire string (default: stdin)");
    println!("    --aliases <PATH>        JSON object mapping part names to indices");
    println!("    --stats                 Print decode statistics");
    println!();
    println!("    --sample <N>            Round-trip N random serials and report");
    println!("    --seed <N>              Random seed for --sample (default: time-based)");
    println!();
    println!("    --log <FILTER>          Tracing filter, e.g. debug (default: RUST_LOG)");
    println!("    --print-config          Print resolved configuration");
    println!("    --help, -h              Print this help");
    println!();
    println!("Without -d or -e, input starting with @U is decoded and anything else");
    println!("is encoded.");
    println!();
    println!("EXAMPLES:");
    println!("    userial -d @UgbV{{rFme!KI4sa#RG}}W#sX3@xsFnx");
    println!("    userial -e '3, 0, 1, 50| 2, 1292|| {{95}} {{2}}|'");
    println!("    echo @U1O | userial --stats");
    println!("    userial --sample 1000 --seed 42");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_args(&[]).unwrap();
        assert_eq!(config.mode, Mode::Auto);
        assert_eq!(config.input, None);
        assert_eq!(config.sample_count, None);
        assert!(!config.print_stats);
    }

    #[test]
    fn test_mode_with_value() {
        let config = Config::from_args(&args(&["-d", "@U1O", "--stats"])).unwrap();
        assert_eq!(config.mode, Mode::Decode);
        assert_eq!(config.input.as_deref(), Some("@U1O"));
        assert!(config.print_stats);

        let config = Config::from_args(&args(&["--encode", "3, 0|"])).unwrap();
        assert_eq!(config.mode, Mode::Encode);
        assert_eq!(config.input.as_deref(), Some("3, 0|"));
    }

    #[test]
    fn test_mode_without_value_reads_stdin() {
        let config = Config::from_args(&args(&["-e", "--log", "debug"])).unwrap();
        assert_eq!(config.mode, Mode::Encode);
        assert_eq!(config.input, None);
        assert_eq!(config.log_filter.as_deref(), Some("debug"));
    }

    #[test]
    fn test_positional_input() {
        let config = Config::from_args(&args(&["@UgaiQ"])).unwrap();
        assert_eq!(config.mode, Mode::Auto);
        assert_eq!(config.input.as_deref(), Some("@UgaiQ"));

        assert!(Config::from_args(&args(&["a", "b"])).is_err());
    }

    #[test]
    fn test_sample_and_seed() {
        let config = Config::from_args(&args(&["--sample", "50", "--seed", "7"])).unwrap();
        assert_eq!(config.sample_count, Some(50));
        assert_eq!(config.seed, 7);
    }

    #[test]
    fn test_errors() {
        assert!(Config::from_args(&args(&["-d", "-e"])).is_err());
        assert!(Config::from_args(&args(&["--seed"])).is_err());
        assert!(Config::from_args(&args(&["--sample", "many"])).is_err());
        assert!(Config::from_args(&args(&["--bogus"])).is_err());
    }
}
