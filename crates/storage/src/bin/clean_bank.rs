use std::fmt;
use std::path::PathBuf;

use storage::bank_file::{clean_bank_document, parse_bank};

#[derive(Debug, Clone)]
struct Args {
    path: PathBuf,
    dry_run: bool,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidPath { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidPath { raw } => write!(f, "invalid --bank value: {raw:?}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut path = std::env::var("QUIZ_BANK_PATH")
            .map_or_else(|_| PathBuf::from("questionbank.json"), PathBuf::from);
        let mut dry_run = false;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--bank" => {
                    let value = require_value(&mut args, "--bank")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidPath { raw: value });
                    }
                    path = PathBuf::from(value);
                }
                "--dry-run" => dry_run = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { path, dry_run })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin clean-bank -- [options]");
    eprintln!();
    eprintln!("Strips citation references from question explanations.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --bank <path>             Bank file to clean (default: questionbank.json)");
    eprintln!("  --dry-run                 Report changes without writing the file");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  QUIZ_BANK_PATH");
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let data = std::fs::read_to_string(&args.path)?;
    let mut doc: serde_json::Value = serde_json::from_str(&data)?;
    let changed = clean_bank_document(&mut doc);

    let cleaned = serde_json::to_string_pretty(&doc)?;
    // Refuse to write something the server would not load.
    parse_bank(&cleaned)?;

    if args.dry_run {
        println!(
            "{changed} explanation(s) in {} would be cleaned",
            args.path.display()
        );
        return Ok(());
    }

    std::fs::write(&args.path, cleaned)?;
    println!(
        "Cleaned {changed} explanation(s) in {}",
        args.path.display()
    );
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
