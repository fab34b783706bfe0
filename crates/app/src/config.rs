//! Command-line flags with environment fallbacks.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use quiz_core::model::BankName;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidBindAddr { raw: String },
    InvalidPath { flag: &'static str, raw: String },
    InvalidDifficulty { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidBindAddr { raw } => write!(f, "invalid --bind value: {raw}"),
            ArgsError::InvalidPath { flag, raw } => write!(f, "invalid {flag} value: {raw:?}"),
            ArgsError::InvalidDifficulty { raw } => {
                write!(f, "invalid --difficulty value: {raw} (expected easy or hard)")
            }
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

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Serve(Args),
    Help,
}

/// Server configuration. `None` bank paths mean "search the default
/// locations".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub bind: SocketAddr,
    pub bank: Option<PathBuf>,
    pub hard_bank: Option<PathBuf>,
    pub difficulty: BankName,
}

impl Args {
    /// Parse the process arguments, reading defaults from the environment.
    ///
    /// # Errors
    ///
    /// Returns `ArgsError` for unknown flags or unusable values.
    pub fn parse() -> Result<Command, ArgsError> {
        Self::parse_from(std::env::args().skip(1), |key| std::env::var(key).ok())
    }

    /// Parse `args` (without the program name), looking defaults up with `env`.
    ///
    /// # Errors
    ///
    /// Returns `ArgsError` for unknown flags or unusable values.
    pub fn parse_from(
        args: impl IntoIterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Command, ArgsError> {
        let mut bind = parse_bind(
            env("QUIZ_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned()),
        )?;
        let mut bank = env("QUIZ_BANK_PATH")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let mut hard_bank = env("QUIZ_HARD_BANK_PATH")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let mut difficulty = env("QUIZ_DIFFICULTY")
            .map(parse_difficulty)
            .transpose()?
            .unwrap_or_default();

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--bind" => bind = parse_bind(require_value(&mut args, "--bind")?)?,
                "--bank" => bank = Some(parse_path(&mut args, "--bank")?),
                "--hard-bank" => hard_bank = Some(parse_path(&mut args, "--hard-bank")?),
                "--difficulty" => {
                    difficulty = parse_difficulty(require_value(&mut args, "--difficulty")?)?;
                }
                "--help" | "-h" => return Ok(Command::Help),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Command::Serve(Self {
            bind,
            bank,
            hard_bank,
            difficulty,
        }))
    }
}

fn parse_bind(raw: String) -> Result<SocketAddr, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidBindAddr { raw })
}

fn parse_path(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<PathBuf, ArgsError> {
    let value = require_value(args, flag)?;
    if value.trim().is_empty() {
        return Err(ArgsError::InvalidPath { flag, raw: value });
    }
    Ok(PathBuf::from(value))
}

fn parse_difficulty(raw: String) -> Result<BankName, ArgsError> {
    raw.parse()
        .map_err(|_| ArgsError::InvalidDifficulty { raw })
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --bind <addr>             Listen address (default: {DEFAULT_BIND_ADDR})");
    eprintln!("  --bank <path>             Easy question bank file");
    eprintln!("  --hard-bank <path>        Hard question bank file (optional)");
    eprintln!("  --difficulty <easy|hard>  Bank active at startup (default: easy)");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Without --bank/--hard-bank the files questionbank.json and");
    eprintln!("questionbank_hard.json are searched in ., .. and data/.");
    eprintln!();
    eprintln!("Environment (same as flags, also read from .env):");
    eprintln!("  QUIZ_BIND_ADDR, QUIZ_BANK_PATH, QUIZ_HARD_BANK_PATH, QUIZ_DIFFICULTY, RUST_LOG");
}
