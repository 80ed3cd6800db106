//! gbdump: inspect GraphBinary messages.
//!
//! Decodes a hex string or a binary file and prints the value tree, or lists
//! the type table supported by the default registry.

use std::{fs, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use graphbinary::{
    init_logging, CodecConfig, Cursor, DataType, ErrorExt, LogFormat, LoggingConfig, Reader,
    TypeRegistry, Value,
};
use tracing::debug;

#[derive(Parser)]
#[command(name = "gbdump")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect GraphBinary encoded values", long_about = None)]
struct Cli {
    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
    /// Only warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
    /// Log events as JSON
    #[arg(long)]
    json_logs: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode one fully-qualified value
    #[command(alias = "d")]
    Decode {
        /// Hex encoded input; whitespace is ignored
        #[arg(long, conflicts_with = "file")]
        hex: Option<String>,
        /// Binary input file
        #[arg(long)]
        file: Option<PathBuf>,
        /// Nesting limit, defaults to GRAPHBINARY_MAX_DEPTH or 64
        #[arg(long)]
        max_depth: Option<usize>,
        /// Keep decoding values until the input is exhausted
        #[arg(long)]
        stream: bool,
    },
    /// List the supported type tags
    Types,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::load().context("invalid logging configuration")?;
    if cli.verbose {
        logging.level = "debug".to_string();
    } else if cli.quiet {
        logging.level = "warn".to_string();
    }
    if cli.json_logs {
        logging.format = LogFormat::Json;
    }
    init_logging(logging).map_err(|e| anyhow::anyhow!(e))?;

    match cli.command {
        Commands::Decode {
            hex,
            file,
            max_depth,
            stream,
        } => {
            let input = match (hex, file) {
                (Some(hex), None) => parse_hex(&hex)?,
                (None, Some(path)) => {
                    fs::read(&path).with_context(|| format!("reading {}", path.display()))?
                }
                _ => bail!("pass exactly one of --hex or --file"),
            };
            let mut config = CodecConfig::load().context("invalid codec configuration")?;
            if let Some(depth) = max_depth {
                config = config.with_max_depth(depth);
            }
            decode(&input, &config, stream)
        }
        Commands::Types => {
            list_types();
            Ok(())
        }
    }
}

fn decode(
    input: &[u8],
    config: &CodecConfig,
    stream: bool,
) -> Result<()> {
    let mut reader = Reader::with_config(TypeRegistry::global(), config);
    let mut cursor = Cursor::new(input);

    loop {
        let start = cursor.position();
        let value: Value = reader.decode(&mut cursor).map_err(|e| {
            let status = e.status_code();
            anyhow::Error::new(e).context(format!("decode failed [{status}]"))
        })?;
        debug!(start, end = cursor.position(), "value decoded");
        println!("{value:#?}");

        if !stream || cursor.is_exhausted() {
            break;
        }
    }

    if !cursor.is_exhausted() {
        bail!(
            "{} trailing bytes at offset {}",
            cursor.remaining(),
            cursor.position()
        );
    }
    Ok(())
}

fn list_types() {
    let registry = TypeRegistry::global();
    for dt in registry.data_types() {
        let marker = match dt {
            DataType::UnspecifiedNull => " (null only)",
            _ => "",
        };
        println!("0x{:02X}  {}{marker}", dt.tag(), dt.name());
    }
}

fn parse_hex(s: &str) -> Result<Vec<u8>> {
    let digits: Vec<u8> = s.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    if digits.len() % 2 != 0 {
        bail!("hex input has an odd number of digits");
    }
    digits
        .chunks(2)
        .map(|pair| {
            let text = std::str::from_utf8(pair).context("hex input is not ASCII")?;
            u8::from_str_radix(text, 16).with_context(|| format!("invalid hex byte '{text}'"))
        })
        .collect()
}
