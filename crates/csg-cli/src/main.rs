//! `csg2json` CLI — convert CSG scene files to CSGJS (JSON) and back.
//!
//! ## Usage
//!
//! ```sh
//! # CSG → CSGJS (direction inferred from the extensions)
//! csg2json scene.csg scene.csgjs
//!
//! # CSGJS → canonical CSG
//! csg2json scene.csgjs scene.csg
//!
//! # stdin → stdout, explicit formats, pretty JSON
//! cat scene.csg | csg2json --from csg --to json --pretty - -
//!
//! # Normalize a CSG file to canonical form
//! csg2json --to csg scene.csg clean.csg
//! ```
//!
//! Logging goes to stderr through `env_logger`; set `RUST_LOG=debug` or pass
//! `--verbose` to see it.

use anyhow::{anyhow, Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use csg_core::CsgError;
use log::info;
use serde_json::Value;
use std::io::{self, Read};
use std::path::Path;
use std::process;

#[derive(Parser)]
#[command(
    name = "csg2json",
    version,
    about = "Convert CSG files to CSGJS and vice versa"
)]
struct Cli {
    /// Input file (`-` reads stdin)
    input: String,

    /// Output file (`-` writes stdout)
    output: String,

    /// Input format (inferred from the input extension if omitted)
    #[arg(long, value_enum)]
    from: Option<Format>,

    /// Output format (inferred from the output extension, otherwise the
    /// opposite of the input format)
    #[arg(long, value_enum)]
    to: Option<Format>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// CSG scene text
    Csg,
    /// CSGJS, the scene tree as JSON
    Json,
}

impl Format {
    fn from_path(path: &str) -> Option<Format> {
        let ext = Path::new(path).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csg" | "scad" => Some(Format::Csg),
            "csgjs" | "json" => Some(Format::Json),
            _ => None,
        }
    }

    fn opposite(self) -> Format {
        match self {
            Format::Csg => Format::Json,
            Format::Json => Format::Csg,
        }
    }
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            // Wrong argument count: show usage, not an error.
            ErrorKind::MissingRequiredArgument
            | ErrorKind::UnknownArgument
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                Cli::command()
                    .print_help()
                    .context("Failed to print usage")?;
                process::exit(0);
            }
            _ => err.exit(),
        },
    };

    init_logging(cli.verbose);

    let input_format = cli
        .from
        .or_else(|| Format::from_path(&cli.input))
        .unwrap_or(Format::Csg);
    let output_format = cli
        .to
        .or_else(|| Format::from_path(&cli.output))
        .unwrap_or_else(|| input_format.opposite());
    info!(
        "converting {} ({:?}) to {} ({:?})",
        cli.input, input_format, cli.output, output_format
    );

    let source = read_input(&cli.input)?;
    let document = read_document(&source, input_format, &cli.input)?;

    let text = match output_format {
        Format::Json if cli.pretty => serde_json::to_string_pretty(&document)?,
        Format::Json => serde_json::to_string(&document)?,
        Format::Csg => csg_core::write(&document)
            .with_context(|| format!("Failed to write CSG from {}", cli.input))?,
    };

    write_output(&cli.output, &text)?;
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

/// Parse the input text in the given format. CSG parse failures carry a caret
/// diagnostic under the offending source line.
fn read_document(source: &str, format: Format, path: &str) -> Result<Value> {
    match format {
        Format::Csg => csg_core::parse(source)
            .map_err(|err| match err {
                CsgError::Parse(e) => anyhow!("{e}\n{}", e.diagnostic(source)),
                other => other.into(),
            })
            .with_context(|| format!("Failed to parse CSG from {path}")),
        Format::Json => csg_core::parse_json(source)
            .with_context(|| format!("Failed to read CSGJS from {path}")),
    }
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
}

fn write_output(path: &str, content: &str) -> Result<()> {
    if path == "-" {
        print!("{}", content);
        return Ok(());
    }
    std::fs::write(path, content).with_context(|| format!("Failed to write file: {}", path))
}
