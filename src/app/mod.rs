use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::Read;
use std::path::{Path, PathBuf};

use fes::{Fes, FesOptions, ParseMode};

#[derive(Parser)]
#[command(author, version, about = "Convert OGC filters between XML and JSON", long_about = None)]
pub struct Cli {
    /// Input file, or - for stdin
    #[arg(short, long)]
    pub input: PathBuf,

    /// Input format (auto-detected from extension if omitted)
    #[arg(long, value_enum)]
    pub from: Option<WireFormat>,

    /// Output format
    #[arg(long, value_enum)]
    pub to: WireFormat,

    /// Options file (YAML, JSON or TOML)
    #[arg(short, long, env = "FES_CONFIG")]
    pub config: Option<PathBuf>,

    /// Ignore invalid input instead of failing
    #[arg(long)]
    pub lenient: bool,

    /// Disable escaping of text values in XML output
    #[arg(long)]
    pub no_escape: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum WireFormat {
    #[value(name = "xml")]
    Xml,
    #[value(name = "json")]
    Json,
}

pub fn detect_format(input: &Path) -> Option<WireFormat> {
    let ext = input.extension()?.to_str()?;
    match ext.to_lowercase().as_str() {
        "xml" | "fes" => Some(WireFormat::Xml),
        "json" => Some(WireFormat::Json),
        _ => None,
    }
}

pub fn load_options(cli: &Cli) -> Result<FesOptions> {
    let mut options = match &cli.config {
        Some(path) => FesOptions::load(path)
            .with_context(|| format!("Config: Failed to load options from {:?}", path))?,
        None => FesOptions::default(),
    };
    if cli.lenient {
        options.parse_mode = ParseMode::Lenient;
    }
    if cli.no_escape {
        options.escape_text = false;
    }
    Ok(options)
}

pub fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Input: Failed to read stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Input: Failed to read {:?}", input))
    }
}

/// Run one conversion and return the output document.
pub fn convert(
    text: &str,
    from: WireFormat,
    to: WireFormat,
    options: FesOptions,
) -> Result<String> {
    let mut fes = Fes::with_options(options);
    match from {
        WireFormat::Xml => fes.from_xml(text).context("Convert: Invalid XML filter")?,
        WireFormat::Json => fes.from_json(text).context("Convert: Invalid JSON filter")?,
    }
    if fes.filter().is_none() {
        tracing::warn!("Convert: input produced an empty filter");
    }

    match to {
        WireFormat::Xml => Ok(fes.to_xml()),
        WireFormat::Json => fes.to_json().context("Convert: Failed to serialize JSON"),
    }
}
