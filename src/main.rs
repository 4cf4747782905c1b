mod app;

use anyhow::{Context, Result};
use clap::Parser;

use app::{Cli, convert, detect_format, load_options, read_input};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = load_options(&cli)?;
    tracing::info!(
        "Options: parse_mode={:?}, escape_text={}, max_depth={}",
        options.parse_mode,
        options.escape_text,
        options.max_depth
    );

    // Detect format from extension if not provided
    let from = cli
        .from
        .or_else(|| detect_format(&cli.input))
        .context("CLI: Could not detect input format from extension; use --from")?;

    let text = read_input(&cli.input)?;
    let output = convert(&text, from, cli.to, options)?;
    println!("{}", output);

    tracing::info!("Done! Converted {:?} to {:?}", from, cli.to);
    Ok(())
}
