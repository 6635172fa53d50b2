//! layered-conf
//!
//! Resolves the config files that apply to this invocation, loads them in
//! order and prints the merged document.

use anyhow::Result;
use clap::Parser;
use layered_conf::cli::{Cli, LoadReport, OutputFormat};
use layered_conf::logging;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

fn print_json<T: Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    let output = match format {
        OutputFormat::Json => serde_json::to_string(value)?,
        OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
    };
    println!("{output}");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log, cli.verbose)?;

    let mut loader = cli.loader()?;
    let ctx = loader.context();
    debug!(root = %loader.root_path.display(), behaviors = %loader.behaviors(), "Loader ready");

    if cli.paths_only {
        for lookup in loader.resolve(&ctx) {
            println!("{}\t{}", lookup.source, lookup.path.display());
        }
        return Ok(());
    }

    let mut config = Value::Null;
    let result = loader.load_with_context(&ctx, &mut config);

    for path in loader.loaded_paths() {
        info!(path = %path.display(), "Loaded");
    }
    for skipped in loader.skipped() {
        warn!(path = %skipped.path.display(), reason = %skipped.reason, "Skipped");
    }

    if cli.report {
        print_json(&LoadReport::new(&loader, &config, result.as_ref().err()), cli.format)?;
    }
    result?;

    if !cli.report {
        print_json(&config, cli.format)?;
    }

    Ok(())
}
