//! cmdtree - resolve prefixed command input against a tree of command definitions.

use std::io::{self, BufRead};

use anyhow::Context;
use cmdtree::cli::{Cli, OutputFormat};
use cmdtree::commands::{help, CommandRouter, HandlerTable, Resolution};
use cmdtree::config::Config;
use cmdtree::error::CommandTreeError;
use cmdtree::logging;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse_args();
    logging::init_stderr_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        match e.downcast_ref::<CommandTreeError>() {
            Some(err) => error!("{}: {}", err.category(), err),
            None => error!("{e:#}"),
        }
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let format = cli.parse_output_format().map_err(CommandTreeError::config)?;

    // Load configuration file, then apply CLI overrides
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    cli.apply_overrides(&mut config);

    if config.sources.is_empty() {
        return Err(CommandTreeError::config(
            "No definition directories. Pass --dir or set `sources` in the config file",
        )
        .into());
    }

    let router = CommandRouter::from_config(&config, HandlerTable::new())?;

    if cli.tree {
        print!("{}", help::render_tree(router.commands()));
        if cli.inputs.is_empty() {
            return Ok(());
        }
    }

    if cli.inputs.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line.context("Failed to read stdin")?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            report(&router, line, format)?;
        }
    } else {
        for input in &cli.inputs {
            report(&router, input, format)?;
        }
    }

    Ok(())
}

/// Resolves one input and prints the outcome.
fn report(router: &CommandRouter, input: &str, format: OutputFormat) -> anyhow::Result<()> {
    let resolution = Resolution::from_result(input, &router.command(input));
    match format {
        OutputFormat::Text => println!("{}", resolution.to_text()),
        OutputFormat::Json => println!("{}", serde_json::to_string(&resolution)?),
    }
    Ok(())
}
