use std::fs::File;
use std::io::{self, BufReader};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use shipforge_cli::Args;

fn main() -> ExitCode {
    shipforge_observability::tracing::init_with_default("warn");
    let args = Args::parse();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the order was fully allocated.
fn run(args: &Args) -> anyhow::Result<bool> {
    let scenario = match &args.scenario {
        Some(path) if !args.reads_stdin() => {
            let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
            shipforge_cli::read_scenario(BufReader::new(file))?
        }
        _ => shipforge_cli::read_scenario(io::stdin().lock())?,
    };

    let config = shipforge_cli::effective_config(scenario.config.clone(), args)?;
    let quote = shipforge_cli::quote(scenario, &config)?;

    let output = if quote.is_complete() {
        render(&quote, args.compact)?
    } else {
        tracing::warn!(order = %quote.order_number, shortfalls = quote.shortfalls.len(), "order cannot be fulfilled");
        render(&quote.shortfalls, args.compact)?
    };
    println!("{output}");
    Ok(quote.is_complete())
}

fn render(value: &impl serde::Serialize, compact: bool) -> serde_json::Result<String> {
    if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
}
