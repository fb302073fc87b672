use anyhow::Context;
use clap::Parser;
use cypher_ai::config::ConfigManager;
use cypher_ai::protocol::{emit_error, emit_ready, Dispatcher};
use cypher_ai::CypherEngine;
use std::io::{self, Write};
use std::path::PathBuf;

/// Genetic policy evolution engine driven over stdin/stdout
#[derive(Parser, Debug)]
#[command(name = "cypher-ai", version)]
struct Cli {
    /// TOML configuration file layered over the built-in defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Override the generation budget
    #[arg(long)]
    max_generations: Option<usize>,
}

fn main() {
    // Logs go to stderr; stdout is reserved for protocol lines
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        let mut stderr = io::stderr();
        let _ = emit_error(&mut stderr, &format!("{:#}", e));
        let _ = stderr.flush();
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut manager = ConfigManager::load(cli.config.as_deref()).context("loading configuration")?;
    manager.update(|config| {
        if let Some(seed) = cli.seed {
            config.evolution.seed = Some(seed);
        }
        if let Some(max_generations) = cli.max_generations {
            config.evolution.max_generations = max_generations;
        }
    })?;

    let engine = CypherEngine::new(manager.get()).context("initializing engine")?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut output = stdout.lock();
    let mut errors = io::stderr();

    emit_ready(&mut output)?;

    let mut dispatcher = Dispatcher::new(engine);
    let summary = dispatcher.run(stdin.lock(), &mut output, &mut errors)?;
    log::info!(
        "Dispatcher stopped ({:?}): {} executed, {} failed, {} skipped",
        summary.exit,
        summary.executed,
        summary.failed,
        summary.skipped
    );
    Ok(())
}
