//! CLI entry point - the composition root.
//!
//! Logging goes to stderr so stdout carries only the resolved command, the
//! JSON report, or the bridged LSP stream.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use risorls_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers};

/// Filter used when `RUST_LOG` is unset: quiet, except for server stderr.
const DEFAULT_FILTER: &str = "warn,risorls_runtime::trace=info";

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    let config = CliConfig::from_cli(&cli)?;
    let ctx = bootstrap(config);

    let code = match cli.command {
        Commands::Resolve { json } => handlers::resolve::execute(&ctx, json).await?,
        Commands::InstallHint => handlers::install_hint::execute(&ctx),
        Commands::Run { args } => handlers::run::execute(&ctx, args).await?,
    };
    Ok(code)
}

#[tokio::main]
async fn main() {
    // Load .env before parsing so `env`-backed flags see it
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err}");
            err.downcast_ref::<CliError>().map_or(1, CliError::exit_code)
        }
    };

    // Exit directly: a blocking stdin read from `run` may still be parked
    // on the runtime's blocking pool.
    std::process::exit(code);
}
