mod cli;
mod csv_text;
mod decode;
mod error;
mod fmt;
mod fx;
mod loader;
mod models;
mod parse;
mod reports;
mod season;
mod settings;

use clap::{CommandFactory, Parser};

use cli::{Cli, Commands};

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let level = if verbose { "debug" } else { "warn" };
    let filter = std::env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| format!("offseason={level}"));

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Init { sources } => cli::init::run(&sources),
        Commands::Status => cli::status::run(),
        Commands::Load { sources, details } => cli::load::run(&sources, details),
        Commands::Season { code, fiscal_year } => cli::season::run(&code, fiscal_year),
        Commands::Report { command } => cli::report::dispatch(command),
        Commands::Export {
            sources,
            kind,
            format,
            output,
            off_season,
        } => cli::export::run(&sources, &kind, &format, output.as_deref(), off_season),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "offseason", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
