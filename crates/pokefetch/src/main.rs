use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::Env;
use pokefetch_api::PokeApiClient;
use std::sync::Arc;

mod controller;
mod lookup;
mod render;
mod tui;

#[derive(Parser)]
#[command(name = "pokefetch")]
#[command(about = "Look up a Pokémon by name", long_about = None)]
#[command(version)]
struct Cli {
    #[arg(short = 'd', long = "debug", global = true, hide = true)]
    debug: bool,

    /// Base URL of the PokeAPI service (default: $POKEFETCH_API_URL or https://pokeapi.co/api/v2)
    #[arg(long = "api-url", global = true, value_name = "URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive lookup screen (default)
    Tui,

    #[command(alias = "l")]
    Lookup(lookup::LookupArgs),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "Error:".red());
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let env = if cli.debug {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("error")
    };
    env_logger::Builder::from_env(env).init();

    let client = PokeApiClient::from_env(cli.api_url.as_deref())?;
    log::debug!("Using PokeAPI at {}", client.base_url());

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => tui::run(Arc::new(client)),
        Commands::Lookup(args) => {
            if !lookup::execute(args, &client)? {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
