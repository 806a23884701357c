use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pokefetch_api::DataSource;
use serde_json::json;

use crate::controller::{LookupController, normalize_query};
use crate::render::{CardView, Display};

#[derive(Args, Debug)]
#[command(about = "Look up a single Pokémon and print its card")]
pub struct LookupArgs {
    /// Name (or national dex number) to look up
    pub name: String,

    /// Print the card as JSON
    #[arg(long)]
    pub json: bool,
}

/// Runs one lookup. Returns false when the lookup ended in an error block.
/// A blank name is a no-op: nothing is fetched or printed.
pub fn execute(args: LookupArgs, source: &dyn DataSource) -> Result<bool> {
    if normalize_query(&args.name).is_none() {
        log::debug!("Blank name, nothing to look up");
        return Ok(true);
    }

    let mut controller = LookupController::new();
    controller.run_lookup(source, &args.name);
    let display = controller.display();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&to_json(display))?);
    } else {
        match display {
            Display::Card(card) => print!("{}", format_card(card)),
            Display::Error(message) => eprintln!("{}", format_error(message)),
            Display::Empty => {}
        }
    }

    Ok(!matches!(display, Display::Error(_)))
}

fn to_json(display: &Display) -> serde_json::Value {
    match display {
        Display::Card(card) => json!(card),
        Display::Error(message) => json!({ "error": message }),
        Display::Empty => serde_json::Value::Null,
    }
}

fn format_card(card: &CardView) -> String {
    let text = card.to_text();
    let (header, body) = text.split_once('\n').unwrap_or((text.as_str(), ""));
    format!("{}\n{}", header.red().bold(), body)
}

fn format_error(message: &str) -> String {
    format!("{} {}", "┃".red(), message.red().bold())
}
