//! # Quote CLI
//!
//! Prices a proposal file and prints the breakdown as JSON.
//!
//! ## Usage
//! ```bash
//! # Contractor view
//! cargo run -p roofquote-proposal --bin quote -- job.json
//!
//! # Client view (margins folded into categories)
//! cargo run -p roofquote-proposal --bin quote -- --hide-margins job.json
//!
//! # Explicit config file
//! cargo run -p roofquote-proposal --bin quote -- --config ./quote.toml job.json
//! ```
//!
//! ## Input Format
//! ```json
//! {
//!   "clientName": "Dana Whitfield",
//!   "projectAddress": "14 Larch Lane",
//!   "lineItems": [
//!     { "name": "Shingles", "category": "material", "quantity": 10, "unit": "sq", "unitPrice": 100 },
//!     { "name": "Install crew", "category": "labor", "quantity": 10, "unit": "hr", "unitPrice": 75 }
//!   ],
//!   "addOns": [{ "name": "Skylight", "price": 450 }],
//!   "pricing": { "discountAmount": 100 }
//! }
//! ```
//!
//! Missing `pricing` fields fall back to the built-in defaults; a missing
//! `pricing` object falls back to quote.toml.

use std::env;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::info;

use roofquote_core::{AddOn, LineItem, PricingParameters};
use roofquote_proposal::commands::proposal::{
    add_add_on, add_line_item, create_proposal, get_breakdown, set_pricing, CreateProposalRequest,
};
use roofquote_proposal::state::{ItemOrigin, ProposalStore, QuoteConfig};

/// A proposal as written by hand or exported from the editor.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct QuoteFile {
    client_name: String,
    project_address: String,
    line_items: Vec<LineItem>,
    add_ons: Vec<AddOn>,
    pricing: Option<PricingParameters>,
}

/// Parsed command line.
#[derive(Debug, PartialEq)]
struct CliArgs {
    config_path: Option<PathBuf>,
    hide_margins: bool,
    input: PathBuf,
}

/// What the command line asks for.
#[derive(Debug, PartialEq)]
enum Command {
    Help,
    Price(CliArgs),
}

/// Parses arguments (without the program name).
fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut config_path: Option<PathBuf> = None;
    let mut hide_margins = false;
    let mut input: Option<PathBuf> = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = iter.next().ok_or_else(|| format!("{} requires a path", arg))?;
                config_path = Some(PathBuf::from(path));
            }
            "--hide-margins" => hide_margins = true,
            "--help" | "-h" => return Ok(Command::Help),
            other if other.starts_with('-') => {
                return Err(format!("unknown option '{}' (see --help)", other));
            }
            other => {
                if input.is_some() {
                    return Err(format!("unexpected argument '{}' (see --help)", other));
                }
                input = Some(PathBuf::from(other));
            }
        }
    }

    let input = input.ok_or("missing proposal file (see --help)")?;
    Ok(Command::Price(CliArgs {
        config_path,
        hide_margins,
        input,
    }))
}

fn print_help() {
    println!("RoofQuote - price a proposal file");
    println!();
    println!("Usage: quote [OPTIONS] <FILE>");
    println!();
    println!("Options:");
    println!("  -c, --config <PATH>   Config file (default: platform config dir/quote.toml)");
    println!("      --hide-margins    Fold overhead and profit into category totals");
    println!("  -h, --help            Show this help message");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().skip(1).collect();

    let CliArgs {
        config_path,
        hide_margins,
        input,
    } = match parse_args(&args)? {
        Command::Help => {
            print_help();
            return Ok(());
        }
        Command::Price(cli) => cli,
    };

    roofquote_proposal::init_tracing();

    let config = QuoteConfig::load(config_path)?;
    let file: QuoteFile = serde_json::from_str(&std::fs::read_to_string(&input)?)?;
    info!(?input, items = file.line_items.len(), add_ons = file.add_ons.len(), "Pricing proposal file");

    let store = ProposalStore::new();
    let client_name = if file.client_name.trim().is_empty() {
        input.display().to_string()
    } else {
        file.client_name
    };
    let proposal = create_proposal(
        &store,
        &config,
        CreateProposalRequest {
            client_name,
            project_address: file.project_address,
            pricing: None,
        },
    )?;

    for item in file.line_items {
        add_line_item(&store, &proposal.id, item, ItemOrigin::Manual)?;
    }
    for add_on in file.add_ons {
        add_add_on(&store, &proposal.id, &add_on.name, add_on.price)?;
    }

    let mut pricing = file.pricing.unwrap_or(proposal.pricing);
    pricing.hide_margins |= hide_margins;
    set_pricing(&store, &proposal.id, pricing)?;

    let response = get_breakdown(&store, &config, &proposal.id)?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_full_command_line() {
        let parsed = parse_args(&args(&["--hide-margins", "-c", "quote.toml", "job.json"])).unwrap();
        assert_eq!(
            parsed,
            Command::Price(CliArgs {
                config_path: Some(PathBuf::from("quote.toml")),
                hide_margins: true,
                input: PathBuf::from("job.json"),
            })
        );
    }

    #[test]
    fn test_help_wins() {
        assert_eq!(parse_args(&args(&["job.json", "--help"])).unwrap(), Command::Help);
    }

    #[test]
    fn test_config_without_path_is_an_error() {
        let err = parse_args(&args(&["job.json", "--config"])).unwrap_err();
        assert!(err.contains("--config"));
    }

    #[test]
    fn test_unknown_option_is_not_the_input() {
        let err = parse_args(&args(&["--hide-margin", "job.json"])).unwrap_err();
        assert!(err.contains("--hide-margin"));
    }

    #[test]
    fn test_missing_input() {
        assert!(parse_args(&args(&["--hide-margins"])).is_err());
        assert!(parse_args(&args(&["a.json", "b.json"])).is_err());
    }
}
