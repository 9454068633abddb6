use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};

use fare_core::contract::FareQuoteRequest;
use fare_core::discount::PassengerClass;

#[derive(Parser)]
#[command(
    name = "fareguide",
    about = "Tricycle fare quotes for Basey, Samar",
    long_about = "Computes regulated fares from a road distance (map service) or a\n\
                  geometric estimate, applying statutory passenger discounts."
)]
pub struct Cli {
    /// JSON configuration file; defaults apply when omitted
    #[arg(long, global = true, env = "FAREGUIDE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG wins when set
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Quote a fare between two points
    Quote(QuoteArgs),
    /// Print the active tariff and discount rates
    Tariff,
}

#[derive(Args)]
pub struct QuoteArgs {
    /// Origin as "lat,lng"
    #[arg(long, value_parser = parse_lat_lng, required_unless_present = "request")]
    pub from: Option<[f64; 2]>,

    /// Destination as "lat,lng"
    #[arg(long, value_parser = parse_lat_lng, required_unless_present = "request")]
    pub to: Option<[f64; 2]>,

    /// Passenger class: REGULAR, SENIOR, PWD, STUDENT or CHILD
    #[arg(long = "class", default_value = "REGULAR")]
    pub passenger_class: PassengerClass,

    /// Skip the map service and use the geometric estimate
    #[arg(long)]
    pub no_map: bool,

    /// Discount card reference to look up in --cards
    #[arg(long)]
    pub card: Option<String>,

    /// JSON array of discount cards
    #[arg(long)]
    pub cards: Option<PathBuf>,

    /// Read a full JSON request instead of the flags above
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub request: Option<PathBuf>,
}

impl QuoteArgs {
    pub fn to_request(&self) -> Result<FareQuoteRequest> {
        let (Some(origin), Some(destination)) = (self.from, self.to) else {
            bail!("--from and --to are required without --request");
        };
        Ok(FareQuoteRequest {
            origin,
            destination,
            passenger_class: self.passenger_class,
            use_map_service: !self.no_map,
            discount_card_ref: self.card.clone(),
        })
    }
}

fn parse_lat_lng(raw: &str) -> Result<[f64; 2], String> {
    let (lat, lng) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected \"lat,lng\", got '{raw}'"))?;
    let lat = lat
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("invalid latitude '{lat}': {err}"))?;
    let lng = lng
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("invalid longitude '{lng}': {err}"))?;
    Ok([lat, lng])
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_lat_lng_pairs() {
        assert_eq!(parse_lat_lng("11.28026, 125.06909"), Ok([11.28026, 125.06909]));
        assert!(parse_lat_lng("11.28").is_err());
        assert!(parse_lat_lng("north,125").is_err());
    }

    #[test]
    fn quote_flags_build_a_request() {
        let cli = Cli::try_parse_from([
            "fareguide",
            "quote",
            "--from",
            "11.28026,125.06909",
            "--to",
            "11.3012,125.0823",
            "--class",
            "senior",
            "--no-map",
        ])
        .expect("parse");
        let Command::Quote(args) = cli.command else {
            panic!("expected quote");
        };
        let request = args.to_request().expect("request");
        assert_eq!(request.passenger_class, PassengerClass::Senior);
        assert!(!request.use_map_service);
        assert_eq!(request.destination, [11.3012, 125.0823]);
    }

    #[test]
    fn quote_requires_points_without_request_file() {
        assert!(Cli::try_parse_from(["fareguide", "quote", "--from", "11.2,125.0"]).is_err());
    }
}
