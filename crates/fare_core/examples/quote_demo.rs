//! Quote the three fixture trips around Basey for every passenger class.
//!
//! Uses the map service when `GOOGLE_MAPS_SERVER_API_KEY` is set, otherwise
//! the geometric estimate.
//!
//! Run with: cargo run -p fare_core --example quote_demo

use fare_core::config::FareGuideConfig;
use fare_core::discount::PassengerClass;
use fare_core::orchestrator::RouteFareOrchestrator;
use fare_core::test_helpers::{bacubac, basey_center, basiao};

fn main() {
    let config = FareGuideConfig::default().with_env_overrides();
    let orchestrator = RouteFareOrchestrator::from_config(&config);

    let trips = [
        ("Poblacion -> Bacubac", basey_center(), bacubac()),
        ("Poblacion -> Basiao", basey_center(), basiao()),
        ("Basiao -> Bacubac", basiao(), bacubac()),
    ];
    let classes = [
        PassengerClass::Regular,
        PassengerClass::Senior,
        PassengerClass::Pwd,
        PassengerClass::Student,
        PassengerClass::Child,
    ];

    println!("--- Fare quotes (map service configured: {}) ---", orchestrator.has_map_service());
    for (label, origin, destination) in trips {
        for class in classes {
            match orchestrator.compute_fare(origin, destination, class, true, None) {
                Ok(quote) => println!(
                    "  {label:<22} {:<8} {:>6.2} km via {:<11} original {:>6}  discount {:>5}  fare {:>6}",
                    class.as_str(),
                    quote.distance.kilometers,
                    quote.method().as_str(),
                    quote.fare.original_fare.to_string(),
                    quote.fare.discount_applied.to_string(),
                    quote.fare.fare.to_string(),
                ),
                Err(err) => println!("  {label:<22} {:<8} error: {err}", class.as_str()),
            }
        }
    }
}
