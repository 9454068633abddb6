//! Request/response contract of the fare-quote boundary.
//!
//! These are the shapes an HTTP layer (de)serializes. Money is rendered as
//! JSON numbers here and nowhere else.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::discount::{DiscountType, PassengerClass};
use crate::orchestrator::FareQuote;
use crate::routing::{DistanceMethod, RouteDetails};

fn default_use_map_service() -> bool {
    true
}

/// Raw coordinates are validated by the orchestrator so that an out-of-range
/// value surfaces as `InvalidCoordinate` rather than a parse error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FareQuoteRequest {
    pub origin: [f64; 2],
    pub destination: [f64; 2],
    #[serde(default, alias = "passenger_class", alias = "passenger_type")]
    pub passenger_class: PassengerClass,
    #[serde(default = "default_use_map_service", alias = "use_map_service")]
    pub use_map_service: bool,
    #[serde(default, alias = "discount_card_ref")]
    pub discount_card_ref: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownPayload {
    #[serde(with = "rust_decimal::serde::float")]
    pub base_fare: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_distance_km: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub additional_distance_km: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub billed_additional_km: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub additional_fare: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub distance_km: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountInfoPayload {
    pub passenger_class: PassengerClass,
    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_type: Option<DiscountType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FareQuoteResponse {
    pub method: DistanceMethod,
    #[serde(with = "rust_decimal::serde::float")]
    pub distance_km: Decimal,
    pub duration_seconds: Option<u64>,
    #[serde(with = "rust_decimal::serde::float")]
    pub fare: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub original_fare: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_applied: Decimal,
    pub breakdown: BreakdownPayload,
    pub discount_info: Option<DiscountInfoPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<RouteDetails>,
}

impl From<&FareQuote> for FareQuoteResponse {
    fn from(quote: &FareQuote) -> Self {
        let fare = &quote.fare;
        let breakdown = &fare.breakdown;
        Self {
            method: quote.distance.method,
            distance_km: breakdown.distance_km,
            duration_seconds: quote.distance.duration_secs,
            fare: fare.fare,
            original_fare: fare.original_fare,
            discount_applied: fare.discount_applied,
            breakdown: BreakdownPayload {
                base_fare: breakdown.base_fare,
                base_distance_km: breakdown.base_distance_km,
                additional_distance_km: breakdown.additional_distance_km,
                billed_additional_km: breakdown.billed_additional_km,
                additional_fare: breakdown.additional_fare,
                distance_km: breakdown.distance_km,
            },
            discount_info: quote.discount.as_ref().map(|info| DiscountInfoPayload {
                passenger_class: info.passenger_class,
                rate: info.rate,
                card_id: info.card_id.clone(),
                discount_type: info.discount_type,
                id_number: info.id_number.clone(),
            }),
            route: quote.distance.route.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_to_regular_with_map_service() {
        let request: FareQuoteRequest =
            serde_json::from_str(r#"{ "origin": [11.28, 125.06], "destination": [11.30, 125.08] }"#)
                .expect("request");
        assert_eq!(request.passenger_class, PassengerClass::Regular);
        assert!(request.use_map_service);
        assert!(request.discount_card_ref.is_none());
    }

    #[test]
    fn request_accepts_snake_case_fields() {
        let request: FareQuoteRequest = serde_json::from_str(
            r#"{
                "origin": [11.28, 125.06],
                "destination": [11.30, 125.08],
                "passenger_type": "SENIOR",
                "use_map_service": false,
                "discount_card_ref": "card-9"
            }"#,
        )
        .expect("request");
        assert_eq!(request.passenger_class, PassengerClass::Senior);
        assert!(!request.use_map_service);
        assert_eq!(request.discount_card_ref.as_deref(), Some("card-9"));
    }
}
