mod support;

use fare_core::contract::FareQuoteRequest;
use fare_core::discount::{NoDiscountCards, PassengerClass};
use fare_core::error::FareError;
use fare_core::routing::{DistanceMethod, MapServiceError};
use fare_core::test_helpers::{
    bacubac, basey_center, basiao, FailingProvider, FixedDistanceProvider, BACUBAC, BASEY_CENTER,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use support::cards::{card_store, date, pending_card, senior_card};
use support::orchestrators::{geometric_only, with_provider};

#[test]
fn forced_map_failure_falls_back_to_geometric() {
    let failures = [
        MapServiceError::Timeout { timeout_ms: 5_000 },
        MapServiceError::RequestDenied {
            status: "REQUEST_DENIED".into(),
            message: "bad key".into(),
        },
        MapServiceError::NoRoute("ZERO_RESULTS".into()),
        MapServiceError::HttpStatus {
            status: 503,
            body: String::new(),
        },
    ];
    for error in failures {
        let orchestrator = with_provider(FailingProvider::new(error.clone()));
        let quote = orchestrator
            .compute_fare(basey_center(), bacubac(), PassengerClass::Regular, true, None)
            .unwrap_or_else(|err| panic!("{error} surfaced as {err}"));
        assert_eq!(quote.method(), DistanceMethod::Geometric);
        assert!(quote.distance.kilometers > 0.0);
    }
}

#[test]
fn map_distance_is_used_when_provider_succeeds() {
    let orchestrator = with_provider(FixedDistanceProvider::new(5.0));
    let quote = orchestrator
        .compute_fare(basey_center(), basiao(), PassengerClass::Regular, true, None)
        .expect("quote");
    assert_eq!(quote.method(), DistanceMethod::MapService);
    assert_eq!(quote.fare.original_fare, dec!(21.00));
    assert_eq!(quote.distance.duration_secs, Some(600));
}

#[test]
fn map_route_a_few_metres_past_the_base_distance_is_billed() {
    let orchestrator = with_provider(FixedDistanceProvider::new(3.004));
    let quote = orchestrator
        .compute_fare(basey_center(), basiao(), PassengerClass::Regular, true, None)
        .expect("quote");
    assert_eq!(quote.method(), DistanceMethod::MapService);
    assert_eq!(quote.fare.breakdown.billed_additional_km, dec!(1));
    assert_eq!(quote.fare.original_fare, dec!(18.00));
}

#[test]
fn map_service_can_be_skipped_per_request() {
    let orchestrator = with_provider(FixedDistanceProvider::new(5.0));
    let quote = orchestrator
        .compute_fare(basey_center(), basiao(), PassengerClass::Regular, false, None)
        .expect("quote");
    assert_eq!(quote.method(), DistanceMethod::Geometric);
}

#[test]
fn negative_map_distance_falls_back() {
    let orchestrator = with_provider(FixedDistanceProvider::new(-2.0));
    let quote = orchestrator
        .compute_fare(basey_center(), bacubac(), PassengerClass::Regular, true, None)
        .expect("quote");
    assert_eq!(quote.method(), DistanceMethod::Geometric);
}

#[test]
fn geometric_fare_for_bacubac() {
    // ~2.74 km straight line, ~3.83 km by road factor
    let quote = geometric_only()
        .compute_fare(basey_center(), bacubac(), PassengerClass::Regular, true, None)
        .expect("quote");
    assert_eq!(quote.fare.breakdown.billed_additional_km, dec!(1.00));
    assert_eq!(quote.fare.original_fare, dec!(18.00));
}

#[test]
fn senior_without_card_gets_statutory_rate() {
    let quote = geometric_only()
        .compute_fare(basey_center(), bacubac(), PassengerClass::Senior, true, None)
        .expect("quote");
    let info = quote.discount.expect("discount info");
    assert_eq!(info.rate, dec!(0.20));
    assert!(info.card_id.is_none());
    // 18.00 * 0.20 = 3.60, nearest 0.50 is 3.50
    assert_eq!(quote.fare.discount_applied, dec!(3.50));
    assert_eq!(quote.fare.fare, dec!(14.50));
}

#[test]
fn regular_and_child_pay_full_fare() {
    for class in [PassengerClass::Regular, PassengerClass::Child] {
        let quote = geometric_only()
            .compute_fare(basey_center(), basiao(), class, true, Some(&senior_card()))
            .expect("quote");
        assert_eq!(quote.fare.discount_applied, Decimal::ZERO, "{class}");
        assert_eq!(quote.fare.fare, quote.fare.original_fare);
        assert!(quote.discount.is_none());
    }
}

#[test]
fn valid_card_is_attached_as_metadata() {
    let orchestrator = with_provider(FixedDistanceProvider::new(5.0));
    let quote = orchestrator
        .compute_fare_on(
            basey_center(),
            basiao(),
            PassengerClass::Senior,
            true,
            Some(&senior_card()),
            date(2026, 6, 1),
        )
        .expect("quote");
    let info = quote.discount.expect("discount info");
    assert_eq!(info.card_id.as_deref(), Some("card-senior"));
    assert_eq!(info.id_number.as_deref(), Some("SC-2026-0042"));
    assert_eq!(quote.fare.discount_applied, dec!(4.00));
}

#[test]
fn expired_or_pending_card_still_gets_rate_without_metadata() {
    let orchestrator = with_provider(FixedDistanceProvider::new(5.0));
    let cases = [
        (senior_card(), date(2027, 1, 1)),
        (pending_card(), date(2026, 6, 1)),
    ];
    for (card, today) in cases {
        let quote = orchestrator
            .compute_fare_on(
                basey_center(),
                basiao(),
                PassengerClass::Senior,
                true,
                Some(&card),
                today,
            )
            .expect("quote");
        let info = quote.discount.expect("discount info");
        assert_eq!(info.rate, dec!(0.20));
        assert!(info.card_id.is_none(), "card {} on {today}", card.id);
    }
}

#[test]
fn quote_rejects_out_of_range_coordinates() {
    let request = FareQuoteRequest {
        origin: [91.0, 125.0],
        destination: BACUBAC,
        passenger_class: PassengerClass::Regular,
        use_map_service: false,
        discount_card_ref: None,
    };
    let err = geometric_only().quote(&request, &NoDiscountCards).unwrap_err();
    assert!(matches!(err, FareError::InvalidCoordinate { .. }));
}

#[test]
fn quote_renders_wire_response() {
    let request: FareQuoteRequest = serde_json::from_value(serde_json::json!({
        "origin": BASEY_CENTER,
        "destination": BACUBAC,
        "passengerClass": "STUDENT",
        "discountCardRef": "does-not-exist"
    }))
    .expect("request");
    let orchestrator = with_provider(FixedDistanceProvider::new(5.0));
    let response = orchestrator.quote(&request, &card_store()).expect("response");
    assert_eq!(response.fare, dec!(17.00));

    let body = serde_json::to_value(&response).expect("serialize");
    assert_eq!(body["method"], "map_service");
    assert_eq!(body["originalFare"], 21.0);
    assert_eq!(body["discountApplied"], 4.0);
    assert_eq!(body["fare"], 17.0);
    assert_eq!(body["breakdown"]["billedAdditionalKm"], 2.0);
    assert_eq!(body["discountInfo"]["passengerClass"], "STUDENT");
    assert_eq!(body["discountInfo"]["rate"], 0.2);
    assert!(body["discountInfo"].get("cardId").is_none());
    assert!(body.get("route").is_none());
}
