//! Route-to-fare pipeline: distance provider with fallback, discount
//! resolution, and fare calculation.
//!
//! The only caller-visible failures are invalid coordinates (rejected when the
//! request is parsed) and decimal overflow. Map-service failures of any kind
//! end in the geometric estimate and show up only as
//! [`DistanceMethod::Geometric`].

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use crate::config::FareGuideConfig;
use crate::contract::{FareQuoteRequest, FareQuoteResponse};
use crate::discount::{
    resolve_discount, DiscountCard, DiscountCardSource, DiscountConfig, DiscountInfo,
    PassengerClass,
};
use crate::error::FareError;
use crate::geo::Coordinate;
use crate::pricing::{FareEngine, FareResult};
use crate::routing::{
    build_map_service_provider, DistanceMethod, DistanceProvider, DistanceResult, FailureClass,
    GeometricEstimator, MapServiceError,
};

/// Everything computed for one trip.
#[derive(Debug, Clone, PartialEq)]
pub struct FareQuote {
    pub distance: DistanceResult,
    pub fare: FareResult,
    pub discount: Option<DiscountInfo>,
}

impl FareQuote {
    pub fn method(&self) -> DistanceMethod {
        self.distance.method
    }
}

pub struct RouteFareOrchestrator {
    /// `Err` keeps the reason the provider could not be built.
    map_service: Result<Box<dyn DistanceProvider>, MapServiceError>,
    geometric: GeometricEstimator,
    engine: FareEngine,
    discounts: DiscountConfig,
}

impl RouteFareOrchestrator {
    /// Orchestrator without a map-service provider.
    pub fn new(engine: FareEngine, geometric: GeometricEstimator, discounts: DiscountConfig) -> Self {
        Self {
            map_service: Err(MapServiceError::NotConfigured("no map service provider")),
            geometric,
            engine,
            discounts,
        }
    }

    pub fn with_map_service(mut self, provider: Box<dyn DistanceProvider>) -> Self {
        self.map_service = Ok(provider);
        self
    }

    /// Build the full pipeline. An unusable map service is logged once here and
    /// every request then falls back to the geometric estimate.
    pub fn from_config(config: &FareGuideConfig) -> Self {
        let map_service = build_map_service_provider(&config.map_service, &config.cache);
        match &map_service {
            Ok(provider) => info!(provider = provider.name(), "map service enabled"),
            Err(err) => warn!(error = %err, "map service unavailable; fares will use geometric estimates"),
        }
        Self {
            map_service,
            geometric: GeometricEstimator::new(config.geometric),
            engine: FareEngine::new(config.tariff),
            discounts: config.discounts,
        }
    }

    pub fn engine(&self) -> &FareEngine {
        &self.engine
    }

    pub fn has_map_service(&self) -> bool {
        self.map_service.is_ok()
    }

    /// Compute the fare for a trip, using today's date for card validity.
    pub fn compute_fare(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        passenger_class: PassengerClass,
        use_map_service: bool,
        card: Option<&DiscountCard>,
    ) -> Result<FareQuote, FareError> {
        self.compute_fare_on(
            origin,
            destination,
            passenger_class,
            use_map_service,
            card,
            Local::now().date_naive(),
        )
    }

    /// Same as [`compute_fare`](Self::compute_fare) with an explicit date.
    pub fn compute_fare_on(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        passenger_class: PassengerClass,
        use_map_service: bool,
        card: Option<&DiscountCard>,
        today: NaiveDate,
    ) -> Result<FareQuote, FareError> {
        let distance = self.measure_distance(origin, destination, use_map_service);
        let discount = resolve_discount(&self.discounts, passenger_class, card, today);
        let fare = self
            .engine
            .calculate_km(distance.kilometers, discount.as_ref().map(|info| info.rate))?;

        info!(
            method = distance.method.as_str(),
            distance_km = distance.kilometers,
            passenger_class = passenger_class.as_str(),
            fare = %fare.fare,
            "fare computed"
        );

        Ok(FareQuote {
            distance,
            fare,
            discount,
        })
    }

    /// Validate a wire request, resolve its card reference, and render the response.
    pub fn quote(
        &self,
        request: &FareQuoteRequest,
        cards: &dyn DiscountCardSource,
    ) -> Result<FareQuoteResponse, FareError> {
        let origin = Coordinate::try_from(request.origin)?;
        let destination = Coordinate::try_from(request.destination)?;

        let card = request.discount_card_ref.as_deref().and_then(|card_ref| {
            let card = cards.find_card(card_ref);
            if card.is_none() {
                debug!(card_ref, "discount card reference not found");
            }
            card
        });

        let quote = self.compute_fare(
            origin,
            destination,
            request.passenger_class,
            request.use_map_service,
            card.as_ref(),
        )?;
        Ok(FareQuoteResponse::from(&quote))
    }

    fn measure_distance(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        use_map_service: bool,
    ) -> DistanceResult {
        if use_map_service {
            let attempt = match &self.map_service {
                Ok(provider) => provider.measure(origin, destination).and_then(check_distance),
                Err(err) => Err(err.clone()),
            };
            match attempt {
                Ok(result) => return result,
                Err(err) => log_fallback(&err),
            }
        }
        self.geometric.distance(origin, destination)
    }
}

fn check_distance(result: DistanceResult) -> Result<DistanceResult, MapServiceError> {
    if result.kilometers.is_finite() && result.kilometers >= 0.0 {
        Ok(result)
    } else {
        Err(MapServiceError::Decode(format!(
            "provider reported distance {} km",
            result.kilometers
        )))
    }
}

fn log_fallback(err: &MapServiceError) {
    match err.class() {
        FailureClass::Configuration => {
            warn!(error = %err, "map service misconfigured; using geometric estimate")
        }
        FailureClass::Runtime => {
            info!(error = %err, transient = err.is_transient(), "map service failed; using geometric estimate")
        }
    }
}
