use fare_core::discount::DiscountConfig;
use fare_core::orchestrator::RouteFareOrchestrator;
use fare_core::pricing::FareEngine;
use fare_core::routing::{DistanceProvider, GeometricConfig, GeometricEstimator};

/// Default tariff and discounts, no map service.
pub fn geometric_only() -> RouteFareOrchestrator {
    RouteFareOrchestrator::new(
        FareEngine::default(),
        GeometricEstimator::new(GeometricConfig::default()),
        DiscountConfig::default(),
    )
}

/// Default tariff and discounts backed by `provider`.
pub fn with_provider(provider: impl DistanceProvider + 'static) -> RouteFareOrchestrator {
    geometric_only().with_map_service(Box::new(provider))
}
