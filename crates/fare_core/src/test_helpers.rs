//! Fixture coordinates and stub distance providers shared by tests, benches and
//! demos.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::geo::Coordinate;
use crate::routing::{DistanceMethod, DistanceProvider, DistanceResult, MapServiceError};

/// Basey town centre.
pub const BASEY_CENTER: [f64; 2] = [11.28026, 125.06909];
/// Barangay Basiao, west of the centre.
pub const BASIAO: [f64; 2] = [11.2768363, 125.0114879];
/// Barangay Bacubac, north-east of the centre.
pub const BACUBAC: [f64; 2] = [11.3012, 125.0823];

/// Convert a fixture pair into a [`Coordinate`].
///
/// # Panics
///
/// Panics if the pair is out of range (never for the constants above).
pub fn coordinate(pair: [f64; 2]) -> Coordinate {
    Coordinate::try_from(pair).expect("fixture coordinate should be in range")
}

pub fn basey_center() -> Coordinate {
    coordinate(BASEY_CENTER)
}

pub fn basiao() -> Coordinate {
    coordinate(BASIAO)
}

pub fn bacubac() -> Coordinate {
    coordinate(BACUBAC)
}

/// Provider that always fails with a clone of `error`.
#[derive(Debug, Clone)]
pub struct FailingProvider {
    pub error: MapServiceError,
}

impl FailingProvider {
    pub fn new(error: MapServiceError) -> Self {
        Self { error }
    }
}

impl DistanceProvider for FailingProvider {
    fn measure(&self, _: Coordinate, _: Coordinate) -> Result<DistanceResult, MapServiceError> {
        Err(self.error.clone())
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Provider reporting the same road distance for every pair, as a map service would.
#[derive(Debug, Clone, Copy)]
pub struct FixedDistanceProvider {
    pub kilometers: f64,
    pub duration_secs: u64,
}

impl FixedDistanceProvider {
    pub fn new(kilometers: f64) -> Self {
        Self {
            kilometers,
            duration_secs: 600,
        }
    }
}

impl DistanceProvider for FixedDistanceProvider {
    fn measure(&self, _: Coordinate, _: Coordinate) -> Result<DistanceResult, MapServiceError> {
        Ok(DistanceResult {
            kilometers: self.kilometers,
            duration_secs: Some(self.duration_secs),
            method: DistanceMethod::MapService,
            route: None,
        })
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

/// Wraps a provider and counts calls through a shared counter.
pub struct CountingProvider<P> {
    inner: P,
    calls: Arc<AtomicUsize>,
}

impl<P: DistanceProvider> CountingProvider<P> {
    /// Returns the provider and a handle to its call counter.
    pub fn new(inner: P) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                inner,
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

impl<P: DistanceProvider> DistanceProvider for CountingProvider<P> {
    fn measure(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<DistanceResult, MapServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.measure(origin, destination)
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
