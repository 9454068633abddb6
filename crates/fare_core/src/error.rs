use thiserror::Error;

/// Errors that reject a fare computation.
///
/// Map-service failures never appear here; they end in the geometric fallback
/// and only show up in the reported distance method.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FareError {
    #[error("invalid coordinate ({lat}, {lng}): latitude must be within [-90, 90] and longitude within [-180, 180]")]
    InvalidCoordinate { lat: f64, lng: f64 },

    #[error("invalid distance {0} km: must be finite and non-negative")]
    InvalidDistance(f64),

    #[error("invalid discount rate {0}: must be within [0, 1]")]
    InvalidDiscountRate(rust_decimal::Decimal),

    /// Decimal overflow while pricing. Unreachable for realistic tariffs.
    #[error("arithmetic precision lost while computing {0}")]
    ArithmeticPrecision(&'static str),
}
