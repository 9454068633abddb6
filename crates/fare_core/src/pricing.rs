//! Fare calculation under the municipal tariff.
//!
//! Defaults follow Municipal Ordinance 105, Series of 2023:
//!
//! - **Base fare** ₱15.00 covers the first 3.00 km.
//! - **Additional distance** is rounded *up* to the next whole kilometre and
//!   billed at ₱3.00 per kilometre.
//! - **Rounding**: the subtotal and any discount are rounded half-up to the
//!   nearest ₱0.50.
//!
//! All money is `rust_decimal::Decimal`; floats only appear at the wire boundary.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::FareError;

/// Base fare in pesos.
pub const BASE_FARE: Decimal = dec!(15.00);

/// Distance covered by the base fare.
pub const BASE_DISTANCE_KM: Decimal = dec!(3.00);

/// Rate per started kilometre beyond the base distance.
pub const ADDITIONAL_RATE_PER_KM: Decimal = dec!(3.00);

/// Fares and discounts are rounded to multiples of this amount.
pub const ROUNDING_INCREMENT: Decimal = dec!(0.50);

/// Monetary and distance values are reported with this many decimal places.
const REPORTED_DECIMALS: u32 = 2;

/// Tariff constants injected into [`FareEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TariffConfig {
    pub base_fare: Decimal,
    pub base_distance_km: Decimal,
    pub additional_rate_per_km: Decimal,
    /// Zero or negative disables rounding.
    pub rounding_increment: Decimal,
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            base_fare: BASE_FARE,
            base_distance_km: BASE_DISTANCE_KM,
            additional_rate_per_km: ADDITIONAL_RATE_PER_KM,
            rounding_increment: ROUNDING_INCREMENT,
        }
    }
}

/// How the original fare was derived from the distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FareBreakdown {
    pub base_fare: Decimal,
    pub base_distance_km: Decimal,
    /// Distance beyond the base distance, before rounding up.
    pub additional_distance_km: Decimal,
    /// Whole kilometres actually billed (`ceil(additional_distance_km)`).
    pub billed_additional_km: Decimal,
    pub additional_fare: Decimal,
    /// Trip distance as priced, rounded up to 0.01 km.
    pub distance_km: Decimal,
}

/// Final fare with the discount ledger.
///
/// Invariant: `fare == original_fare - discount_applied`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FareResult {
    pub fare: Decimal,
    pub original_fare: Decimal,
    pub discount_applied: Decimal,
    pub breakdown: FareBreakdown,
}

/// Round `amount` half-up (ties away from zero) to a multiple of `increment`.
///
/// Returns `amount` unchanged when `increment` is not positive and `None` on
/// decimal overflow.
pub fn round_half_up_to(amount: Decimal, increment: Decimal) -> Option<Decimal> {
    if increment <= Decimal::ZERO {
        return Some(amount);
    }
    let steps = amount
        .checked_div(increment)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    steps.checked_mul(increment)
}

/// Quantize to the reported precision with a fixed scale (`21` → `21.00`).
fn reported(value: Decimal) -> Decimal {
    let mut value = value.round_dp_with_strategy(REPORTED_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
    value.rescale(REPORTED_DECIMALS);
    value
}

/// Round a trip distance *up* to the reported precision, so any partial
/// distance beyond a kilometre boundary is still billed.
fn billed_distance(value: Decimal) -> Decimal {
    let mut value = value.round_dp_with_strategy(REPORTED_DECIMALS, RoundingStrategy::ToPositiveInfinity);
    value.rescale(REPORTED_DECIMALS);
    value
}

/// Pure fare calculator over an immutable tariff.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FareEngine {
    tariff: TariffConfig,
}

impl FareEngine {
    pub fn new(tariff: TariffConfig) -> Self {
        Self { tariff }
    }

    pub fn tariff(&self) -> &TariffConfig {
        &self.tariff
    }

    /// Price a distance given in floating-point kilometres, as reported by
    /// distance providers.
    ///
    /// The float is converted through its shortest decimal representation, so
    /// `3.2_f64` is priced as exactly `3.2`.
    pub fn calculate_km(
        &self,
        distance_km: f64,
        discount_rate: Option<Decimal>,
    ) -> Result<FareResult, FareError> {
        if !distance_km.is_finite() || distance_km < 0.0 {
            return Err(FareError::InvalidDistance(distance_km));
        }
        let distance = Decimal::from_str(&distance_km.to_string())
            .map_err(|_| FareError::ArithmeticPrecision("distance conversion"))?;
        self.calculate(distance, discount_rate)
    }

    /// Price `distance_km`, applying `discount_rate` when given.
    ///
    /// A zero rate behaves like no discount.
    pub fn calculate(
        &self,
        distance_km: Decimal,
        discount_rate: Option<Decimal>,
    ) -> Result<FareResult, FareError> {
        if distance_km < Decimal::ZERO {
            return Err(FareError::InvalidDistance(
                rust_decimal::prelude::ToPrimitive::to_f64(&distance_km).unwrap_or(f64::NAN),
            ));
        }
        if let Some(rate) = discount_rate {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(FareError::InvalidDiscountRate(rate));
            }
        }

        let tariff = &self.tariff;
        let distance = billed_distance(distance_km);

        let (additional_distance, billed_km, additional_fare) = if distance <= tariff.base_distance_km {
            (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
        } else {
            let additional = distance - tariff.base_distance_km;
            let billed = additional.ceil();
            let fare = billed
                .checked_mul(tariff.additional_rate_per_km)
                .ok_or(FareError::ArithmeticPrecision("additional fare"))?;
            (additional, billed, fare)
        };

        let subtotal = tariff
            .base_fare
            .checked_add(additional_fare)
            .ok_or(FareError::ArithmeticPrecision("fare subtotal"))?;
        let original_fare = round_half_up_to(subtotal, tariff.rounding_increment)
            .ok_or(FareError::ArithmeticPrecision("fare rounding"))?;

        let discount_applied = match discount_rate {
            Some(rate) if !rate.is_zero() => {
                let raw = original_fare
                    .checked_mul(rate)
                    .ok_or(FareError::ArithmeticPrecision("discount"))?;
                round_half_up_to(raw, tariff.rounding_increment)
                    .ok_or(FareError::ArithmeticPrecision("discount rounding"))?
            }
            _ => Decimal::ZERO,
        };
        let fare = original_fare
            .checked_sub(discount_applied)
            .ok_or(FareError::ArithmeticPrecision("discounted fare"))?;

        Ok(FareResult {
            fare: reported(fare),
            original_fare: reported(original_fare),
            discount_applied: reported(discount_applied),
            breakdown: FareBreakdown {
                base_fare: reported(tariff.base_fare),
                base_distance_km: reported(tariff.base_distance_km),
                additional_distance_km: reported(additional_distance),
                billed_additional_km: reported(billed_km),
                additional_fare: reported(additional_fare),
                distance_km: distance,
            },
        })
    }
}
