//! Passenger classes, statutory discount resolution, and discount cards.
//!
//! The discount rate is keyed purely on [`PassengerClass`]. A discount card is
//! supplementary metadata: when a valid card is presented it is echoed in the
//! [`DiscountInfo`], but it never changes the rate.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Discount for seniors, persons with disability and students.
pub const STATUTORY_DISCOUNT_RATE: Decimal = dec!(0.20);

/// Rider category used to determine discount eligibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PassengerClass {
    #[default]
    Regular,
    Senior,
    Pwd,
    Student,
    Child,
}

impl PassengerClass {
    /// Classes entitled to the statutory discount.
    ///
    /// `Child` is a recognised class but currently gets no automatic discount.
    pub fn has_statutory_discount(self) -> bool {
        matches!(self, Self::Senior | Self::Pwd | Self::Student)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "REGULAR",
            Self::Senior => "SENIOR",
            Self::Pwd => "PWD",
            Self::Student => "STUDENT",
            Self::Child => "CHILD",
        }
    }
}

impl FromStr for PassengerClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "REGULAR" => Ok(Self::Regular),
            "SENIOR" => Ok(Self::Senior),
            "PWD" => Ok(Self::Pwd),
            "STUDENT" => Ok(Self::Student),
            "CHILD" => Ok(Self::Child),
            other => Err(format!(
                "unknown passenger class '{other}' (expected REGULAR, SENIOR, PWD, STUDENT or CHILD)"
            )),
        }
    }
}

impl std::fmt::Display for PassengerClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discount rates by policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscountConfig {
    /// Rate applied to classes with a statutory discount.
    pub statutory_rate: Decimal,
}

impl Default for DiscountConfig {
    fn default() -> Self {
        Self {
            statutory_rate: STATUTORY_DISCOUNT_RATE,
        }
    }
}

impl DiscountConfig {
    /// Rate for `class`, or `None` when the class pays the full fare.
    pub fn rate_for(&self, class: PassengerClass) -> Option<Decimal> {
        class.has_statutory_discount().then_some(self.statutory_rate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountType {
    SeniorCitizen,
    Pwd,
    Student,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// A discount card record owned by the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountCard {
    pub id: String,
    pub discount_type: DiscountType,
    pub id_number: String,
    #[serde(default)]
    pub verification_status: VerificationStatus,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub valid_from: NaiveDate,
    pub valid_until: NaiveDate,
}

fn default_true() -> bool {
    true
}

impl DiscountCard {
    /// Active, approved, and `today` within the inclusive validity window.
    pub fn is_valid(&self, today: NaiveDate) -> bool {
        self.is_active
            && self.verification_status == VerificationStatus::Approved
            && self.valid_from <= today
            && today <= self.valid_until
    }
}

/// Read-only lookup of discount cards by opaque reference.
pub trait DiscountCardSource: Send + Sync {
    fn find_card(&self, card_ref: &str) -> Option<DiscountCard>;
}

/// No cards at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDiscountCards;

impl DiscountCardSource for NoDiscountCards {
    fn find_card(&self, _card_ref: &str) -> Option<DiscountCard> {
        None
    }
}

/// Cards held in memory, keyed by card id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDiscountCards {
    cards: HashMap<String, DiscountCard>,
}

impl InMemoryDiscountCards {
    pub fn new(cards: impl IntoIterator<Item = DiscountCard>) -> Self {
        Self {
            cards: cards.into_iter().map(|card| (card.id.clone(), card)).collect(),
        }
    }

    /// Parse a JSON array of cards.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let cards: Vec<DiscountCard> = serde_json::from_str(json)?;
        Ok(Self::new(cards))
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl DiscountCardSource for InMemoryDiscountCards {
    fn find_card(&self, card_ref: &str) -> Option<DiscountCard> {
        self.cards.get(card_ref).cloned()
    }
}

/// Resolved discount metadata attached to a fare quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountInfo {
    pub passenger_class: PassengerClass,
    pub rate: Decimal,
    pub card_id: Option<String>,
    pub discount_type: Option<DiscountType>,
    pub id_number: Option<String>,
}

/// Resolve the discount for `class`.
///
/// Returns `None` for classes without a discount; in that case any card is
/// ignored. Invalid cards are never attached.
pub fn resolve_discount(
    config: &DiscountConfig,
    class: PassengerClass,
    card: Option<&DiscountCard>,
    today: NaiveDate,
) -> Option<DiscountInfo> {
    let rate = config.rate_for(class)?;
    let card = card.filter(|card| card.is_valid(today));
    Some(DiscountInfo {
        passenger_class: class,
        rate,
        card_id: card.map(|card| card.id.clone()),
        discount_type: card.map(|card| card.discount_type),
        id_number: card.map(|card| card.id_number.clone()),
    })
}
