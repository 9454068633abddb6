use chrono::NaiveDate;
use fare_core::discount::{DiscountCard, DiscountType, InMemoryDiscountCards, VerificationStatus};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Approved senior-citizen card valid through all of 2026.
pub fn senior_card() -> DiscountCard {
    DiscountCard {
        id: "card-senior".to_string(),
        discount_type: DiscountType::SeniorCitizen,
        id_number: "SC-2026-0042".to_string(),
        verification_status: VerificationStatus::Approved,
        is_active: true,
        valid_from: date(2026, 1, 1),
        valid_until: date(2026, 12, 31),
    }
}

/// Card still awaiting verification.
pub fn pending_card() -> DiscountCard {
    DiscountCard {
        id: "card-pending".to_string(),
        verification_status: VerificationStatus::Pending,
        ..senior_card()
    }
}

pub fn card_store() -> InMemoryDiscountCards {
    InMemoryDiscountCards::new([senior_card(), pending_card()])
}
