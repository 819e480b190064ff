use chrono::NaiveDate;

use crate::evaluation::domain::fields;
use crate::evaluation::{
    EvaluationEngine, EvaluationSettings, RawListingRecord, ReferencePriceTable,
};

pub(super) const VILLA_URQUIZA: &str = "Villa Urquiza";
pub(super) const PALERMO: &str = "Palermo";

pub(super) fn references() -> ReferencePriceTable {
    ReferencePriceTable::new()
        .with(VILLA_URQUIZA, 1750.0)
        .with(PALERMO, 2600.0)
}

pub(super) fn settings() -> EvaluationSettings {
    EvaluationSettings {
        references: references(),
        ..EvaluationSettings::standard()
    }
}

pub(super) fn engine() -> EvaluationEngine {
    EvaluationEngine::new(settings()).expect("standard settings are valid")
}

pub(super) fn evaluation_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 31).expect("valid date")
}

/// Credit-eligible, within budget at the standard fee schedule, every
/// attribute filled in.
pub(super) fn strong_listing() -> RawListingRecord {
    RawListingRecord::new()
        .with(fields::LINK, "https://listings.example/villa-urquiza-3-amb")
        .with(fields::ACTIVE, "si")
        .with(fields::ADDRESS, "Bauness 2100")
        .with(fields::NEIGHBORHOOD, VILLA_URQUIZA)
        .with(fields::PRICE, "USD 94.000")
        .with(fields::COVERED_AREA, "70")
        .with(fields::TOTAL_AREA, "76")
        .with(fields::CREDIT_ELIGIBLE, "Sí")
        .with(fields::AGENCY, "Inmobiliaria Norte")
        .with(fields::PUBLISHED_ON, "2025-03-01")
        .with(fields::TERRACE, "si")
        .with(fields::BALCONY, "si")
        .with(fields::ELEVATOR, "si")
        .with(fields::LIGHT, "si")
        .with(fields::GARAGES, "1")
        .with(fields::ROOMS, "3")
        .with(fields::BATHROOMS, "1")
        .with(fields::AGE, "15")
        .with(fields::MONTHLY_FEE, "90000")
        .with(fields::DISPOSITION, "Frente")
}

/// Credit-eligible but beyond the available budget.
pub(super) fn over_budget_listing() -> RawListingRecord {
    strong_listing()
        .with(fields::LINK, "https://listings.example/palermo-3-amb")
        .with(fields::NEIGHBORHOOD, PALERMO)
        .with(fields::PRICE, "130000")
}

/// Linked and active, credit eligibility not yet confirmed.
pub(super) fn unconfirmed_credit_listing() -> RawListingRecord {
    strong_listing()
        .with(fields::LINK, "https://listings.example/villa-urquiza-2-amb")
        .with(fields::CREDIT_ELIGIBLE, "")
}

/// A row copied from a listing card with only the price filled in.
pub(super) fn sparse_listing() -> RawListingRecord {
    RawListingRecord::new().with(fields::PRICE, "88000")
}
