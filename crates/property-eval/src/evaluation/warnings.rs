use serde::{Deserialize, Serialize};

use super::domain::{fields, NormalizedProperty, RawListingRecord};
use super::text::{is_yes, parse_number};

pub const SUSPICIOUS_LOW_PRICE: f64 = 30_000.0;
pub const SUSPICIOUS_HIGH_PRICE: f64 = 500_000.0;
const AREA_TOLERANCE: f64 = 2.0;

/// Data-quality flags raised while evaluating a listing. They never change
/// the score; they tell the reviewer which cells to double-check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListingWarning {
    PriceTooLow { price: f64 },
    PriceTooHigh { price: f64 },
    CoveredExceedsTotal { covered: f64, total: f64 },
    AreasDoNotAddUp { covered: f64, uncovered: f64, total: f64 },
    MissingNeighborhood,
    MissingArea,
    OutdoorSpaceWithoutUncoveredArea { features: Vec<String> },
}

impl ListingWarning {
    pub fn summary(&self) -> String {
        match self {
            ListingWarning::PriceTooLow { price } => format!("price {price:.0} looks too low"),
            ListingWarning::PriceTooHigh { price } => format!("price {price:.0} looks too high"),
            ListingWarning::CoveredExceedsTotal { covered, total } => {
                format!("covered area {covered} exceeds total area {total}")
            }
            ListingWarning::AreasDoNotAddUp {
                covered,
                uncovered,
                total,
            } => format!("covered {covered} + uncovered {uncovered} does not match total {total}"),
            ListingWarning::MissingNeighborhood => "missing neighborhood".to_string(),
            ListingWarning::MissingArea => "missing area".to_string(),
            ListingWarning::OutdoorSpaceWithoutUncoveredArea { features } => format!(
                "has {} but no uncovered area",
                features.join(" + ")
            ),
        }
    }
}

pub(crate) fn inspect(raw: &RawListingRecord, property: &NormalizedProperty) -> Vec<ListingWarning> {
    let mut warnings = Vec::new();
    let price = property.price;

    if price > 0.0 && price < SUSPICIOUS_LOW_PRICE {
        warnings.push(ListingWarning::PriceTooLow { price });
    } else if price > SUSPICIOUS_HIGH_PRICE {
        warnings.push(ListingWarning::PriceTooHigh { price });
    }

    // Checked on the cells as listed, before any area completion.
    let covered = raw_area(raw, fields::COVERED_AREA);
    let total = raw_area(raw, fields::TOTAL_AREA);
    let uncovered = raw_uncovered(raw);
    if covered > 0.0 && total > 0.0 {
        if covered > total {
            warnings.push(ListingWarning::CoveredExceedsTotal { covered, total });
        } else if uncovered > 0.0 && (covered + uncovered - total).abs() > AREA_TOLERANCE {
            warnings.push(ListingWarning::AreasDoNotAddUp {
                covered,
                uncovered,
                total,
            });
        }
    }

    if property.neighborhood.is_empty() {
        warnings.push(ListingWarning::MissingNeighborhood);
    }
    if property.area <= 0.0 {
        warnings.push(ListingWarning::MissingArea);
    }

    let features: Vec<String> = [(fields::BALCONY, "balcony"), (fields::TERRACE, "terrace")]
        .iter()
        .filter(|(field, _)| is_yes(raw.get(field)))
        .map(|(_, label)| label.to_string())
        .collect();
    if !features.is_empty() && property.uncovered_area <= 0.0 {
        warnings.push(ListingWarning::OutdoorSpaceWithoutUncoveredArea { features });
    }

    warnings
}

fn raw_area(raw: &RawListingRecord, field: &str) -> f64 {
    parse_number(raw.get(field))
        .filter(|value| *value > 0.0)
        .unwrap_or(0.0)
}

fn raw_uncovered(raw: &RawListingRecord) -> f64 {
    parse_number(
        raw.first_present(&[fields::UNCOVERED_AREA, fields::UNCOVERED_AREA_LEGACY]),
    )
    .filter(|value| *value > 0.0)
    .unwrap_or(0.0)
}
