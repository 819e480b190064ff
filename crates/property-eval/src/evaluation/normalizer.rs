use chrono::NaiveDate;

use super::affordability::round_half_up;
use super::domain::{
    fields, CreditEligibility, NormalizedProperty, RawListingRecord, ReferencePriceTable,
};
use super::text::{fold, is_no, is_yes, parse_number};

/// Agency column values meaning the seller lists directly.
const DIRECT_OWNER_TOKENS: &[&str] = &["dueno", "dueno directo", "directo", "particular"];

pub(crate) fn normalize(
    raw: &RawListingRecord,
    references: &ReferencePriceTable,
    as_of: Option<NaiveDate>,
) -> NormalizedProperty {
    let price = non_negative(raw.get(fields::PRICE));
    let areas = complete_areas(
        non_negative(raw.get(fields::COVERED_AREA)),
        non_negative(raw.get(fields::TOTAL_AREA)),
        non_negative(raw.first_present(&[
            fields::UNCOVERED_AREA,
            fields::UNCOVERED_AREA_LEGACY,
        ])),
    );
    let area = if areas.covered > 0.0 {
        areas.covered
    } else {
        areas.total
    };

    let price_per_area = if area > 0.0 {
        round_half_up(price / area)
    } else {
        0.0
    };

    let neighborhood = raw.get(fields::NEIGHBORHOOD).to_string();
    let reference_price = references.lookup(&neighborhood);
    let variance_vs_reference = match reference_price {
        Some(reference) if price_per_area > 0.0 && reference > 0.0 => {
            Some((price_per_area - reference) / reference)
        }
        _ => None,
    };

    let link = raw.get(fields::LINK).to_string();

    NormalizedProperty {
        address: raw.get(fields::ADDRESS).to_string(),
        has_link: link.starts_with("http"),
        link,
        neighborhood,
        is_active: !is_no(raw.get(fields::ACTIVE)),
        credit: credit_eligibility(raw.get(fields::CREDIT_ELIGIBLE)),
        has_agency_fee: has_agency_fee(raw.get(fields::AGENCY)),
        price,
        covered_area: areas.covered,
        total_area: areas.total,
        uncovered_area: areas.uncovered,
        area,
        price_per_area,
        reference_price,
        variance_vs_reference,
        days_listed: as_of.and_then(|today| days_listed(raw.get(fields::PUBLISHED_ON), today)),
    }
}

fn non_negative(value: &str) -> f64 {
    parse_number(value)
        .filter(|number| *number > 0.0)
        .unwrap_or(0.0)
}

pub(crate) fn credit_eligibility(value: &str) -> CreditEligibility {
    if is_yes(value) {
        CreditEligibility::Yes
    } else if is_no(value) {
        CreditEligibility::No
    } else {
        CreditEligibility::Unknown
    }
}

/// Agency fees are assumed unless the listing is explicitly owner-direct.
fn has_agency_fee(value: &str) -> bool {
    let folded = fold(value);
    !(is_no(&folded) || DIRECT_OWNER_TOKENS.contains(&folded.as_str()))
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Areas {
    covered: f64,
    total: f64,
    uncovered: f64,
}

/// Fills one missing area from the other two (`total = covered + uncovered`).
fn complete_areas(covered: f64, total: f64, uncovered: f64) -> Areas {
    let mut areas = Areas {
        covered,
        total,
        uncovered,
    };

    if total > 0.0 && covered > 0.0 && uncovered == 0.0 {
        let derived = total - covered;
        if derived >= 0.0 {
            areas.uncovered = derived;
        }
    } else if total > 0.0 && uncovered > 0.0 && covered == 0.0 {
        let derived = total - uncovered;
        if derived > 0.0 {
            areas.covered = derived;
        }
    } else if covered > 0.0 && uncovered > 0.0 && total == 0.0 {
        areas.total = covered + uncovered;
    }

    areas
}

fn days_listed(value: &str, today: NaiveDate) -> Option<i64> {
    let published = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%d/%m/%Y"))
        .ok()?;
    let days = (today - published).num_days();
    (days >= 0).then_some(days)
}
