use serde::{Deserialize, Serialize};

use super::super::text::{fold, is_no, is_yes, parse_number};
use super::AttributeStatus;

/// How an attribute cell turns into points. Bonuses and penalties are scaled
/// by the attribute weight; the price-vs-reference bands are not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoringRule {
    Boolean {
        bonus: i32,
        penalty: i32,
    },
    Numeric {
        bonus: i32,
        penalty: i32,
    },
    Threshold {
        steps: Vec<ThresholdStep>,
        good_from: i32,
        penalty: i32,
    },
    Range {
        bands: Vec<RangeBand>,
        penalty: i32,
    },
    Disposition {
        bonus: i32,
        penalty: i32,
    },
    PriceVsReference {
        bands: Vec<VarianceBand>,
    },
}

impl ScoringRule {
    pub fn penalty(&self) -> Option<i32> {
        match self {
            ScoringRule::Boolean { penalty, .. }
            | ScoringRule::Numeric { penalty, .. }
            | ScoringRule::Threshold { penalty, .. }
            | ScoringRule::Range { penalty, .. }
            | ScoringRule::Disposition { penalty, .. } => Some(*penalty),
            ScoringRule::PriceVsReference { .. } => None,
        }
    }

    /// Every point value the rule can award or deduct before weighting.
    pub fn point_values(&self) -> Vec<i32> {
        match self {
            ScoringRule::Boolean { bonus, penalty }
            | ScoringRule::Numeric { bonus, penalty }
            | ScoringRule::Disposition { bonus, penalty } => vec![*bonus, *penalty],
            ScoringRule::Threshold { steps, penalty, .. } => steps
                .iter()
                .map(|step| step.score)
                .chain([*penalty])
                .collect(),
            ScoringRule::Range { bands, penalty } => bands
                .iter()
                .map(|band| band.score)
                .chain([*penalty])
                .collect(),
            ScoringRule::PriceVsReference { bands } => {
                bands.iter().map(|band| band.score).collect()
            }
        }
    }

    pub fn is_price_reference(&self) -> bool {
        matches!(self, ScoringRule::PriceVsReference { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdStep {
    pub minimum: f64,
    pub score: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeBound {
    AtMost(f64),
    AtLeast(f64),
}

impl RangeBound {
    fn matches(self, value: f64) -> bool {
        match self {
            RangeBound::AtMost(limit) => value <= limit,
            RangeBound::AtLeast(limit) => value >= limit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeBand {
    pub bound: RangeBound,
    pub score: i32,
}

/// Where the asking price per area sits against the neighborhood benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketPosition {
    WellBelow,
    Below,
    AtMarket,
    Above,
    WellAbove,
}

impl MarketPosition {
    pub const fn label(self) -> &'static str {
        match self {
            MarketPosition::WellBelow => "well below market",
            MarketPosition::Below => "below market",
            MarketPosition::AtMarket => "at market",
            MarketPosition::Above => "above market",
            MarketPosition::WellAbove => "well above market",
        }
    }
}

/// Matches when the variance is at most `max_variance`; `None` catches the rest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VarianceBand {
    #[serde(default)]
    pub max_variance: Option<f64>,
    pub position: MarketPosition,
    pub score: i32,
}

pub(crate) fn evaluate(rule: &ScoringRule, raw: &str, weight: i32) -> (AttributeStatus, i32) {
    let unknown = |penalty: i32| (AttributeStatus::Unknown, -penalty * weight);

    match rule {
        ScoringRule::Boolean { bonus, penalty } => {
            if is_yes(raw) {
                (AttributeStatus::ConfirmedYes, bonus * weight)
            } else if is_no(raw) {
                (AttributeStatus::ConfirmedNo, 0)
            } else {
                unknown(*penalty)
            }
        }
        ScoringRule::Numeric { bonus, penalty } => match parse_number(raw) {
            Some(value) if value > 0.0 => (AttributeStatus::ConfirmedYes, bonus * weight),
            Some(value) if value == 0.0 => (AttributeStatus::ConfirmedNo, 0),
            _ if is_no(raw) => (AttributeStatus::ConfirmedNo, 0),
            _ => unknown(*penalty),
        },
        ScoringRule::Threshold {
            steps,
            good_from,
            penalty,
        } => match parse_number(raw) {
            Some(value) if value > 0.0 => steps
                .iter()
                .find(|step| value >= step.minimum)
                .map(|step| {
                    let status = if step.score >= *good_from {
                        AttributeStatus::ConfirmedYes
                    } else {
                        AttributeStatus::Ok
                    };
                    (status, step.score * weight)
                })
                .unwrap_or((AttributeStatus::ConfirmedNo, 0)),
            _ => unknown(*penalty),
        },
        ScoringRule::Range { bands, penalty } => match parse_quantity(raw) {
            Some(value) => bands
                .iter()
                .find(|band| band.bound.matches(value))
                .map(|band| {
                    let status = match band.score {
                        score if score > 0 => AttributeStatus::ConfirmedYes,
                        score if score < 0 => AttributeStatus::ConfirmedNo,
                        _ => AttributeStatus::Ok,
                    };
                    (status, band.score * weight)
                })
                .unwrap_or((AttributeStatus::Ok, 0)),
            None => unknown(*penalty),
        },
        ScoringRule::Disposition { bonus, penalty } => {
            let folded = fold(raw);
            if ["contrafrente", "interno", "lateral"]
                .iter()
                .any(|token| folded.contains(token))
            {
                (AttributeStatus::ConfirmedNo, 0)
            } else if folded.contains("frente") {
                (AttributeStatus::ConfirmedYes, bonus * weight)
            } else {
                unknown(*penalty)
            }
        }
        // Scored once per listing against the normalized variance.
        ScoringRule::PriceVsReference { .. } => (AttributeStatus::Disabled, 0),
    }
}

/// Range cells may spell out zero ("a estrenar" for brand-new buildings).
fn parse_quantity(raw: &str) -> Option<f64> {
    if fold(raw).contains("estrenar") {
        return Some(0.0);
    }
    parse_number(raw).filter(|value| *value >= 0.0)
}

pub(crate) fn score_variance(
    bands: &[VarianceBand],
    variance: f64,
) -> Option<(MarketPosition, i32)> {
    bands
        .iter()
        .find(|band| band.max_variance.map_or(true, |max| variance <= max))
        .map(|band| (band.position, band.score))
}
