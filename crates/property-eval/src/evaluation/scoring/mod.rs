mod config;
mod rules;

pub use config::{
    standard_variance_bands, AttributeRule, AttributeWeight, ScoringProfile, ScoringWeightConfig,
    MAX_WEIGHT, PRICE_REFERENCE_KEY,
};
pub use rules::{
    MarketPosition, RangeBand, RangeBound, ScoringRule, ThresholdStep, VarianceBand,
};

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::domain::{fields, NormalizedProperty, RawListingRecord};

/// Outcome of reading one attribute. `Unknown` is missing data and is always
/// penalized; `ConfirmedNo` is verified absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeStatus {
    ConfirmedYes,
    ConfirmedNo,
    Ok,
    Unknown,
    Disabled,
}

impl AttributeStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AttributeStatus::ConfirmedYes => "yes",
            AttributeStatus::ConfirmedNo => "no",
            AttributeStatus::Ok => "ok",
            AttributeStatus::Unknown => "missing",
            AttributeStatus::Disabled => "disabled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeScoreResult {
    pub key: String,
    pub status: AttributeStatus,
    pub contribution: i32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceReferenceScore {
    pub variance: f64,
    pub position: MarketPosition,
    pub contribution: i32,
}

/// Attribute contributions for one listing, before the tier base score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub attributes: Vec<AttributeScoreResult>,
    pub price_reference: Option<PriceReferenceScore>,
    pub missing_count: usize,
}

impl ScoreCard {
    pub fn attribute_total(&self) -> i32 {
        self.attributes
            .iter()
            .map(|result| result.contribution)
            .sum()
    }

    pub fn price_reference_total(&self) -> i32 {
        self.price_reference
            .map(|score| score.contribution)
            .unwrap_or(0)
    }

    pub fn missing_keys(&self) -> Vec<String> {
        self.attributes
            .iter()
            .filter(|result| result.status == AttributeStatus::Unknown)
            .map(|result| result.key.clone())
            .collect()
    }
}

pub(crate) fn score_attributes(
    raw: &RawListingRecord,
    property: &NormalizedProperty,
    profile: &ScoringProfile,
) -> ScoreCard {
    let mut attributes = Vec::with_capacity(profile.rules.len());
    let mut price_reference = None;
    let mut price_reference_seen = false;

    for attribute in &profile.rules {
        let weight = profile.weights.effective(&attribute.key);

        if let ScoringRule::PriceVsReference { bands } = &attribute.rule {
            // Only the first price-vs-reference entry counts.
            if price_reference_seen {
                continue;
            }
            price_reference_seen = true;
            if weight > 0 {
                price_reference = property.variance_vs_reference.and_then(|variance| {
                    rules::score_variance(bands, variance).map(|(position, contribution)| {
                        PriceReferenceScore {
                            variance,
                            position,
                            contribution,
                        }
                    })
                });
            }
            continue;
        }

        let value = resolve_field(raw, property, attribute.source_field());
        let (status, contribution) = if weight == 0 {
            (AttributeStatus::Disabled, 0)
        } else {
            rules::evaluate(&attribute.rule, &value, i32::from(weight))
        };

        attributes.push(AttributeScoreResult {
            key: attribute.key.clone(),
            status,
            contribution,
            value: value.into_owned(),
        });
    }

    let missing_count = attributes
        .iter()
        .filter(|result| result.status == AttributeStatus::Unknown)
        .count();

    ScoreCard {
        attributes,
        price_reference,
        missing_count,
    }
}

fn resolve_field<'a>(
    raw: &'a RawListingRecord,
    property: &NormalizedProperty,
    field: &str,
) -> Cow<'a, str> {
    if field == fields::DERIVED_AREA {
        if property.area > 0.0 {
            Cow::Owned(property.area.to_string())
        } else {
            Cow::Borrowed("")
        }
    } else {
        Cow::Borrowed(raw.get(field))
    }
}
