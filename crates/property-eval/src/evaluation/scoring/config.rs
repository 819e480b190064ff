use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::super::domain::fields;
use super::rules::{
    MarketPosition, RangeBand, RangeBound, ScoringRule, ThresholdStep, VarianceBand,
};

pub const MAX_WEIGHT: u8 = 10;

/// Key of the global price-vs-reference entry in the standard profile.
pub const PRICE_REFERENCE_KEY: &str = "precio_vs_referencia";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeWeight {
    #[serde(deserialize_with = "clamped_weight")]
    pub weight: u8,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

/// Accepts any integer from a settings document and clamps it into
/// `0..=MAX_WEIGHT`.
fn clamped_weight<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(raw.clamp(0, i64::from(MAX_WEIGHT)) as u8)
}

impl AttributeWeight {
    pub const fn new(weight: u8) -> Self {
        Self {
            weight,
            enabled: true,
        }
    }
}

/// Per-attribute weights. Attributes without an entry are disabled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoringWeightConfig {
    weights: BTreeMap<String, AttributeWeight>,
}

impl ScoringWeightConfig {
    pub fn set(&mut self, key: impl Into<String>, weight: AttributeWeight) {
        self.weights.insert(key.into(), weight);
    }

    pub fn with(mut self, key: impl Into<String>, weight: u8) -> Self {
        self.set(key, AttributeWeight::new(weight));
        self
    }

    pub fn get(&self, key: &str) -> Option<AttributeWeight> {
        self.weights.get(key).copied()
    }

    /// Weight in effect, clamped to `0..=MAX_WEIGHT`; zero when disabled or absent.
    pub fn effective(&self, key: &str) -> u8 {
        match self.weights.get(key) {
            Some(entry) if entry.enabled => entry.weight.min(MAX_WEIGHT),
            _ => 0,
        }
    }

    pub(crate) fn clamp(&mut self) {
        for entry in self.weights.values_mut() {
            entry.weight = entry.weight.min(MAX_WEIGHT);
        }
    }
}

/// One scored attribute: the sheet column it reads and how it scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeRule {
    pub key: String,
    #[serde(default)]
    pub field: String,
    #[serde(flatten)]
    pub rule: ScoringRule,
}

impl AttributeRule {
    pub fn new(key: &str, field: &str, rule: ScoringRule) -> Self {
        Self {
            key: key.to_string(),
            field: field.to_string(),
            rule,
        }
    }

    /// Column to read; defaults to the attribute key.
    pub fn source_field(&self) -> &str {
        if self.field.is_empty() {
            &self.key
        } else {
            &self.field
        }
    }
}

/// Weights plus the ordered rule table the scorer walks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringProfile {
    pub weights: ScoringWeightConfig,
    pub rules: Vec<AttributeRule>,
}

impl Default for ScoringProfile {
    fn default() -> Self {
        Self::standard()
    }
}

impl ScoringProfile {
    pub fn standard() -> Self {
        let weights = ScoringWeightConfig::default()
            .with(fields::TERRACE, 6)
            .with(fields::BALCONY, 4)
            .with(fields::ELEVATOR, 5)
            .with(fields::LIGHT, 5)
            .with(fields::GARAGES, 3)
            .with(fields::ROOMS, 7)
            .with(fields::BATHROOMS, 5)
            .with("m2", 6)
            .with(fields::AGE, 4)
            .with(fields::MONTHLY_FEE, 5)
            .with(fields::DISPOSITION, 6)
            .with(PRICE_REFERENCE_KEY, 10);

        let rules = vec![
            AttributeRule::new(fields::TERRACE, fields::TERRACE, boolean(3, 1)),
            AttributeRule::new(fields::BALCONY, fields::BALCONY, boolean(2, 1)),
            AttributeRule::new(fields::ELEVATOR, fields::ELEVATOR, boolean(2, 1)),
            AttributeRule::new(fields::LIGHT, fields::LIGHT, boolean(3, 1)),
            AttributeRule::new(
                fields::GARAGES,
                fields::GARAGES,
                ScoringRule::Numeric {
                    bonus: 2,
                    penalty: 1,
                },
            ),
            AttributeRule::new(
                fields::ROOMS,
                fields::ROOMS,
                threshold(&[(4.0, 3), (3.0, 2), (2.0, 1)], 2, 2),
            ),
            AttributeRule::new(
                fields::BATHROOMS,
                fields::BATHROOMS,
                threshold(&[(2.0, 2), (1.0, 1)], 2, 1),
            ),
            AttributeRule::new(
                "m2",
                fields::DERIVED_AREA,
                threshold(&[(70.0, 3), (50.0, 2), (40.0, 1)], 2, 2),
            ),
            AttributeRule::new(
                fields::AGE,
                fields::AGE,
                range(
                    &[
                        (RangeBound::AtMost(10.0), 2),
                        (RangeBound::AtMost(40.0), 1),
                        (RangeBound::AtLeast(80.0), -2),
                    ],
                    1,
                ),
            ),
            AttributeRule::new(
                fields::MONTHLY_FEE,
                fields::MONTHLY_FEE,
                range(
                    &[
                        (RangeBound::AtLeast(250_000.0), -2),
                        (RangeBound::AtLeast(150_000.0), -1),
                        (RangeBound::AtMost(80_000.0), 1),
                    ],
                    1,
                ),
            ),
            AttributeRule::new(
                fields::DISPOSITION,
                fields::DISPOSITION,
                ScoringRule::Disposition {
                    bonus: 2,
                    penalty: 1,
                },
            ),
            AttributeRule::new(
                PRICE_REFERENCE_KEY,
                "",
                ScoringRule::PriceVsReference {
                    bands: standard_variance_bands(),
                },
            ),
        ];

        Self { weights, rules }
    }
}

pub fn standard_variance_bands() -> Vec<VarianceBand> {
    let band = |max_variance, position, score| VarianceBand {
        max_variance,
        position,
        score,
    };
    vec![
        band(Some(-0.10), MarketPosition::WellBelow, 15),
        band(Some(-0.03), MarketPosition::Below, 8),
        band(Some(0.03), MarketPosition::AtMarket, 0),
        band(Some(0.10), MarketPosition::Above, -8),
        band(None, MarketPosition::WellAbove, -15),
    ]
}

fn boolean(bonus: i32, penalty: i32) -> ScoringRule {
    ScoringRule::Boolean { bonus, penalty }
}

fn threshold(steps: &[(f64, i32)], good_from: i32, penalty: i32) -> ScoringRule {
    ScoringRule::Threshold {
        steps: steps
            .iter()
            .map(|&(minimum, score)| ThresholdStep { minimum, score })
            .collect(),
        good_from,
        penalty,
    }
}

fn range(bands: &[(RangeBound, i32)], penalty: i32) -> ScoringRule {
    ScoringRule::Range {
        bands: bands
            .iter()
            .map(|&(bound, score)| RangeBand { bound, score })
            .collect(),
        penalty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_weight_clamps_and_respects_toggle() {
        let mut weights = ScoringWeightConfig::default().with("terraza", 14);
        weights.set(
            "balcon",
            AttributeWeight {
                weight: 6,
                enabled: false,
            },
        );

        assert_eq!(weights.effective("terraza"), MAX_WEIGHT);
        assert_eq!(weights.effective("balcon"), 0);
        assert_eq!(weights.effective("ascensor"), 0);

        weights.clamp();
        assert_eq!(weights.get("terraza").map(|entry| entry.weight), Some(10));
    }

    #[test]
    fn out_of_range_weights_clamp_while_parsing() {
        let weights: ScoringWeightConfig = serde_json::from_str(
            r#"{"terraza":{"weight":-2},"balcon":{"weight":300},"ascensor":{"weight":7,"enabled":false}}"#,
        )
        .expect("weights parse");

        assert_eq!(weights.get("terraza").map(|entry| entry.weight), Some(0));
        assert_eq!(weights.get("balcon").map(|entry| entry.weight), Some(MAX_WEIGHT));
        assert_eq!(weights.effective("balcon"), MAX_WEIGHT);
        assert_eq!(weights.get("ascensor").map(|entry| entry.enabled), Some(false));
    }

    #[test]
    fn standard_profile_has_weight_for_every_rule() {
        let profile = ScoringProfile::standard();
        for rule in &profile.rules {
            assert!(
                profile.weights.get(&rule.key).is_some(),
                "missing weight for {}",
                rule.key
            );
        }
    }

    #[test]
    fn attribute_rule_round_trips_through_flattened_json() {
        let json = r#"{"key":"cocheras","kind":"numeric","bonus":2,"penalty":1}"#;
        let rule: AttributeRule = serde_json::from_str(json).expect("rule parses");

        assert_eq!(rule.source_field(), "cocheras");
        assert_eq!(
            rule.rule,
            ScoringRule::Numeric {
                bonus: 2,
                penalty: 1
            }
        );
    }
}
