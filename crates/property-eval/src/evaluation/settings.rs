use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::affordability::FeeSchedule;
use super::domain::ReferencePriceTable;
use super::scoring::{ScoringProfile, ScoringRule};
use super::tier::ConditionConfig;

pub const STANDARD_FX_RATE: f64 = 1450.0;

/// Largest bonus, penalty or band score a rule may carry, before weighting.
pub const MAX_RULE_POINTS: u32 = 1000;

/// Everything an evaluation reads. Partial JSON documents overlay the
/// standard settings field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationSettings {
    pub fx_rate: f64,
    pub fees: FeeSchedule,
    pub conditions: ConditionConfig,
    pub scoring: ScoringProfile,
    pub references: ReferencePriceTable,
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self::standard()
    }
}

impl EvaluationSettings {
    pub fn standard() -> Self {
        Self {
            fx_rate: STANDARD_FX_RATE,
            fees: FeeSchedule::standard(),
            conditions: ConditionConfig::default(),
            scoring: ScoringProfile::standard(),
            references: ReferencePriceTable::new(),
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Checks caller-supplied configuration, clamping weights and ordering
    /// threshold steps from the highest minimum down.
    pub fn validated(mut self) -> Result<Self, SettingsError> {
        if !(self.fx_rate.is_finite() && self.fx_rate > 0.0) {
            return Err(SettingsError::InvalidFxRate(self.fx_rate));
        }

        for (name, value) in self
            .fees
            .rates()
            .into_iter()
            .chain(self.fees.amounts())
        {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SettingsError::InvalidFee { name, value });
            }
        }

        self.scoring.weights.clamp();

        for attribute in &mut self.scoring.rules {
            if let Some(penalty) = attribute.rule.penalty() {
                if penalty <= 0 {
                    return Err(SettingsError::NonPositivePenalty {
                        key: attribute.key.clone(),
                        penalty,
                    });
                }
            }

            if let Some(score) = attribute
                .rule
                .point_values()
                .into_iter()
                .find(|score| score.unsigned_abs() > MAX_RULE_POINTS)
            {
                return Err(SettingsError::PointsOutOfRange {
                    key: attribute.key.clone(),
                    score,
                });
            }

            match &mut attribute.rule {
                ScoringRule::Threshold { steps, .. } => {
                    if steps.is_empty() {
                        return Err(SettingsError::EmptyRule(attribute.key.clone()));
                    }
                    steps.sort_by(|a, b| b.minimum.total_cmp(&a.minimum));
                }
                ScoringRule::Range { bands, .. } if bands.is_empty() => {
                    return Err(SettingsError::EmptyRule(attribute.key.clone()));
                }
                ScoringRule::PriceVsReference { bands } if bands.is_empty() => {
                    return Err(SettingsError::EmptyRule(attribute.key.clone()));
                }
                _ => {}
            }
        }

        Ok(self)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid settings document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("fx rate must be a positive number, got {0}")]
    InvalidFxRate(f64),
    #[error("{name} must be a non-negative number, got {value}")]
    InvalidFee { name: &'static str, value: f64 },
    #[error("attribute '{key}' must have a positive penalty, got {penalty}")]
    NonPositivePenalty { key: String, penalty: i32 },
    #[error("attribute '{key}' awards {score} points, outside -{max}..={max}", max = MAX_RULE_POINTS)]
    PointsOutOfRange { key: String, score: i32 },
    #[error("attribute '{0}' has no steps or bands")]
    EmptyRule(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::scoring::ThresholdStep;

    #[test]
    fn standard_settings_validate() {
        let settings = EvaluationSettings::standard()
            .validated()
            .expect("standard settings are valid");
        assert_eq!(settings.fx_rate, STANDARD_FX_RATE);
    }

    #[test]
    fn partial_json_overlays_standard() {
        let settings = EvaluationSettings::from_json(
            r#"{
                "fx_rate": 1500,
                "fees": { "budget_available": 25000 },
                "conditions": { "budget_required": false },
                "references": { "Villa Urquiza": 1750 }
            }"#,
        )
        .expect("settings parse");

        assert_eq!(settings.fx_rate, 1500.0);
        assert_eq!(settings.fees.budget_available, 25_000.0);
        assert_eq!(settings.fees.notary_rate, FeeSchedule::standard().notary_rate);
        assert!(settings.conditions.credit_required);
        assert!(!settings.conditions.budget_required);
        assert_eq!(settings.references.lookup("Villa Urquiza"), Some(1750.0));
        assert_eq!(settings.scoring, ScoringProfile::standard());
    }

    #[test]
    fn rejects_bad_fx_and_fees() {
        let mut settings = EvaluationSettings::standard();
        settings.fx_rate = 0.0;
        assert!(matches!(
            settings.validated(),
            Err(SettingsError::InvalidFxRate(_))
        ));

        let mut settings = EvaluationSettings::standard();
        settings.fees.notary_rate = -0.01;
        assert!(matches!(
            settings.validated(),
            Err(SettingsError::InvalidFee {
                name: "notary_rate",
                ..
            })
        ));
    }

    #[test]
    fn rejects_non_positive_penalty() {
        let mut settings = EvaluationSettings::standard();
        settings.scoring.rules[0].rule = ScoringRule::Boolean {
            bonus: 2,
            penalty: 0,
        };

        match settings.validated() {
            Err(SettingsError::NonPositivePenalty { key, penalty }) => {
                assert_eq!(key, "terraza");
                assert_eq!(penalty, 0);
            }
            other => panic!("expected penalty error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_points_beyond_bound() {
        let settings = EvaluationSettings::from_json(
            r#"{"scoring":{"weights":{"terraza":{"weight":10}},"rules":[
                {"key":"terraza","kind":"boolean","bonus":2147483647,"penalty":1}
            ]}}"#,
        )
        .expect("settings parse");

        match settings.validated() {
            Err(SettingsError::PointsOutOfRange { key, score }) => {
                assert_eq!(key, "terraza");
                assert_eq!(score, i32::MAX);
            }
            other => panic!("expected points error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_oversized_band_scores() {
        let mut settings = EvaluationSettings::standard();
        let rooms = settings
            .scoring
            .rules
            .iter_mut()
            .find(|rule| rule.key == "amb")
            .expect("rooms rule");
        rooms.rule = ScoringRule::Threshold {
            steps: vec![ThresholdStep {
                minimum: 1.0,
                score: -5000,
            }],
            good_from: 1,
            penalty: 2,
        };

        assert!(matches!(
            settings.validated(),
            Err(SettingsError::PointsOutOfRange { score: -5000, .. })
        ));
    }

    #[test]
    fn out_of_range_weights_clamp_instead_of_failing() {
        let settings = EvaluationSettings::from_json(
            r#"{"scoring":{"weights":{"terraza":{"weight":-2},"balcon":{"weight":300}}}}"#,
        )
        .expect("settings parse")
        .validated()
        .expect("valid");

        assert_eq!(settings.scoring.weights.effective("terraza"), 0);
        assert_eq!(settings.scoring.weights.effective("balcon"), 10);
    }

    #[test]
    fn sorts_threshold_steps_descending() {
        let mut settings = EvaluationSettings::standard();
        let rooms = settings
            .scoring
            .rules
            .iter_mut()
            .find(|rule| rule.key == "amb")
            .expect("rooms rule");
        rooms.rule = ScoringRule::Threshold {
            steps: vec![
                ThresholdStep {
                    minimum: 2.0,
                    score: 1,
                },
                ThresholdStep {
                    minimum: 4.0,
                    score: 3,
                },
            ],
            good_from: 2,
            penalty: 2,
        };

        let settings = settings.validated().expect("valid");
        let rooms = settings
            .scoring
            .rules
            .iter()
            .find(|rule| rule.key == "amb")
            .expect("rooms rule");
        match &rooms.rule {
            ScoringRule::Threshold { steps, .. } => assert_eq!(steps[0].minimum, 4.0),
            other => panic!("expected threshold, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_reports_path() {
        let error = EvaluationSettings::from_path("./does-not-exist.json")
            .expect_err("expected io error");
        match error {
            SettingsError::Io { path, .. } => assert!(path.ends_with("does-not-exist.json")),
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
