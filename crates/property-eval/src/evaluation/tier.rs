use serde::{Deserialize, Serialize};

use super::domain::CreditEligibility;

/// Toggles deciding which facts participate in tiering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionConfig {
    pub credit_required: bool,
    pub budget_required: bool,
    pub active_required: bool,
}

impl Default for ConditionConfig {
    fn default() -> Self {
        Self {
            credit_required: true,
            budget_required: true,
            active_required: true,
        }
    }
}

/// Priority bucket, 1 best to 5 discarded. Primary sort key of the ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Tier {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
}

impl Tier {
    pub const fn ordered() -> [Tier; 5] {
        [Tier::One, Tier::Two, Tier::Three, Tier::Four, Tier::Five]
    }

    pub const fn number(self) -> u8 {
        self as u8
    }

    pub const fn base_score(self) -> i32 {
        match self {
            Tier::One => 100,
            Tier::Two => 80,
            Tier::Three => 50,
            Tier::Four => 25,
            Tier::Five => 0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Tier::One => "Credit OK, within budget",
            Tier::Two => "Credit OK, over budget",
            Tier::Three => "Credit unknown",
            Tier::Four => "No credit",
            Tier::Five => "Discarded",
        }
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> Self {
        tier.number()
    }
}

impl TryFrom<u8> for Tier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Tier::One),
            2 => Ok(Tier::Two),
            3 => Ok(Tier::Three),
            4 => Ok(Tier::Four),
            5 => Ok(Tier::Five),
            other => Err(format!("tier must be between 1 and 5, got {other}")),
        }
    }
}

/// Facts the classifier looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierInputs {
    pub has_link: bool,
    pub is_active: bool,
    pub credit: CreditEligibility,
    pub within_budget: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierResult {
    pub tier: Tier,
    pub base_score: i32,
}

impl From<Tier> for TierResult {
    fn from(tier: Tier) -> Self {
        Self {
            tier,
            base_score: tier.base_score(),
        }
    }
}

pub fn classify(inputs: TierInputs, conditions: &ConditionConfig) -> TierResult {
    let inactive = conditions.active_required && !inputs.is_active;
    if !inputs.has_link || inactive {
        return Tier::Five.into();
    }

    let mut tier = match (inputs.credit, inputs.within_budget) {
        (CreditEligibility::Yes, true) => Tier::One,
        (CreditEligibility::Yes, false) => Tier::Two,
        (CreditEligibility::Unknown, _) => Tier::Three,
        (CreditEligibility::No, _) => Tier::Four,
    };

    if !conditions.credit_required {
        tier = if inputs.within_budget {
            Tier::One
        } else {
            Tier::Two
        };
    }

    // Applied after the credit regroup; with both toggles off the credit
    // regroup is overwritten entirely.
    if !conditions.budget_required {
        tier = match inputs.credit {
            CreditEligibility::Yes => Tier::One,
            CreditEligibility::Unknown => Tier::Two,
            CreditEligibility::No => Tier::Three,
        };
    }

    tier.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(credit: CreditEligibility, within_budget: bool) -> TierInputs {
        TierInputs {
            has_link: true,
            is_active: true,
            credit,
            within_budget,
        }
    }

    #[test]
    fn default_conditions_follow_precedence() {
        let conditions = ConditionConfig::default();
        let cases = [
            (CreditEligibility::Yes, true, Tier::One),
            (CreditEligibility::Yes, false, Tier::Two),
            (CreditEligibility::Unknown, true, Tier::Three),
            (CreditEligibility::Unknown, false, Tier::Three),
            (CreditEligibility::No, true, Tier::Four),
            (CreditEligibility::No, false, Tier::Four),
        ];

        for (credit, within_budget, expected) in cases {
            let result = classify(inputs(credit, within_budget), &conditions);
            assert_eq!(result.tier, expected, "{credit:?} within={within_budget}");
            assert_eq!(result.base_score, expected.base_score());
        }
    }

    #[test]
    fn missing_link_or_inactive_is_discarded() {
        let conditions = ConditionConfig {
            credit_required: false,
            budget_required: false,
            active_required: true,
        };
        let mut facts = inputs(CreditEligibility::Yes, true);
        facts.has_link = false;
        assert_eq!(classify(facts, &conditions).tier, Tier::Five);

        facts.has_link = true;
        facts.is_active = false;
        let result = classify(facts, &conditions);
        assert_eq!(result.tier, Tier::Five);
        assert_eq!(result.base_score, 0);
    }

    #[test]
    fn inactivity_ignored_when_not_required() {
        let conditions = ConditionConfig {
            active_required: false,
            ..ConditionConfig::default()
        };
        let mut facts = inputs(CreditEligibility::Yes, true);
        facts.is_active = false;

        assert_eq!(classify(facts, &conditions).tier, Tier::One);
    }

    #[test]
    fn credit_toggle_regroups_by_budget() {
        let conditions = ConditionConfig {
            credit_required: false,
            ..ConditionConfig::default()
        };

        assert_eq!(
            classify(inputs(CreditEligibility::No, true), &conditions).tier,
            Tier::One
        );
        assert_eq!(
            classify(inputs(CreditEligibility::Unknown, false), &conditions).tier,
            Tier::Two
        );
    }

    #[test]
    fn budget_toggle_regroups_by_credit() {
        let conditions = ConditionConfig {
            budget_required: false,
            ..ConditionConfig::default()
        };

        assert_eq!(
            classify(inputs(CreditEligibility::Yes, false), &conditions).tier,
            Tier::One
        );
        assert_eq!(
            classify(inputs(CreditEligibility::Unknown, true), &conditions).tier,
            Tier::Two
        );
        assert_eq!(
            classify(inputs(CreditEligibility::No, true), &conditions).tier,
            Tier::Three
        );
    }

    #[test]
    fn both_toggles_off_ends_on_credit_grouping() {
        let conditions = ConditionConfig {
            credit_required: false,
            budget_required: false,
            active_required: true,
        };

        assert_eq!(
            classify(inputs(CreditEligibility::No, true), &conditions).tier,
            Tier::Three
        );
        assert_eq!(
            classify(inputs(CreditEligibility::Yes, false), &conditions).tier,
            Tier::One
        );
    }

    #[test]
    fn tier_serializes_as_number() {
        let json = serde_json::to_string(&TierResult::from(Tier::Two)).expect("serialize");
        assert_eq!(json, r#"{"tier":2,"base_score":80}"#);
        let parsed: Tier = serde_json::from_str("4").expect("deserialize");
        assert_eq!(parsed, Tier::Four);
        assert!(serde_json::from_str::<Tier>("6").is_err());
    }
}
