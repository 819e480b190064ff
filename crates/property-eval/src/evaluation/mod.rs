pub mod affordability;
pub mod discount;
pub mod domain;
mod normalizer;
pub mod scoring;
pub mod settings;
pub mod simulation;
pub(crate) mod text;
pub mod tier;
pub mod warnings;

#[cfg(test)]
mod tests;

pub use affordability::{AffordabilityInput, CostBreakdown, FeeSchedule};
pub use discount::{DiscountSolution, DiscountVerdict, MAX_REALISTIC_DISCOUNT_PERCENT};
pub use domain::{CreditEligibility, NormalizedProperty, RawListingRecord, ReferencePriceTable};
pub use scoring::{
    AttributeScoreResult, AttributeStatus, MarketPosition, PriceReferenceScore, ScoringProfile,
    ScoringRule, ScoringWeightConfig,
};
pub use settings::{EvaluationSettings, SettingsError};
pub use simulation::{NegotiationSimulator, SimulationOverrides, SimulationPoint};
pub use tier::{ConditionConfig, Tier, TierResult};
pub use warnings::ListingWarning;

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use tier::TierInputs;

/// Turns raw listing rows into ranked, annotated records. Holds validated,
/// read-only settings and can be shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct EvaluationEngine {
    settings: EvaluationSettings,
    as_of: Option<NaiveDate>,
}

impl EvaluationEngine {
    pub fn new(settings: EvaluationSettings) -> Result<Self, SettingsError> {
        Ok(Self {
            settings: settings.validated()?,
            as_of: None,
        })
    }

    /// Date used to compute days listed. Without one, days listed is left empty.
    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = Some(as_of);
        self
    }

    pub fn settings(&self) -> &EvaluationSettings {
        &self.settings
    }

    pub fn evaluate(&self, raw: &RawListingRecord) -> EvaluatedProperty {
        let settings = &self.settings;
        let property = normalizer::normalize(raw, &settings.references, self.as_of);

        let costs = affordability::calculate(
            &AffordabilityInput {
                price: property.price,
                fx_rate: settings.fx_rate,
                has_agency_fee: property.has_agency_fee,
                negotiation_percent: 0.0,
            },
            &settings.fees,
        );

        let tier = tier::classify(
            TierInputs {
                has_link: property.has_link,
                is_active: property.is_active,
                credit: property.credit,
                within_budget: fits_budget(&property, &costs),
            },
            &settings.conditions,
        );

        let card = scoring::score_attributes(raw, &property, &settings.scoring);
        let total_score = tier.base_score + card.attribute_total() + card.price_reference_total();
        let warnings = warnings::inspect(raw, &property);

        EvaluatedProperty {
            property,
            tier,
            total_score,
            missing_count: card.missing_count,
            attributes: card.attributes,
            price_reference: card.price_reference,
            costs,
            warnings,
        }
    }

    /// Evaluates every record and returns them ranked: tier ascending, then
    /// total score descending, then fewest missing attributes.
    pub fn evaluate_all<'a, I>(&self, records: I) -> Vec<EvaluatedProperty>
    where
        I: IntoIterator<Item = &'a RawListingRecord>,
    {
        let mut evaluated: Vec<EvaluatedProperty> =
            records.into_iter().map(|raw| self.evaluate(raw)).collect();
        evaluated.sort_by(rank_order);

        tracing::info!(
            evaluated = evaluated.len(),
            within_budget = evaluated.iter().filter(|item| item.within_budget()).count(),
            "listing batch evaluated"
        );

        evaluated
    }

    pub fn simulator(&self) -> NegotiationSimulator<'_> {
        NegotiationSimulator::new(&self.settings.fees, self.settings.fx_rate)
    }

    pub fn simulate(
        &self,
        property: &NormalizedProperty,
        overrides: SimulationOverrides,
    ) -> CostBreakdown {
        self.simulator()
            .simulate(property.price, property.has_agency_fee, overrides)
    }

    pub fn negotiation_sweep(
        &self,
        property: &NormalizedProperty,
        percents: &[f64],
        fx_rate: Option<f64>,
    ) -> Vec<SimulationPoint> {
        self.simulator()
            .sweep(property.price, property.has_agency_fee, percents, fx_rate)
    }

    pub fn solve_discount(
        &self,
        property: &NormalizedProperty,
        fx_rate: Option<f64>,
    ) -> DiscountSolution {
        discount::solve(
            property.price,
            property.has_agency_fee,
            fx_rate.unwrap_or(self.settings.fx_rate),
            &self.settings.fees,
        )
    }
}

fn rank_order(left: &EvaluatedProperty, right: &EvaluatedProperty) -> Ordering {
    left.tier
        .tier
        .cmp(&right.tier.tier)
        .then_with(|| right.total_score.cmp(&left.total_score))
        .then_with(|| left.missing_count.cmp(&right.missing_count))
}

/// Canonical annotated record for one listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedProperty {
    pub property: NormalizedProperty,
    pub tier: TierResult,
    pub total_score: i32,
    pub missing_count: usize,
    pub attributes: Vec<AttributeScoreResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_reference: Option<PriceReferenceScore>,
    pub costs: CostBreakdown,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ListingWarning>,
}

/// A listing without a usable price never counts as affordable, even though
/// its cost breakdown (certificates only) fits any budget.
fn fits_budget(property: &NormalizedProperty, costs: &CostBreakdown) -> bool {
    property.price > 0.0 && costs.ok
}

impl EvaluatedProperty {
    /// Same predicate the tier classifier receives.
    pub fn within_budget(&self) -> bool {
        fits_budget(&self.property, &self.costs)
    }

    pub fn missing_keys(&self) -> Vec<&str> {
        self.attributes
            .iter()
            .filter(|result| result.status == AttributeStatus::Unknown)
            .map(|result| result.key.as_str())
            .collect()
    }
}
