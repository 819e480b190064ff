use serde::{Deserialize, Serialize};

use super::affordability::{calculate, AffordabilityInput, CostBreakdown, FeeSchedule};

/// What-if inputs; anything left out falls back to the base configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationOverrides {
    #[serde(default)]
    pub negotiation_percent: Option<f64>,
    #[serde(default)]
    pub fx_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationPoint {
    pub negotiation_percent: f64,
    pub costs: CostBreakdown,
}

/// Re-runs the affordability calculation under hypothetical inputs.
#[derive(Debug, Clone, Copy)]
pub struct NegotiationSimulator<'a> {
    fees: &'a FeeSchedule,
    base_fx_rate: f64,
}

impl<'a> NegotiationSimulator<'a> {
    pub fn new(fees: &'a FeeSchedule, base_fx_rate: f64) -> Self {
        Self { fees, base_fx_rate }
    }

    pub fn simulate(
        &self,
        price: f64,
        has_agency_fee: bool,
        overrides: SimulationOverrides,
    ) -> CostBreakdown {
        let input = AffordabilityInput {
            price,
            fx_rate: overrides.fx_rate.unwrap_or(self.base_fx_rate),
            has_agency_fee,
            negotiation_percent: overrides.negotiation_percent.unwrap_or(0.0),
        };
        calculate(&input, self.fees)
    }

    /// One breakdown per negotiation percentage, in the order given.
    pub fn sweep(
        &self,
        price: f64,
        has_agency_fee: bool,
        percents: &[f64],
        fx_rate: Option<f64>,
    ) -> Vec<SimulationPoint> {
        percents
            .iter()
            .map(|&negotiation_percent| SimulationPoint {
                negotiation_percent,
                costs: self.simulate(
                    price,
                    has_agency_fee,
                    SimulationOverrides {
                        negotiation_percent: Some(negotiation_percent),
                        fx_rate,
                    },
                ),
            })
            .collect()
    }
}
