use serde::{Deserialize, Serialize};

/// Share of the price the lender never finances.
pub const MINIMUM_DOWN_PAYMENT_RATIO: f64 = 0.10;

/// Closing-cost rates and buyer capacity. Money amounts are in USD except the
/// credit principal, which is granted in local currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSchedule {
    pub notary_rate: f64,
    pub stamp_rate: f64,
    pub stamp_exemption_threshold: f64,
    pub registry_rate: f64,
    pub agency_rate: f64,
    pub mortgage_tax_rate: f64,
    pub fixed_certificate_fee: f64,
    pub credit_principal_local: f64,
    pub budget_available: f64,
}

impl FeeSchedule {
    pub fn standard() -> Self {
        Self {
            notary_rate: 0.0242,
            stamp_rate: 0.0175,
            stamp_exemption_threshold: 140_000.0,
            registry_rate: 0.0065,
            agency_rate: 0.04,
            mortgage_tax_rate: 0.005,
            fixed_certificate_fee: 400.0,
            credit_principal_local: 126_000_000.0,
            budget_available: 20_000.0,
        }
    }

    /// Credit principal converted to USD at `fx_rate` local units per dollar.
    pub fn credit_usd(&self, fx_rate: f64) -> f64 {
        if fx_rate.is_finite() && fx_rate > 0.0 {
            round_half_up(self.credit_principal_local / fx_rate)
        } else {
            0.0
        }
    }

    pub(crate) fn rates(&self) -> [(&'static str, f64); 5] {
        [
            ("notary_rate", self.notary_rate),
            ("stamp_rate", self.stamp_rate),
            ("registry_rate", self.registry_rate),
            ("agency_rate", self.agency_rate),
            ("mortgage_tax_rate", self.mortgage_tax_rate),
        ]
    }

    pub(crate) fn amounts(&self) -> [(&'static str, f64); 4] {
        [
            ("stamp_exemption_threshold", self.stamp_exemption_threshold),
            ("fixed_certificate_fee", self.fixed_certificate_fee),
            ("credit_principal_local", self.credit_principal_local),
            ("budget_available", self.budget_available),
        ]
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::standard()
    }
}

/// Price state being costed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffordabilityInput {
    pub price: f64,
    pub fx_rate: f64,
    pub has_agency_fee: bool,
    pub negotiation_percent: f64,
}

/// Every line item of the purchase, so callers can show and assert each one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub effective_price: f64,
    pub credit_usd: f64,
    pub down_payment: f64,
    pub notary: f64,
    pub stamp_tax: f64,
    pub registry: f64,
    pub agency_fee: f64,
    pub mortgage_tax: f64,
    pub certificate_fee: f64,
    pub total_needed: f64,
    pub ok: bool,
    pub difference: f64,
}

impl CostBreakdown {
    /// Closing costs on top of the down payment.
    pub fn closing_costs(&self) -> f64 {
        self.total_needed - self.down_payment
    }
}

/// Half-up rounding to whole units: 0.5 always rounds toward positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

pub fn calculate(input: &AffordabilityInput, fees: &FeeSchedule) -> CostBreakdown {
    let negotiation = if input.negotiation_percent.is_finite() {
        input.negotiation_percent.clamp(0.0, 100.0)
    } else {
        0.0
    };

    let effective_price = round_half_up(input.price * (1.0 - negotiation / 100.0));
    let credit_usd = fees.credit_usd(input.fx_rate);
    let down_payment =
        (effective_price - credit_usd).max(effective_price * MINIMUM_DOWN_PAYMENT_RATIO);
    let notary = round_half_up(effective_price * fees.notary_rate);
    let stamp_tax = if effective_price <= fees.stamp_exemption_threshold {
        0.0
    } else {
        round_half_up(effective_price * fees.stamp_rate)
    };
    let registry = round_half_up(effective_price * fees.registry_rate);
    let agency_fee = if input.has_agency_fee {
        round_half_up(effective_price * fees.agency_rate)
    } else {
        0.0
    };
    let mortgage_tax = round_half_up(effective_price * fees.mortgage_tax_rate);
    let certificate_fee = fees.fixed_certificate_fee;

    let total_needed = down_payment
        + notary
        + stamp_tax
        + registry
        + agency_fee
        + mortgage_tax
        + certificate_fee;

    CostBreakdown {
        effective_price,
        credit_usd,
        down_payment,
        notary,
        stamp_tax,
        registry,
        agency_fee,
        mortgage_tax,
        certificate_fee,
        total_needed,
        ok: total_needed <= fees.budget_available,
        difference: fees.budget_available - total_needed,
    }
}
