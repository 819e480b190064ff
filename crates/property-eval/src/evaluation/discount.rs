use serde::{Deserialize, Serialize};

use super::affordability::{FeeSchedule, MINIMUM_DOWN_PAYMENT_RATIO};

/// Largest discount a seller is realistically expected to accept.
pub const MAX_REALISTIC_DISCOUNT_PERCENT: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountSolution {
    pub target_price: f64,
    pub discount_percent: f64,
    pub discount_amount: f64,
    pub feasible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountVerdict {
    AlreadyAffordable,
    Negotiable,
    OutOfReach,
}

impl DiscountVerdict {
    pub const fn label(self) -> &'static str {
        match self {
            DiscountVerdict::AlreadyAffordable => "fits the budget as listed",
            DiscountVerdict::Negotiable => "fits with a realistic discount",
            DiscountVerdict::OutOfReach => "needs more than a realistic discount",
        }
    }
}

impl DiscountSolution {
    pub fn verdict(&self) -> DiscountVerdict {
        if self.feasible {
            DiscountVerdict::Negotiable
        } else if self.discount_percent <= 0.0 {
            DiscountVerdict::AlreadyAffordable
        } else {
            DiscountVerdict::OutOfReach
        }
    }
}

/// Highest price whose total purchase cost fits the budget, and the discount
/// from `price` needed to reach it.
///
/// Inverts the two down-payment branches of the affordability calculation
/// (credit gap above `credit / 0.9`, ten-percent minimum below). The forward
/// calculation rounds each line item, so the inverse is only exact to within
/// a few units.
pub fn solve(price: f64, has_agency_fee: bool, fx_rate: f64, fees: &FeeSchedule) -> DiscountSolution {
    let agency_rate = if has_agency_fee { fees.agency_rate } else { 0.0 };
    let fee_rate_sum = fees.notary_rate
        + fees.stamp_rate
        + fees.registry_rate
        + agency_rate
        + fees.mortgage_tax_rate;
    let credit_usd = fees.credit_usd(fx_rate);

    let credit_gap_target = (fees.budget_available + credit_usd - fees.fixed_certificate_fee)
        / (1.0 + fee_rate_sum);
    let minimum_down_target = (fees.budget_available - fees.fixed_certificate_fee)
        / (MINIMUM_DOWN_PAYMENT_RATIO + fee_rate_sum);
    let breakpoint = credit_usd / (1.0 - MINIMUM_DOWN_PAYMENT_RATIO);

    let target_price = if credit_gap_target > breakpoint {
        credit_gap_target
    } else {
        minimum_down_target
    };

    let discount_percent = if price > 0.0 {
        ((price - target_price) / price * 100.0).max(0.0)
    } else {
        0.0
    };

    DiscountSolution {
        target_price,
        discount_percent,
        discount_amount: price - target_price,
        feasible: discount_percent > 0.0 && discount_percent <= MAX_REALISTIC_DISCOUNT_PERCENT,
    }
}
