use super::common::*;
use crate::evaluation::domain::fields;
use crate::evaluation::{
    ConditionConfig, DiscountVerdict, EvaluationEngine, EvaluationSettings, ListingWarning,
    MarketPosition, SimulationOverrides, Tier,
};

#[test]
fn engine_ranks_strong_listing_in_first_tier() {
    let engine = engine();

    let evaluated = engine.evaluate(&strong_listing());

    assert_eq!(evaluated.tier.tier, Tier::One);
    assert_eq!(evaluated.tier.base_score, 100);
    assert!(evaluated.costs.ok);
    assert_eq!(evaluated.missing_count, 0);
    assert!(evaluated.warnings.is_empty());

    let reference = evaluated.price_reference.expect("benchmark available");
    assert_eq!(reference.position, MarketPosition::WellBelow);
    assert_eq!(reference.contribution, 15);

    // 100 base + 110 from attributes + 15 below market.
    assert_eq!(evaluated.total_score, 225);
}

#[test]
fn engine_computes_base_case_costs() {
    let evaluated = engine().evaluate(&strong_listing());

    assert_eq!(evaluated.costs.effective_price, 94_000.0);
    assert_eq!(evaluated.costs.credit_usd, 86_897.0);
    assert_eq!(evaluated.costs.down_payment, 9_400.0);
    assert_eq!(evaluated.costs.total_needed, 16_916.0);
    assert_eq!(evaluated.costs.difference, 3_084.0);
}

#[test]
fn engine_compares_price_per_area_with_neighborhood_benchmark() {
    let listing = strong_listing().with(fields::PRICE, "105000");

    let evaluated = engine().evaluate(&listing);

    assert_eq!(evaluated.property.price_per_area, 1500.0);
    let variance = evaluated
        .property
        .variance_vs_reference
        .expect("variance available");
    assert!((variance - (-0.142_857)).abs() < 1e-4);
    assert_eq!(
        evaluated.price_reference.map(|score| score.position),
        Some(MarketPosition::WellBelow)
    );
    assert_eq!(evaluated.tier.tier, Tier::Two);
}

#[test]
fn engine_skips_benchmark_for_unknown_neighborhood() {
    let listing = strong_listing().with(fields::NEIGHBORHOOD, "Saavedra");

    let evaluated = engine().evaluate(&listing);

    assert_eq!(evaluated.property.variance_vs_reference, None);
    assert_eq!(evaluated.price_reference, None);
    assert_eq!(evaluated.total_score, 210);
}

#[test]
fn engine_penalizes_every_missing_attribute() {
    let evaluated = engine().evaluate(&sparse_listing());

    assert_eq!(evaluated.tier.tier, Tier::Five);
    assert_eq!(evaluated.missing_count, 11);
    assert_eq!(evaluated.missing_keys().len(), 11);
    assert_eq!(evaluated.total_score, -69);
    assert!(evaluated
        .attributes
        .iter()
        .all(|result| result.contribution < 0));
    assert!(evaluated
        .warnings
        .contains(&ListingWarning::MissingNeighborhood));
    assert!(evaluated.warnings.contains(&ListingWarning::MissingArea));
}

#[test]
fn engine_discards_inactive_listing_only_when_required() {
    let inactive = strong_listing().with(fields::ACTIVE, "No");

    assert_eq!(engine().evaluate(&inactive).tier.tier, Tier::Five);

    let relaxed = EvaluationEngine::new(EvaluationSettings {
        conditions: ConditionConfig {
            active_required: false,
            ..ConditionConfig::default()
        },
        ..settings()
    })
    .expect("valid settings");

    assert_eq!(relaxed.evaluate(&inactive).tier.tier, Tier::One);
}

#[test]
fn engine_regroups_by_credit_when_budget_not_required() {
    let engine = EvaluationEngine::new(EvaluationSettings {
        conditions: ConditionConfig {
            budget_required: false,
            ..ConditionConfig::default()
        },
        ..settings()
    })
    .expect("valid settings");

    assert_eq!(engine.evaluate(&over_budget_listing()).tier.tier, Tier::One);
    assert_eq!(
        engine.evaluate(&unconfirmed_credit_listing()).tier.tier,
        Tier::Two
    );
}

#[test]
fn engine_reports_days_listed_against_evaluation_date() {
    let dated = engine().with_as_of(evaluation_date());

    assert_eq!(dated.evaluate(&strong_listing()).property.days_listed, Some(30));
    assert_eq!(engine().evaluate(&strong_listing()).property.days_listed, None);
}

#[test]
fn engine_simulates_negotiation_and_fx() {
    let engine = engine();
    let evaluated = engine.evaluate(&over_budget_listing());
    assert!(!evaluated.costs.ok);

    let negotiated = engine.simulate(
        &evaluated.property,
        SimulationOverrides {
            negotiation_percent: Some(10.0),
            fx_rate: None,
        },
    );
    assert_eq!(negotiated.effective_price, 117_000.0);
    assert!(negotiated.total_needed < evaluated.costs.total_needed);

    let unchanged = engine.simulate(&evaluated.property, SimulationOverrides::default());
    assert_eq!(unchanged, evaluated.costs);

    let sweep = engine.negotiation_sweep(&evaluated.property, &[0.0, 5.0, 10.0], Some(1200.0));
    assert_eq!(sweep.len(), 3);
    assert_eq!(sweep[0].costs.credit_usd, 105_000.0);
}

#[test]
fn engine_solves_discount_for_canonical_record() {
    let engine = engine();

    let affordable = engine.evaluate(&strong_listing());
    assert_eq!(
        engine.solve_discount(&affordable.property, None).verdict(),
        DiscountVerdict::AlreadyAffordable
    );

    let pricey = engine.evaluate(&over_budget_listing());
    let solution = engine.solve_discount(&pricey.property, None);
    assert!(solution.discount_percent > 20.0);
    assert_eq!(solution.verdict(), DiscountVerdict::OutOfReach);

    let stronger_peso = engine.solve_discount(&pricey.property, Some(1200.0));
    assert_ne!(stronger_peso.target_price, solution.target_price);
}

#[test]
fn engine_rejects_invalid_settings() {
    let settings = EvaluationSettings {
        fx_rate: -1.0,
        ..EvaluationSettings::standard()
    };

    assert!(EvaluationEngine::new(settings).is_err());
}
