use std::collections::HashMap;

use super::views::{MissingDataView, PropertySnapshotView, RankingReportSummary, TierCountEntry};
use crate::evaluation::{EvaluatedProperty, MarketPosition, Tier};

#[derive(Debug, Clone)]
pub struct PropertySnapshot {
    pub address: String,
    pub neighborhood: String,
    pub link: String,
    pub tier: Tier,
    pub total_score: i32,
    pub price: f64,
    pub price_per_area: f64,
    pub total_needed: f64,
    pub difference: f64,
    pub market_position: Option<MarketPosition>,
}

impl PropertySnapshot {
    fn from_evaluated(item: &EvaluatedProperty) -> Self {
        Self {
            address: item.property.address.clone(),
            neighborhood: item.property.neighborhood.clone(),
            link: item.property.link.clone(),
            tier: item.tier.tier,
            total_score: item.total_score,
            price: item.property.price,
            price_per_area: item.property.price_per_area,
            total_needed: item.costs.total_needed,
            difference: item.costs.difference,
            market_position: item.price_reference.map(|score| score.position),
        }
    }

    pub fn to_view(&self) -> PropertySnapshotView {
        PropertySnapshotView {
            address: self.address.clone(),
            neighborhood: self.neighborhood.clone(),
            link: self.link.clone(),
            tier: self.tier,
            tier_label: self.tier.label(),
            total_score: self.total_score,
            price: self.price,
            price_per_area: self.price_per_area,
            total_needed: self.total_needed,
            difference: self.difference,
            market_position: self.market_position.map(MarketPosition::label),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MissingDataEntry {
    pub address: String,
    pub link: String,
    pub missing: Vec<String>,
}

impl MissingDataEntry {
    pub fn to_view(&self) -> MissingDataView {
        MissingDataView {
            address: self.address.clone(),
            link: self.link.clone(),
            missing_count: self.missing.len(),
            missing: self.missing.clone(),
        }
    }
}

/// Batch overview of a ranked evaluation run.
#[derive(Debug, Default)]
pub struct RankingReport {
    pub evaluated: usize,
    pub within_budget: usize,
    pub tier_counts: HashMap<Tier, usize>,
    pub top_picks: Vec<PropertySnapshot>,
    pub missing_data: Vec<MissingDataEntry>,
}

impl RankingReport {
    /// Top picks keep the order of `ranked`. The missing-data list covers
    /// linked, active listings and puts the most incomplete first.
    pub fn build(ranked: &[EvaluatedProperty]) -> Self {
        let mut report = RankingReport {
            evaluated: ranked.len(),
            ..RankingReport::default()
        };

        for item in ranked {
            *report.tier_counts.entry(item.tier.tier).or_default() += 1;

            if item.within_budget() {
                report.within_budget += 1;
            }

            if matches!(item.tier.tier, Tier::One | Tier::Two) {
                report.top_picks.push(PropertySnapshot::from_evaluated(item));
            }

            if item.property.has_link && item.property.is_active && item.missing_count > 0 {
                report.missing_data.push(MissingDataEntry {
                    address: item.property.address.clone(),
                    link: item.property.link.clone(),
                    missing: item
                        .missing_keys()
                        .into_iter()
                        .map(str::to_string)
                        .collect(),
                });
            }
        }

        report
            .missing_data
            .sort_by(|left, right| right.missing.len().cmp(&left.missing.len()));

        report
    }

    pub fn summary(&self) -> RankingReportSummary {
        let tier_counts = Tier::ordered()
            .into_iter()
            .map(|tier| TierCountEntry {
                tier,
                tier_label: tier.label(),
                count: self.tier_counts.get(&tier).copied().unwrap_or(0),
            })
            .collect();

        RankingReportSummary {
            evaluated: self.evaluated,
            within_budget: self.within_budget,
            tier_counts,
            top_picks: self
                .top_picks
                .iter()
                .map(PropertySnapshot::to_view)
                .collect(),
            missing_data: self
                .missing_data
                .iter()
                .map(MissingDataEntry::to_view)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::domain::fields;
    use crate::evaluation::{EvaluationEngine, EvaluationSettings, RawListingRecord};

    fn listing(address: &str, price: &str, credit: &str) -> RawListingRecord {
        RawListingRecord::new()
            .with(fields::LINK, format!("https://listings.example/{address}"))
            .with(fields::ADDRESS, address)
            .with(fields::NEIGHBORHOOD, "Flores")
            .with(fields::PRICE, price)
            .with(fields::COVERED_AREA, "52")
            .with(fields::CREDIT_ELIGIBLE, credit)
            .with(fields::TERRACE, "no")
            .with(fields::BALCONY, "si")
    }

    fn ranked() -> Vec<EvaluatedProperty> {
        let engine =
            EvaluationEngine::new(EvaluationSettings::standard()).expect("valid settings");
        let listings = vec![
            listing("Rivadavia 7000", "89000", "si").with(fields::ROOMS, "3"),
            listing("Yerbal 1500", "150000", "si"),
            listing("Bacacay 2400", "91000", ""),
            RawListingRecord::new()
                .with(fields::ADDRESS, "Sin link")
                .with(fields::PRICE, "90000"),
        ];
        engine.evaluate_all(&listings)
    }

    #[test]
    fn report_counts_tiers_and_budget() {
        let report = RankingReport::build(&ranked());

        assert_eq!(report.evaluated, 4);
        assert_eq!(report.within_budget, 3);
        assert_eq!(report.tier_counts.get(&Tier::One), Some(&1));
        assert_eq!(report.tier_counts.get(&Tier::Two), Some(&1));
        assert_eq!(report.tier_counts.get(&Tier::Three), Some(&1));
        assert_eq!(report.tier_counts.get(&Tier::Five), Some(&1));
    }

    #[test]
    fn unpriced_listing_is_not_counted_within_budget() {
        let engine =
            EvaluationEngine::new(EvaluationSettings::standard()).expect("valid settings");
        let unpriced = listing("Directorio 3300", "", "si");

        let ranked = engine.evaluate_all([&unpriced]);

        assert!(ranked[0].costs.ok);
        assert!(!ranked[0].within_budget());
        assert_eq!(ranked[0].tier.tier, Tier::Two);
        assert_eq!(RankingReport::build(&ranked).summary().within_budget, 0);
    }

    #[test]
    fn report_lists_top_picks_in_rank_order() {
        let report = RankingReport::build(&ranked());

        let addresses: Vec<&str> = report
            .top_picks
            .iter()
            .map(|pick| pick.address.as_str())
            .collect();
        assert_eq!(addresses, vec!["Rivadavia 7000", "Yerbal 1500"]);
    }

    #[test]
    fn missing_data_skips_unlinked_and_sorts_most_incomplete_first() {
        let report = RankingReport::build(&ranked());

        assert_eq!(report.missing_data.len(), 3);
        assert!(report
            .missing_data
            .iter()
            .all(|entry| entry.address != "Sin link"));
        assert_eq!(report.missing_data[2].address, "Rivadavia 7000");
        assert!(report.missing_data[0].missing.len() >= report.missing_data[1].missing.len());
    }

    #[test]
    fn summary_lists_every_tier() {
        let summary = RankingReport::build(&ranked()).summary();

        assert_eq!(summary.tier_counts.len(), 5);
        assert_eq!(summary.tier_counts[3].count, 0);
        assert_eq!(summary.top_picks[0].tier_label, Tier::One.label());
        assert_eq!(summary.missing_data[2].missing_count, 7);
    }
}
