use serde::Serialize;

use crate::evaluation::Tier;

#[derive(Debug, Clone, Serialize)]
pub struct TierCountEntry {
    pub tier: Tier,
    pub tier_label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertySnapshotView {
    pub address: String,
    pub neighborhood: String,
    pub link: String,
    pub tier: Tier,
    pub tier_label: &'static str,
    pub total_score: i32,
    pub price: f64,
    pub price_per_area: f64,
    pub total_needed: f64,
    pub difference: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_position: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MissingDataView {
    pub address: String,
    pub link: String,
    pub missing_count: usize,
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankingReportSummary {
    pub evaluated: usize,
    pub within_budget: usize,
    pub tier_counts: Vec<TierCountEntry>,
    pub top_picks: Vec<PropertySnapshotView>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_data: Vec<MissingDataView>,
}
