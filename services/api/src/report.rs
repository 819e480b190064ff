use crate::infra::parse_date;
use chrono::{Local, NaiveDate};
use clap::Args;
use property_eval::config::AppConfig;
use property_eval::error::AppError;
use property_eval::ingest::ListingImporter;
use property_eval::evaluation::EvaluationEngine;
use property_eval::report::views::RankingReportSummary;
use property_eval::report::RankingReport;
use property_eval::telemetry;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct RankingReportArgs {
    /// Listing sheet export (CSV)
    pub(crate) listings: PathBuf,
    /// Reference price CSV or JSON, merged over the configured table
    #[arg(long)]
    pub(crate) references: Option<PathBuf>,
    /// Date used for days-on-market (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
}

pub(crate) fn run_ranking_report(args: RankingReportArgs) -> Result<(), AppError> {
    let RankingReportArgs {
        listings,
        references,
        as_of,
    } = args;

    let mut config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    if references.is_some() {
        config.engine.references_path = references;
    }

    let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());
    let engine = config.engine.build_engine()?.with_as_of(as_of);
    let summary = ranking_summary(&engine, &listings)?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

pub(crate) fn ranking_summary(
    engine: &EvaluationEngine,
    listings: &Path,
) -> Result<RankingReportSummary, AppError> {
    let records = ListingImporter::from_path(listings)?;
    info!(path = %listings.display(), listings = records.len(), "listing sheet loaded");
    let ranked = engine.evaluate_all(&records);
    Ok(RankingReport::build(&ranked).summary())
}
