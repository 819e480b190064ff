use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use property_eval::config::AppConfig;
use property_eval::error::AppError;
use property_eval::evaluation::domain::fields;
use property_eval::evaluation::{
    CostBreakdown, EvaluatedProperty, EvaluationEngine, RawListingRecord, SimulationOverrides,
    Tier,
};
use property_eval::ingest::ListingImporter;
use property_eval::report::views::RankingReportSummary;
use property_eval::report::RankingReport;
use property_eval::telemetry;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "property-eval",
    about = "Rank listing sheets and run purchase-cost what-ifs for mortgage-backed buyers",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate and rank every listing in a sheet export
    Evaluate(EvaluateArgs),
    /// Purchase-cost breakdown for a price under negotiation and FX what-ifs
    Simulate(SimulateArgs),
    /// Largest price that fits the budget and the discount needed to reach it
    Discount(DiscountArgs),
    /// Print the effective evaluation settings as JSON
    Settings,
}

#[derive(Args, Debug)]
struct EvaluateArgs {
    /// Listing sheet export (CSV)
    listings: PathBuf,
    /// Reference price CSV or JSON, merged over the configured table
    #[arg(long)]
    references: Option<PathBuf>,
    /// Date used for days-on-market (defaults to today)
    #[arg(long, value_parser = parse_date)]
    as_of: Option<NaiveDate>,
    /// Emit the evaluated listings and report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct SimulateArgs {
    /// Asking price in USD
    #[arg(long)]
    price: f64,
    /// Negotiated discount off the asking price, in percent
    #[arg(long, default_value_t = 0.0)]
    negotiation: f64,
    /// FX rate override (local units per USD)
    #[arg(long)]
    fx: Option<f64>,
    /// Listing is sold by the owner, so no agency fee applies
    #[arg(long)]
    owner_direct: bool,
    /// Comma-separated negotiation percents to tabulate
    #[arg(long, value_delimiter = ',')]
    sweep: Vec<f64>,
}

#[derive(Args, Debug)]
struct DiscountArgs {
    /// Asking price in USD
    #[arg(long)]
    price: f64,
    /// FX rate override (local units per USD)
    #[arg(long)]
    fx: Option<f64>,
    /// Listing is sold by the owner, so no agency fee applies
    #[arg(long)]
    owner_direct: bool,
}

#[derive(Debug, Serialize)]
struct RankingOutput<'a> {
    evaluated: &'a [EvaluatedProperty],
    summary: RankingReportSummary,
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Evaluate(args) => {
            if args.references.is_some() {
                config.engine.references_path = args.references.clone();
            }
            run_evaluate(config.engine.build_engine()?, args)
        }
        Command::Simulate(args) => run_simulate(&config.engine.build_engine()?, args),
        Command::Discount(args) => run_discount(&config.engine.build_engine()?, args),
        Command::Settings => {
            let settings = config.engine.load_settings()?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(())
        }
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn check_fx(fx: Option<f64>) -> Result<Option<f64>, AppError> {
    match fx {
        Some(rate) if !(rate.is_finite() && rate > 0.0) => Err(AppError::InvalidRequest(format!(
            "--fx must be a positive number, got {rate}"
        ))),
        other => Ok(other),
    }
}

fn check_negotiation(percent: f64) -> Result<f64, AppError> {
    if (0.0..=100.0).contains(&percent) {
        Ok(percent)
    } else {
        Err(AppError::InvalidRequest(format!(
            "negotiation must be between 0 and 100, got {percent}"
        )))
    }
}

fn listing_at(price: f64, owner_direct: bool) -> RawListingRecord {
    let listing = RawListingRecord::new().with(fields::PRICE, format!("{price:.2}"));
    if owner_direct {
        listing.with(fields::AGENCY, "dueno directo")
    } else {
        listing
    }
}

fn run_evaluate(engine: EvaluationEngine, args: EvaluateArgs) -> Result<(), AppError> {
    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());
    let engine = engine.with_as_of(as_of);

    let records = ListingImporter::from_path(&args.listings)?;
    info!(path = %args.listings.display(), listings = records.len(), "listing sheet loaded");

    let ranked = engine.evaluate_all(&records);
    let report = RankingReport::build(&ranked);

    if args.json {
        let payload = RankingOutput {
            evaluated: &ranked,
            summary: report.summary(),
        };
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        render_ranking(&ranked, &report, as_of);
    }
    Ok(())
}

fn run_simulate(engine: &EvaluationEngine, args: SimulateArgs) -> Result<(), AppError> {
    let fx_rate = check_fx(args.fx)?;
    let negotiation = check_negotiation(args.negotiation)?;
    for percent in &args.sweep {
        check_negotiation(*percent)?;
    }

    let property = engine
        .evaluate(&listing_at(args.price, args.owner_direct))
        .property;
    let costs = engine.simulate(
        &property,
        SimulationOverrides {
            negotiation_percent: Some(negotiation),
            fx_rate,
        },
    );

    println!(
        "Price USD {:.0}, negotiation {negotiation}%, FX {:.2}",
        property.price,
        fx_rate.unwrap_or(engine.settings().fx_rate)
    );
    render_costs(&costs);

    let sweep = engine.negotiation_sweep(&property, &args.sweep, fx_rate);
    if !sweep.is_empty() {
        println!("\nNegotiation sweep");
        for point in &sweep {
            println!(
                "- {:>5.1}%: price {:.0}, needed {:.0}, difference {:+.0}{}",
                point.negotiation_percent,
                point.costs.effective_price,
                point.costs.total_needed,
                point.costs.difference,
                if point.costs.ok { "" } else { " (over budget)" }
            );
        }
    }
    Ok(())
}

fn run_discount(engine: &EvaluationEngine, args: DiscountArgs) -> Result<(), AppError> {
    let fx_rate = check_fx(args.fx)?;
    let property = engine
        .evaluate(&listing_at(args.price, args.owner_direct))
        .property;
    let solution = engine.solve_discount(&property, fx_rate);

    println!("Asking price: USD {:.0}", property.price);
    println!("Target price: USD {:.0}", solution.target_price);
    println!(
        "Discount needed: {:.1}% (USD {:.0})",
        solution.discount_percent,
        solution.discount_amount.max(0.0)
    );
    println!("Verdict: {}", solution.verdict().label());
    Ok(())
}

fn render_costs(costs: &CostBreakdown) {
    println!("- Effective price: {:.0}", costs.effective_price);
    println!("- Credit (USD): {:.0}", costs.credit_usd);
    println!("- Down payment: {:.0}", costs.down_payment);
    println!("- Notary: {:.0}", costs.notary);
    println!("- Stamp tax: {:.0}", costs.stamp_tax);
    println!("- Registry: {:.0}", costs.registry);
    println!("- Agency fee: {:.0}", costs.agency_fee);
    println!("- Mortgage tax: {:.0}", costs.mortgage_tax);
    println!("- Certificates: {:.0}", costs.certificate_fee);
    println!(
        "Total needed: {:.0} ({}, difference {:+.0})",
        costs.total_needed,
        if costs.ok { "within budget" } else { "over budget" },
        costs.difference
    );
}

fn render_ranking(ranked: &[EvaluatedProperty], report: &RankingReport, as_of: NaiveDate) {
    let summary = report.summary();

    println!("Listing ranking (evaluated {as_of})");
    println!(
        "{} listings, {} within budget",
        summary.evaluated, summary.within_budget
    );

    println!("\nTiers");
    for entry in &summary.tier_counts {
        println!("- {} {}: {}", entry.tier.number(), entry.tier_label, entry.count);
    }

    println!("\nRanking");
    for (position, item) in ranked.iter().enumerate() {
        let address = if item.property.address.is_empty() {
            "(no address)"
        } else {
            item.property.address.as_str()
        };
        println!(
            "{:>3}. [T{}] {:>4} pts  {} ({}), USD {:.0}, needs {:.0}, {} missing",
            position + 1,
            item.tier.tier.number(),
            item.total_score,
            address,
            item.property.neighborhood,
            item.property.price,
            item.costs.total_needed,
            item.missing_count
        );
        if let Some(reference) = &item.price_reference {
            println!(
                "       {} ({:+.1}% vs neighborhood)",
                reference.position.label(),
                reference.variance * 100.0
            );
        }
        for warning in &item.warnings {
            println!("       warning: {}", warning.summary());
        }
    }

    if summary.top_picks.is_empty() {
        println!("\nTop picks: none");
    } else {
        println!("\nTop picks");
        for pick in &summary.top_picks {
            println!("- {} ({}), {} pts", pick.address, pick.tier_label, pick.total_score);
        }
    }

    if !summary.missing_data.is_empty() {
        println!("\nListings to follow up");
        for entry in &summary.missing_data {
            println!(
                "- {}: {} missing ({})",
                entry.address,
                entry.missing_count,
                entry.missing.join(", ")
            );
        }
    }

    let discarded = ranked
        .iter()
        .filter(|item| item.tier.tier == Tier::Five)
        .count();
    if discarded > 0 {
        println!("\n{discarded} listing(s) discarded (no link or inactive)");
    }
}
