use std::io::Cursor;
use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::evaluation::{
    CostBreakdown, DiscountSolution, DiscountVerdict, EvaluatedProperty, EvaluationEngine,
    NormalizedProperty, RawListingRecord, SimulationOverrides, SimulationPoint,
};
use crate::ingest::ListingImporter;
use crate::report::views::RankingReportSummary;
use crate::report::RankingReport;

/// Router exposing batch evaluation, what-if simulation and the discount solver.
pub fn evaluation_router(engine: Arc<EvaluationEngine>) -> Router {
    Router::new()
        .route("/api/v1/evaluations", post(evaluations_handler))
        .route("/api/v1/simulations", post(simulations_handler))
        .route("/api/v1/discounts", post(discounts_handler))
        .with_state(engine)
}

#[derive(Debug, Default, Deserialize)]
pub struct EvaluationRequest {
    #[serde(default)]
    pub listings: Vec<RawListingRecord>,
    /// Raw sheet export, appended after `listings`.
    #[serde(default)]
    pub listings_csv: Option<String>,
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct EvaluationResponse {
    pub evaluated: Vec<EvaluatedProperty>,
    pub summary: RankingReportSummary,
}

#[derive(Debug, Deserialize)]
pub struct SimulationRequest {
    pub listing: RawListingRecord,
    #[serde(default)]
    pub negotiation_percent: Option<f64>,
    #[serde(default)]
    pub fx_rate: Option<f64>,
    #[serde(default)]
    pub sweep: Vec<f64>,
}

#[derive(Debug, Serialize)]
pub struct SimulationResponse {
    pub property: NormalizedProperty,
    pub base: CostBreakdown,
    pub simulated: CostBreakdown,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sweep: Vec<SimulationPoint>,
}

#[derive(Debug, Deserialize)]
pub struct DiscountRequest {
    pub listing: RawListingRecord,
    #[serde(default)]
    pub fx_rate: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct DiscountResponse {
    pub price: f64,
    pub has_agency_fee: bool,
    pub solution: DiscountSolution,
    pub verdict: DiscountVerdict,
    pub verdict_label: &'static str,
}

pub(crate) async fn evaluations_handler(
    State(engine): State<Arc<EvaluationEngine>>,
    Json(request): Json<EvaluationRequest>,
) -> Result<Json<EvaluationResponse>, AppError> {
    let EvaluationRequest {
        mut listings,
        listings_csv,
        as_of,
    } = request;

    if let Some(csv) = listings_csv {
        listings.extend(ListingImporter::from_reader(Cursor::new(csv.into_bytes()))?);
    }
    if listings.is_empty() {
        return Err(AppError::InvalidRequest(
            "provide at least one listing".to_string(),
        ));
    }

    let evaluated = match as_of {
        Some(date) => EvaluationEngine::clone(&engine)
            .with_as_of(date)
            .evaluate_all(&listings),
        None => engine.evaluate_all(&listings),
    };
    let summary = RankingReport::build(&evaluated).summary();

    Ok(Json(EvaluationResponse { evaluated, summary }))
}

pub(crate) async fn simulations_handler(
    State(engine): State<Arc<EvaluationEngine>>,
    Json(request): Json<SimulationRequest>,
) -> Result<Json<SimulationResponse>, AppError> {
    let fx_rate = check_fx_rate(request.fx_rate)?;
    if let Some(percent) = request.negotiation_percent {
        check_negotiation(percent)?;
    }
    for percent in &request.sweep {
        check_negotiation(*percent)?;
    }

    let evaluated = engine.evaluate(&request.listing);
    let simulated = engine.simulate(
        &evaluated.property,
        SimulationOverrides {
            negotiation_percent: request.negotiation_percent,
            fx_rate,
        },
    );
    let sweep = engine.negotiation_sweep(&evaluated.property, &request.sweep, fx_rate);

    Ok(Json(SimulationResponse {
        property: evaluated.property,
        base: evaluated.costs,
        simulated,
        sweep,
    }))
}

pub(crate) async fn discounts_handler(
    State(engine): State<Arc<EvaluationEngine>>,
    Json(request): Json<DiscountRequest>,
) -> Result<Json<DiscountResponse>, AppError> {
    let fx_rate = check_fx_rate(request.fx_rate)?;

    let evaluated = engine.evaluate(&request.listing);
    let solution = engine.solve_discount(&evaluated.property, fx_rate);
    let verdict = solution.verdict();

    Ok(Json(DiscountResponse {
        price: evaluated.property.price,
        has_agency_fee: evaluated.property.has_agency_fee,
        solution,
        verdict,
        verdict_label: verdict.label(),
    }))
}

fn check_fx_rate(fx_rate: Option<f64>) -> Result<Option<f64>, AppError> {
    match fx_rate {
        Some(rate) if !(rate.is_finite() && rate > 0.0) => Err(AppError::InvalidRequest(format!(
            "fx_rate must be a positive number, got {rate}"
        ))),
        other => Ok(other),
    }
}

fn check_negotiation(percent: f64) -> Result<(), AppError> {
    if (0.0..=100.0).contains(&percent) {
        Ok(())
    } else {
        Err(AppError::InvalidRequest(format!(
            "negotiation_percent must be between 0 and 100, got {percent}"
        )))
    }
}
