//! Property evaluation engine: tiers, weighted scores, purchase-cost breakdowns,
//! negotiation what-ifs and the reverse discount solver for mortgage-backed buyers.

pub mod config;
pub mod error;
pub mod evaluation;
pub mod ingest;
pub mod report;
pub mod router;
pub mod telemetry;

pub use evaluation::{EvaluatedProperty, EvaluationEngine, EvaluationSettings};
pub use router::evaluation_router;
