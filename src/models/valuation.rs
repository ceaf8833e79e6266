use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::price::PriceSource;

/// One display point per contribution month: cumulative invested
/// capital and the NAV the contribution was matched against. Built for
/// charting only; the return math never reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartPoint {
    /// 0-based month index from the plan's start.
    pub month: usize,
    pub date: NaiveDate,
    pub invested: f64,
    pub nav: f64,
}

/// The complete result of valuing a plan against a price series.
///
/// All numeric fields are rounded to 2 decimal places at construction;
/// internal computation runs at full precision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationResult {
    pub current_value: f64,
    pub total_invested: f64,
    /// Absolute gain: `current_value - total_invested`.
    pub returns: f64,
    pub returns_percentage: f64,
    /// Annualized money-weighted return, percent.
    pub xirr: f64,
    /// False when the XIRR solver exhausted its budget; `xirr` is then a
    /// best-effort estimate rather than a converged figure.
    pub xirr_converged: bool,
    /// Compound annual growth rate, percent.
    pub cagr: f64,
    pub current_nav: f64,
    pub total_units: f64,
    /// Calendar-month difference between the plan start and the
    /// valuation date, inclusive of the starting month.
    pub months_invested: u32,
    pub last_nav_date: Option<NaiveDate>,
    /// Provenance of the series this valuation was computed against.
    pub price_source: PriceSource,
    pub chart_series: Vec<ChartPoint>,
}

impl ValuationResult {
    /// The well-formed zero result for a plan with no elapsed
    /// contributions yet.
    pub fn not_started(source: PriceSource) -> Self {
        Self {
            current_value: 0.0,
            total_invested: 0.0,
            returns: 0.0,
            returns_percentage: 0.0,
            xirr: 0.0,
            xirr_converged: true,
            cagr: 0.0,
            current_nav: 0.0,
            total_units: 0.0,
            months_invested: 0,
            last_nav_date: None,
            price_source: source,
            chart_series: Vec::new(),
        }
    }
}

/// Outcome of comparing a plan's return against a benchmark. A
/// too-short benchmark series degrades to an informational message with
/// `benchmark_return` unset; it never blocks the primary valuation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceCheck {
    pub is_underperforming: bool,
    pub plan_return: f64,
    pub benchmark_return: Option<f64>,
    /// `plan_return - benchmark_return`, when the benchmark is available.
    pub difference: Option<f64>,
    pub message: String,
}
