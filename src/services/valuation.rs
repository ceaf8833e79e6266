use chrono::NaiveDate;
use tracing::debug;

use crate::date_utils::years_between;
use crate::error::{AppError, AppResult};
use crate::models::{ChartPoint, Plan, PricePoint, PriceSeries, ValuationResult};
use crate::services::schedule::{generate_contributions, ContributionEvent};
use crate::services::xirr::{calculate_cagr, solve_xirr, CashFlow};

/// Round a value to 2 decimal places for the result boundary. Internal
/// math stays full precision.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Find the price point closest to `target` by absolute day distance.
/// Ties break to the earlier point in series order. None only for an
/// empty series.
pub fn closest_point(series: &PriceSeries, target: NaiveDate) -> Option<&PricePoint> {
    let mut best: Option<(&PricePoint, i64)> = None;

    for point in series.points() {
        let distance = (point.date - target).num_days().abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((point, distance)),
        }
    }

    best.map(|(point, _)| point)
}

/// Units and capital accumulated by walking a contribution schedule
/// against matched prices.
#[derive(Debug, Clone, Default)]
pub struct Accumulation {
    pub total_invested: f64,
    pub total_units: f64,
    pub cash_flows: Vec<CashFlow>,
}

/// Convert contribution events into purchased units at the nearest
/// available price, tracking invested capital and the outflow ledger.
/// Units are never rounded mid-computation; only the result boundary
/// rounds.
pub fn accumulate_units(
    events: &[ContributionEvent],
    series: &PriceSeries,
) -> AppResult<Accumulation> {
    let mut acc = Accumulation::default();

    for event in events {
        let point = closest_point(series, event.date)
            .ok_or_else(|| AppError::InsufficientData("Price series is empty".into()))?;

        acc.total_invested += event.amount;
        acc.total_units += event.amount / point.nav;
        acc.cash_flows.push(CashFlow {
            date: event.date,
            amount: -event.amount,
        });
    }

    Ok(acc)
}

/// Value a plan against a price series as of `now`.
///
/// Pure and synchronous: all market data arrives as `series`, nothing
/// is fetched or persisted here, and identical inputs produce an
/// identical result. A plan with no elapsed contributions yields the
/// well-formed zero result; an empty price series with contributions
/// outstanding is a hard `InsufficientData` error.
pub fn compute_valuation(
    plan: &Plan,
    series: &PriceSeries,
    now: NaiveDate,
) -> AppResult<ValuationResult> {
    plan.validate()?;

    let events = generate_contributions(
        plan.start_date,
        now,
        plan.monthly_amount,
        plan.auto_topup,
        plan.topup_percentage,
    );

    if events.is_empty() {
        debug!(plan_id = plan.id, "Plan has no elapsed contributions yet");
        return Ok(ValuationResult::not_started(series.source()));
    }

    if series.is_empty() {
        return Err(AppError::InsufficientData(format!(
            "No price data for {}",
            plan.symbol
        )));
    }

    let months_invested = events.len() as u32;
    let Accumulation {
        total_invested,
        total_units,
        mut cash_flows,
    } = accumulate_units(&events, series)?;

    let latest = series
        .last()
        .ok_or_else(|| AppError::InsufficientData(format!("No price data for {}", plan.symbol)))?;
    let current_nav = latest.nav;
    let current_value = total_units * current_nav;

    // Terminal inflow: the mark-to-market value as of the valuation date
    cash_flows.push(CashFlow {
        date: now,
        amount: current_value,
    });

    let solution = solve_xirr(&cash_flows);
    let cagr = calculate_cagr(
        total_invested,
        current_value,
        years_between(plan.start_date, now),
    );

    let returns = current_value - total_invested;
    let returns_percentage = if total_invested > 0.0 {
        returns / total_invested * 100.0
    } else {
        0.0
    };

    let chart_series = build_chart_series(&events, series);

    Ok(ValuationResult {
        current_value: round2(current_value),
        total_invested: round2(total_invested),
        returns: round2(returns),
        returns_percentage: round2(returns_percentage),
        xirr: round2(solution.rate * 100.0),
        xirr_converged: solution.converged,
        cagr: round2(cagr),
        current_nav: round2(current_nav),
        total_units: round2(total_units),
        months_invested,
        last_nav_date: Some(latest.date),
        price_source: series.source(),
        chart_series,
    })
}

/// One chart point per contribution month: cumulative invested capital
/// and the NAV the contribution was matched against.
fn build_chart_series(events: &[ContributionEvent], series: &PriceSeries) -> Vec<ChartPoint> {
    let mut invested = 0.0;

    events
        .iter()
        .filter_map(|event| {
            let point = closest_point(series, event.date)?;
            invested += event.amount;
            Some(ChartPoint {
                month: event.index,
                date: event.date,
                invested: round2(invested),
                nav: round2(point.nav),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PricePoint, PriceSource};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn series(points: &[(NaiveDate, f64)]) -> PriceSeries {
        PriceSeries::new(
            points
                .iter()
                .map(|&(date, nav)| PricePoint { date, nav })
                .collect(),
            PriceSource::Market,
        )
    }

    #[test]
    fn test_closest_point_prefers_earlier_on_tie() {
        // Points at day 0 and day 2, target at day 1: the day-0 point wins
        let s = series(&[(date(2024, 1, 1), 100.0), (date(2024, 1, 3), 200.0)]);

        let hit = closest_point(&s, date(2024, 1, 2)).unwrap();
        assert_eq!(hit.date, date(2024, 1, 1));
        assert_eq!(hit.nav, 100.0);
    }

    #[test]
    fn test_closest_point_exact_match() {
        let s = series(&[
            (date(2024, 1, 1), 100.0),
            (date(2024, 2, 1), 110.0),
            (date(2024, 3, 1), 120.0),
        ]);

        let hit = closest_point(&s, date(2024, 2, 1)).unwrap();
        assert_eq!(hit.nav, 110.0);
    }

    #[test]
    fn test_closest_point_empty_series() {
        let s = PriceSeries::empty(PriceSource::Market);
        assert!(closest_point(&s, date(2024, 1, 1)).is_none());
    }

    #[test]
    fn test_accumulate_units_sums_exactly() {
        let events = generate_contributions(date(2023, 1, 1), date(2023, 7, 1), 300.0, false, 0.0);
        let s = series(&[(date(2023, 1, 1), 10.0), (date(2023, 4, 1), 20.0)]);

        let acc = accumulate_units(&events, &s).unwrap();

        let expected: f64 = events.iter().map(|e| e.amount).sum();
        assert_eq!(acc.total_invested, expected);
        assert_eq!(acc.cash_flows.len(), events.len());
        assert!(acc.cash_flows.iter().all(|cf| cf.amount == -300.0));
        assert!(acc.total_units > 0.0);
    }
}
