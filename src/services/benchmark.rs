use tracing::debug;

use crate::models::{PerformanceCheck, PriceSeries};
use crate::services::valuation::round2;

/// Simple holding-period return of a series, in percent: the change
/// between the first and last price, ignoring cash-flow timing. None
/// when the series has fewer than two points.
pub fn holding_period_return(series: &PriceSeries) -> Option<f64> {
    if series.len() < 2 {
        return None;
    }

    let first = series.first()?.nav;
    let last = series.last()?.nav;

    Some((last - first) / first * 100.0)
}

/// Compare a plan's money-weighted return against a benchmark series
/// covering the same window.
///
/// The tolerance band keeps ordinary noise from being flagged as
/// underperformance. A benchmark with fewer than two points degrades to
/// an informational message; it never blocks the primary valuation.
pub fn check_performance(
    plan_return_pct: f64,
    benchmark_series: &PriceSeries,
    tolerance_pct: f64,
) -> PerformanceCheck {
    let Some(benchmark_return) = holding_period_return(benchmark_series) else {
        debug!("Benchmark series too short for comparison");
        return PerformanceCheck {
            is_underperforming: false,
            plan_return: round2(plan_return_pct),
            benchmark_return: None,
            difference: None,
            message: "Benchmark unavailable: not enough price history for a comparison".into(),
        };
    };

    let difference = plan_return_pct - benchmark_return;
    let is_underperforming = plan_return_pct < benchmark_return - tolerance_pct;

    let message = if is_underperforming {
        format!(
            "Plan return {:.2}% trails the benchmark's {:.2}% by more than {:.2} points",
            plan_return_pct, benchmark_return, tolerance_pct
        )
    } else {
        format!(
            "Plan return {:.2}% is in line with the benchmark's {:.2}%",
            plan_return_pct, benchmark_return
        )
    };

    PerformanceCheck {
        is_underperforming,
        plan_return: round2(plan_return_pct),
        benchmark_return: Some(round2(benchmark_return)),
        difference: Some(round2(difference)),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PricePoint, PriceSource};
    use chrono::NaiveDate;

    fn series(navs: &[f64]) -> PriceSeries {
        let points = navs
            .iter()
            .enumerate()
            .map(|(i, &nav)| PricePoint {
                date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64 * 30),
                nav,
            })
            .collect();
        PriceSeries::new(points, PriceSource::Market)
    }

    #[test]
    fn test_holding_period_return() {
        let s = series(&[100.0, 104.0, 109.0]);
        assert!((holding_period_return(&s).unwrap() - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_underperformance_is_flagged() {
        // Plan at 5% against a 9% benchmark with the default 2-point band
        let check = check_performance(5.0, &series(&[100.0, 109.0]), 2.0);

        assert!(check.is_underperforming);
        assert_eq!(check.benchmark_return, Some(9.0));
        assert_eq!(check.difference, Some(-4.0));
    }

    #[test]
    fn test_within_tolerance_is_not_flagged() {
        let check = check_performance(8.0, &series(&[100.0, 109.0]), 2.0);

        assert!(!check.is_underperforming);
        assert_eq!(check.difference, Some(-1.0));
    }

    #[test]
    fn test_outperformance_is_not_flagged() {
        let check = check_performance(12.0, &series(&[100.0, 109.0]), 2.0);
        assert!(!check.is_underperforming);
    }

    #[test]
    fn test_short_benchmark_degrades_gracefully() {
        let check = check_performance(5.0, &series(&[100.0]), 2.0);

        assert!(!check.is_underperforming);
        assert_eq!(check.benchmark_return, None);
        assert_eq!(check.difference, None);
        assert!(check.message.contains("unavailable"));
    }
}
