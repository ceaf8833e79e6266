//! Shared fixtures for integration tests.
//!
//! Builders are intentionally broad to support various scenarios across
//! different test files.

#![allow(dead_code)]

use chrono::NaiveDate;
use sipfolio::date_utils::add_months;
use sipfolio::models::{Plan, PricePoint, PriceSeries, PriceSource};

/// Install a test subscriber so `RUST_LOG=sipfolio=debug` surfaces
/// tracing output during test runs. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sipfolio=info".into()),
        )
        .try_init();
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A plain monthly plan with no top-up.
pub fn plan(start: NaiveDate, monthly_amount: f64) -> Plan {
    Plan {
        id: 1,
        symbol: "TESTFUND".into(),
        start_date: start,
        monthly_amount,
        auto_topup: false,
        topup_percentage: 0.0,
        is_active: true,
    }
}

/// A plan with an annual top-up percentage.
pub fn topup_plan(start: NaiveDate, monthly_amount: f64, topup_percentage: f64) -> Plan {
    Plan {
        auto_topup: true,
        topup_percentage,
        ..plan(start, monthly_amount)
    }
}

/// A market series with one point per month at a constant NAV.
pub fn flat_series(start: NaiveDate, months: i32, nav: f64) -> PriceSeries {
    let points = (0..=months)
        .map(|k| PricePoint {
            date: add_months(start, k),
            nav,
        })
        .collect();
    PriceSeries::new(points, PriceSource::Market)
}

/// A market series from explicit (date, nav) samples.
pub fn series_from(samples: &[(NaiveDate, f64)]) -> PriceSeries {
    PriceSeries::new(
        samples
            .iter()
            .map(|&(date, nav)| PricePoint { date, nav })
            .collect(),
        PriceSource::Market,
    )
}
