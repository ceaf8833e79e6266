use chrono::NaiveDate;
use rand::Rng;
use tracing::info;

use crate::config::Config;
use crate::date_utils::{add_months, months_between};
use crate::models::{PricePoint, PriceSeries, PriceSource};

/// Synthesize an emergency price series for when no market data is
/// available.
///
/// One point per elapsed month between `start` and `end` (inclusive of
/// both endpoints): a fixed base NAV compounding the configured annual
/// growth rate monthly, with bounded multiplicative noise so the curve
/// is not perfectly flat. The noise never feeds back into the trend,
/// so the underlying compounding stays monotonic.
///
/// The noise source is injected: production callers pass a thread rng,
/// tests pass a seeded one. The result is tagged
/// `PriceSource::Synthetic` so the growth assumption stays
/// distinguishable from real market data downstream.
pub fn synthesize_fallback_series<R: Rng>(
    start: NaiveDate,
    end: NaiveDate,
    config: &Config,
    rng: &mut R,
) -> PriceSeries {
    let months = months_between(start, end).max(0) as usize;
    let monthly_growth = (1.0 + config.fallback_annual_growth_pct / 100.0).powf(1.0 / 12.0);
    let amplitude = config.fallback_noise_amplitude;

    let mut trend = config.fallback_base_nav;
    let mut points = Vec::with_capacity(months + 1);

    for k in 0..=months {
        let noise = if amplitude > 0.0 {
            rng.gen_range(-amplitude..=amplitude)
        } else {
            0.0
        };
        points.push(PricePoint {
            date: add_months(start, k as i32),
            nav: trend * (1.0 + noise),
        });
        trend *= monthly_growth;
    }

    info!(
        point_count = points.len(),
        %start,
        %end,
        "Synthesized fallback price series"
    );

    PriceSeries::new(points, PriceSource::Synthetic)
}
