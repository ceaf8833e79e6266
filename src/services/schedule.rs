use chrono::NaiveDate;
use tracing::debug;

use crate::date_utils::{add_months, months_between};

/// A single scheduled contribution. Events are generated for the
/// duration of one valuation and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ContributionEvent {
    /// 0-based month index from the plan's start.
    pub index: usize,
    pub date: NaiveDate,
    pub amount: f64,
}

/// Expand a plan's cadence into individual contribution events up to `now`.
///
/// The event count is the calendar-month difference between `start_date`
/// and `now` (year*12+month arithmetic, never day-count division), with
/// event 0 falling on the start date itself. With `auto_topup` set the
/// amount steps up by `topup_percentage` at each completed year and the
/// step compounds: event `k` pays
/// `monthly_amount * (1 + topup_percentage/100)^(k / 12)`.
///
/// Returns an empty vector when the plan has not started yet (or started
/// within the current month); callers treat that as "no valuation
/// possible yet", not as an error.
pub fn generate_contributions(
    start_date: NaiveDate,
    now: NaiveDate,
    monthly_amount: f64,
    auto_topup: bool,
    topup_percentage: f64,
) -> Vec<ContributionEvent> {
    let elapsed_months = months_between(start_date, now);
    if elapsed_months <= 0 {
        debug!(%start_date, %now, "Plan has no elapsed months");
        return Vec::new();
    }

    let step_factor = 1.0 + topup_percentage / 100.0;

    (0..elapsed_months as usize)
        .map(|k| {
            let amount = if auto_topup {
                monthly_amount * step_factor.powi((k / 12) as i32)
            } else {
                monthly_amount
            };
            ContributionEvent {
                index: k,
                date: add_months(start_date, k as i32),
                amount,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_event_count_and_dates() {
        let events = generate_contributions(date(2023, 1, 1), date(2024, 1, 1), 5000.0, false, 0.0);

        assert_eq!(events.len(), 12);
        assert_eq!(events[0].date, date(2023, 1, 1));
        assert_eq!(events[11].date, date(2023, 12, 1));
        assert!(events.iter().all(|e| e.amount == 5000.0));
    }

    #[test]
    fn test_not_started_is_empty() {
        let events = generate_contributions(date(2025, 6, 1), date(2024, 1, 1), 5000.0, false, 0.0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_same_month_is_empty() {
        let events = generate_contributions(date(2024, 1, 1), date(2024, 1, 15), 5000.0, false, 0.0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_topup_steps_up_each_completed_year() {
        // 25 months at 1000/month with a 10% annual step-up
        let events =
            generate_contributions(date(2022, 1, 1), date(2024, 2, 1), 1000.0, true, 10.0);
        assert_eq!(events.len(), 25);

        // Year 1 pays the base amount
        assert_eq!(events[0].amount, 1000.0);
        assert_eq!(events[11].amount, 1000.0);

        // Year 2 pays the stepped amount, year 3 the compounded one
        assert!((events[12].amount - 1100.0).abs() < 1e-9);
        assert!((events[23].amount - 1100.0).abs() < 1e-9);
        assert!((events[24].amount - 1210.0).abs() < 1e-9);
    }

    #[test]
    fn test_topup_disabled_ignores_percentage() {
        let events =
            generate_contributions(date(2022, 1, 1), date(2024, 2, 1), 1000.0, false, 10.0);
        assert!(events.iter().all(|e| e.amount == 1000.0));
    }

    #[test]
    fn test_month_end_start_date_clamps() {
        let events = generate_contributions(date(2023, 1, 31), date(2023, 6, 1), 100.0, false, 0.0);
        assert_eq!(events.len(), 5);
        assert_eq!(events[1].date, date(2023, 2, 28));
        assert_eq!(events[2].date, date(2023, 3, 31));
    }
}
