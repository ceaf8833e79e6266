use chrono::NaiveDate;
use tracing::debug;

/// A cash flow with a date and amount.
///
/// Negative amounts are capital out of the investor's pocket
/// (contributions); positive amounts are value coming back, including
/// the final mark-to-market value of the holdings.
#[derive(Debug, Clone)]
pub struct CashFlow {
    pub date: NaiveDate,
    pub amount: f64,
}

/// Outcome of the money-weighted return solve.
///
/// `converged` is false when both Newton-Raphson and the bisection
/// fallback exhausted their budgets; `rate` then holds the best
/// estimate reached and callers should not present it as exact.
#[derive(Debug, Clone, Copy)]
pub struct XirrSolution {
    /// Annualized rate as a fraction (0.10 = 10%).
    pub rate: f64,
    pub converged: bool,
}

const INITIAL_GUESS: f64 = 0.10;
const MAX_ITERATIONS: usize = 100;
const TOLERANCE: f64 = 1e-4;
/// Newton steps are clamped to this range so a near-zero derivative
/// cannot launch the iterate out of the solvable region.
const RATE_MIN: f64 = -0.99;
const RATE_MAX: f64 = 100.0;
const DERIVATIVE_FLOOR: f64 = 1e-10;
/// Coarse grid step and upper bound for the bisection bracket scan.
const BRACKET_STEP: f64 = 0.25;
const BRACKET_MAX: f64 = 10.0;

/// Solve for the annualized money-weighted rate of return (XIRR) of a
/// cash-flow ledger using Newton-Raphson.
///
/// Finds the rate `r` with `sum(cf.amount / (1+r)^t) = 0`, where `t` is
/// the year fraction (days / 365) from the first cash flow's date.
/// Fewer than two cash flows is a defined degenerate case: rate 0.
///
/// If Newton-Raphson exhausts its iteration budget, a bisection pass
/// over a sign-changing bracket of the NPV is tried before giving up;
/// a ledger with no bracket yields the last Newton iterate with
/// `converged` unset.
pub fn solve_xirr(cash_flows: &[CashFlow]) -> XirrSolution {
    if cash_flows.len() < 2 {
        return XirrSolution {
            rate: 0.0,
            converged: true,
        };
    }

    // The ledger is ordered, so the first cash flow is the time origin
    let origin = cash_flows[0].date;
    let mut rate = INITIAL_GUESS;

    for _ in 0..MAX_ITERATIONS {
        let (npv, derivative) = npv_and_derivative(cash_flows, origin, rate);

        if derivative.abs() < DERIVATIVE_FLOOR {
            break;
        }

        // Convergence is judged on the raw step; a step truncated by the
        // clamp must not read as convergence at the boundary
        let next = rate - npv / derivative;

        if (next - rate).abs() < TOLERANCE {
            return XirrSolution {
                rate: next.clamp(RATE_MIN, RATE_MAX),
                converged: true,
            };
        }

        rate = next.clamp(RATE_MIN, RATE_MAX);
    }

    if let Some(bracketed) = bisect(cash_flows, origin) {
        return XirrSolution {
            rate: bracketed,
            converged: true,
        };
    }

    debug!(rate, "XIRR solver did not converge, returning best estimate");
    XirrSolution {
        rate,
        converged: false,
    }
}

/// NPV of the ledger at `rate`, and its derivative with respect to rate.
fn npv_and_derivative(cash_flows: &[CashFlow], origin: NaiveDate, rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut derivative = 0.0;

    for cf in cash_flows {
        let years = (cf.date - origin).num_days() as f64 / 365.0;

        npv += cf.amount * (1.0 + rate).powf(-years);

        // d/dr [amount * (1+r)^(-t)] = -t * amount * (1+r)^(-t-1)
        derivative -= years * cf.amount * (1.0 + rate).powf(-years - 1.0);
    }

    (npv, derivative)
}

/// Bisection fallback: scan a coarse rate grid for a sign change of the
/// NPV, then halve the bracket until it is tighter than the solver
/// tolerance. Returns None when no bracket exists.
fn bisect(cash_flows: &[CashFlow], origin: NaiveDate) -> Option<f64> {
    let mut lo = RATE_MIN;
    let mut npv_lo = npv_and_derivative(cash_flows, origin, lo).0;
    let mut bracket = None;

    let mut hi = lo + BRACKET_STEP;
    while hi <= BRACKET_MAX {
        let npv_hi = npv_and_derivative(cash_flows, origin, hi).0;
        if npv_lo * npv_hi <= 0.0 {
            bracket = Some((lo, hi));
            break;
        }
        lo = hi;
        npv_lo = npv_hi;
        hi += BRACKET_STEP;
    }

    let (mut lo, mut hi) = bracket?;
    let mut npv_lo = npv_and_derivative(cash_flows, origin, lo).0;

    while hi - lo > TOLERANCE {
        let mid = (lo + hi) / 2.0;
        let npv_mid = npv_and_derivative(cash_flows, origin, mid).0;
        if npv_lo * npv_mid <= 0.0 {
            hi = mid;
        } else {
            lo = mid;
            npv_lo = npv_mid;
        }
    }

    Some((lo + hi) / 2.0)
}

/// Point-to-point compound annual growth rate, in percent:
/// `((end/start)^(1/years) - 1) * 100`.
///
/// Defined as 0 when either value is non-positive or no time has
/// elapsed; these are legitimate "not enough history yet" states, not
/// errors.
pub fn calculate_cagr(start_value: f64, end_value: f64, years: f64) -> f64 {
    if start_value <= 0.0 || end_value <= 0.0 || years <= 0.0 {
        return 0.0;
    }

    ((end_value / start_value).powf(1.0 / years) - 1.0) * 100.0
}
