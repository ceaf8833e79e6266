use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// A periodic investment plan: a fixed monthly contribution into a
/// tradable instrument, optionally stepped up once per completed year.
///
/// Plans are owned by the calling layer; the valuation core only reads
/// them. A start date in the future is a normal transient state, not a
/// validation failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub id: i64,
    pub symbol: String,
    pub start_date: NaiveDate,
    pub monthly_amount: f64,
    pub auto_topup: bool,
    pub topup_percentage: f64,
    pub is_active: bool,
}

impl Plan {
    /// Check the invariants a plan must satisfy before valuation.
    pub fn validate(&self) -> AppResult<()> {
        if self.symbol.trim().is_empty() {
            return Err(AppError::Validation(
                "Plan symbol must not be empty".into(),
            ));
        }
        if !self.monthly_amount.is_finite() || self.monthly_amount <= 0.0 {
            return Err(AppError::Validation(format!(
                "Monthly amount must be positive, got {}",
                self.monthly_amount
            )));
        }
        if !self.topup_percentage.is_finite() || self.topup_percentage < 0.0 {
            return Err(AppError::Validation(format!(
                "Top-up percentage must not be negative, got {}",
                self.topup_percentage
            )));
        }
        Ok(())
    }
}
