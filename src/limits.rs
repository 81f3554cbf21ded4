use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};
use crate::purchase::Purchase;
use crate::reports::spent_between;

/// monthly spending cap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendingLimit {
    pub year: i32,
    pub month: u32,
    pub limit: Money,
}

/// how much of a monthly limit has been used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitUsage {
    pub limit: Money,
    pub spent: Money,
    pub remaining: Money,
    pub utilization: Rate,
    pub exceeded: bool,
}

impl SpendingLimit {
    pub fn new(year: i32, month: u32, limit: Money) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(LedgerError::validation(format!("invalid month {}", month)));
        }
        if !limit.is_positive() {
            return Err(LedgerError::validation("limit must be positive"));
        }
        Ok(Self { year, month, limit })
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        self.first_day()?
            .checked_add_months(Months::new(1))?
            .pred_opt()
    }

    /// purchase amounts dated in this month count against the limit
    pub fn evaluate(&self, purchases: &[Purchase]) -> LimitUsage {
        let spent = match (self.first_day(), self.last_day()) {
            (Some(from), Some(to)) => spent_between(purchases, from, to),
            _ => Money::ZERO,
        };

        let usage = LimitUsage {
            limit: self.limit,
            spent,
            remaining: self.limit.saturating_sub(spent),
            utilization: spent.ratio_of(self.limit).unwrap_or(Rate::ZERO),
            exceeded: spent > self.limit,
        };

        if usage.exceeded {
            tracing::info!(
                year = self.year,
                month = self.month,
                limit = %self.limit,
                spent = %spent,
                "monthly spending limit exceeded"
            );
        }

        usage
    }
}
