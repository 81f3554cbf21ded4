use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};

/// one monthly installment of a credit payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    pub number: u8,
    pub due_date: NaiveDate,
    pub amount: Money,
}

/// monthly installment schedule for a credit payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentPlan {
    pub total: Money,
    pub installments: Vec<Installment>,
}

impl InstallmentPlan {
    /// split `total` into `count` monthly installments starting at `first_due`.
    /// leftover cents go to the earliest installments so the sum is exact.
    /// every installment is at least one cent.
    pub fn split(total: Money, count: u8, first_due: NaiveDate) -> Result<Self> {
        if count == 0 {
            return Err(LedgerError::validation("installments must be at least 1"));
        }
        if !total.is_positive() {
            return Err(LedgerError::validation("amount must be positive"));
        }

        let cents = total.to_cents();
        if cents < count as i64 {
            return Err(LedgerError::validation(format!(
                "amount too small for {} installments",
                count
            )));
        }
        let base = cents / count as i64;
        let leftover = cents % count as i64;

        let mut installments = Vec::with_capacity(count as usize);
        for i in 0..count {
            let due_date = first_due
                .checked_add_months(Months::new(i as u32))
                .ok_or_else(|| LedgerError::validation("installment date out of range"))?;
            let extra = if (i as i64) < leftover { 1 } else { 0 };

            installments.push(Installment {
                number: i + 1,
                due_date,
                amount: Money::from_cents(base + extra),
            });
        }

        Ok(Self { total, installments })
    }

    pub fn len(&self) -> usize {
        self.installments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.installments.is_empty()
    }

    /// installments still due on or after `date`
    pub fn due_from(&self, date: NaiveDate) -> impl Iterator<Item = &Installment> {
        self.installments.iter().filter(move |i| i.due_date >= date)
    }
}
