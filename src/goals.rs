use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};
use crate::types::GoalId;

/// a savings target tracked as a simple progress ratio
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub name: String,
    pub target_amount: Money,
    pub current_amount: Money,
    pub deadline: Option<NaiveDate>,
}

impl Goal {
    pub fn new(name: impl Into<String>, target_amount: Money, deadline: Option<NaiveDate>) -> Result<Self> {
        if !target_amount.is_positive() {
            return Err(LedgerError::validation("goal target must be positive"));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name: name.into(),
            target_amount,
            current_amount: Money::ZERO,
            deadline,
        })
    }

    /// add savings; returns true when this contribution reached the target
    pub fn contribute(&mut self, amount: Money) -> Result<bool> {
        if !amount.is_positive() {
            return Err(LedgerError::validation("amount must be positive"));
        }

        let was_reached = self.is_reached();
        self.current_amount += amount;
        Ok(!was_reached && self.is_reached())
    }

    /// fraction saved, capped at 100%
    pub fn progress(&self) -> Rate {
        self.current_amount
            .ratio_of(self.target_amount)
            .unwrap_or(Rate::ZERO)
            .clamp_unit()
    }

    pub fn remaining(&self) -> Money {
        self.target_amount.saturating_sub(self.current_amount)
    }

    pub fn is_reached(&self) -> bool {
        self.current_amount >= self.target_amount
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        matches!(self.deadline, Some(deadline) if today > deadline && !self.is_reached())
    }
}
