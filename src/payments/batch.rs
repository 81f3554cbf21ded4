use std::collections::HashSet;

use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::purchase::Purchase;
use crate::types::{PaymentMethod, PurchaseId};

use super::{AllocatedPayment, PaymentAllocator, PaymentRequest};

/// result of distributing one lump payment over several purchases
#[derive(Debug, Clone, PartialEq)]
pub struct BatchAllocation {
    pub total: Money,
    /// one entry per purchase that received money, in allocation order
    pub allocations: Vec<AllocatedPayment>,
    /// selected purchases that received nothing
    pub untouched: Vec<PurchaseId>,
}

impl BatchAllocation {
    pub fn allocated_total(&self) -> Money {
        self.allocations.iter().map(|a| a.amount()).sum()
    }

    pub fn amount_for(&self, purchase_id: PurchaseId) -> Money {
        self.allocations
            .iter()
            .find(|a| a.purchase.id == purchase_id)
            .map(|a| a.amount())
            .unwrap_or(Money::ZERO)
    }
}

/// distributes a payment across purchases, largest remaining balance first
#[derive(Debug, Clone, Default)]
pub struct BatchAllocator {
    allocator: PaymentAllocator,
}

impl BatchAllocator {
    pub fn new(allocator: PaymentAllocator) -> Self {
        Self { allocator }
    }

    /// compute every allocation in memory. nothing is returned unless all of
    /// them succeed.
    pub fn allocate(
        &self,
        selected: &[Purchase],
        total: Money,
        method: PaymentMethod,
        date: NaiveDate,
        time_provider: &SafeTimeProvider,
    ) -> Result<BatchAllocation> {
        if selected.is_empty() {
            return Err(LedgerError::validation("no purchases selected"));
        }

        let mut seen = HashSet::with_capacity(selected.len());
        if !selected.iter().all(|p| seen.insert(p.id)) {
            return Err(LedgerError::validation("duplicate purchase in selection"));
        }

        if !total.is_positive() {
            return Err(LedgerError::validation("amount must be positive"));
        }

        let total_remaining: Money = selected.iter().map(|p| p.remaining_amount()).sum();
        if total > total_remaining {
            tracing::warn!(%total, %total_remaining, "batch payment rejected");
            return Err(LedgerError::validation("amount exceeds total remaining"));
        }

        let mut ordered: Vec<&Purchase> = selected.iter().collect();
        ordered.sort_by(|a, b| {
            b.remaining_amount()
                .cmp(&a.remaining_amount())
                .then_with(|| a.id.cmp(&b.id))
        });

        let mut budget = total;
        let mut allocations = Vec::new();
        let mut untouched = Vec::new();

        for purchase in ordered {
            let share = budget.min(purchase.remaining_amount());
            if share.is_zero() {
                untouched.push(purchase.id);
                continue;
            }

            let request = PaymentRequest::new(share, method, date);
            let allocated = self.allocator.apply(purchase, &request, time_provider)?;
            budget -= share;
            allocations.push(allocated);
        }

        tracing::debug!(
            %total,
            touched = allocations.len(),
            untouched = untouched.len(),
            "batch allocated"
        );

        Ok(BatchAllocation {
            total,
            allocations,
            untouched,
        })
    }
}
