use chrono::{DateTime, Months, NaiveDate, Utc};
use hourglass_rs::{SafeTimeProvider, TimeSource};

use crate::config::LedgerConfig;
use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::events::{Event, EventStore};
use crate::goals::Goal;
use crate::limits::{LimitUsage, SpendingLimit};
use crate::payments::{
    project_status, AllocatedPayment, BatchAllocator, InstallmentPlan, PaymentAllocator,
    PaymentRequest,
};
use crate::purchase::Purchase;
use crate::reports::LedgerSummary;
use crate::storage::PurchaseStore;
use crate::types::{GoalId, PaymentMethod, PurchaseId, PurchaseStatus, Store, StoreId};

/// purchase ledger backed by a purchase store.
///
/// mutations take `&mut self`, so one ledger applies its payments one at a
/// time. ledgers sharing a backend are kept apart by the store's version
/// checks.
pub struct Ledger<S: PurchaseStore> {
    config: LedgerConfig,
    store: S,
    allocator: PaymentAllocator,
    batch: BatchAllocator,
    time: SafeTimeProvider,
    pub events: EventStore,
}

impl<S: PurchaseStore> Ledger<S> {
    /// create a ledger using the system clock
    pub fn new(config: LedgerConfig, store: S) -> Result<Self> {
        Self::with_time(config, store, SafeTimeProvider::new(TimeSource::System))
    }

    /// create a ledger with an explicit time provider
    pub fn with_time(config: LedgerConfig, store: S, time: SafeTimeProvider) -> Result<Self> {
        config.validate()?;
        let allocator = PaymentAllocator::new(config.max_installments);

        Ok(Self {
            config,
            store,
            batch: BatchAllocator::new(allocator.clone()),
            allocator,
            time,
            events: EventStore::new(),
        })
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn now(&self) -> DateTime<Utc> {
        self.time.now()
    }

    /// format an amount in the configured currency
    pub fn format_money(&self, amount: Money) -> String {
        amount.format_currency(&self.config.currency)
    }

    /// derive a status from monetary fields
    pub fn project_status(amount: Money, paid_amount: Money) -> PurchaseStatus {
        project_status(amount, paid_amount)
    }

    // stores

    pub fn register_store(&mut self, name: impl Into<String>) -> Result<Store> {
        let store = Store::new(name, self.now());
        self.store.write_store(&store)?;
        tracing::info!(store_id = %store.id, name = %store.name, "store registered");
        Ok(store)
    }

    pub fn stores(&self) -> Result<Vec<Store>> {
        self.store.list_stores()
    }

    // purchases

    /// record a new unpaid purchase at a registered store
    pub fn register_purchase(
        &mut self,
        store_id: StoreId,
        description: impl Into<String>,
        amount: Money,
        purchase_date: NaiveDate,
    ) -> Result<Purchase> {
        if let Err(err) = self.store.read_store(store_id) {
            tracing::warn!(%store_id, error = %err, "purchase rejected");
            return Err(err);
        }

        let now = self.now();
        let purchase = Purchase::new(store_id, description, amount, purchase_date, now)?;
        self.store.write_purchase(&purchase)?;

        self.events.emit(Event::PurchaseRegistered {
            purchase_id: purchase.id,
            store_id,
            amount,
            timestamp: now,
        });
        tracing::info!(purchase_id = %purchase.id, %amount, "purchase registered");

        Ok(purchase)
    }

    pub fn purchase(&self, id: PurchaseId) -> Result<Purchase> {
        self.store.read_purchase(id)
    }

    /// open purchases of a store, oldest first
    pub fn pending_purchases(&self, store_id: StoreId) -> Result<Vec<Purchase>> {
        let mut open: Vec<Purchase> = self
            .store
            .list_purchases()?
            .into_iter()
            .filter(|p| p.store_id == store_id && p.status().is_open())
            .collect();
        open.sort_by(|a, b| a.purchase_date.cmp(&b.purchase_date).then_with(|| a.id.cmp(&b.id)));
        Ok(open)
    }

    // payments

    /// apply a single payment to one purchase
    pub fn apply_payment(
        &mut self,
        purchase_id: PurchaseId,
        amount: Money,
        method: PaymentMethod,
        date: NaiveDate,
    ) -> Result<Purchase> {
        let request = PaymentRequest::new(amount, method, date);
        self.apply_request(purchase_id, &request)
    }

    /// apply a credit payment split into monthly installments, the first one
    /// due a month after `date`. the plan is built before anything is
    /// stored, so a plan that cannot be built leaves the purchase unchanged.
    pub fn apply_credit_payment(
        &mut self,
        purchase_id: PurchaseId,
        amount: Money,
        date: NaiveDate,
        installments: u8,
    ) -> Result<(Purchase, InstallmentPlan)> {
        let request = PaymentRequest::credit(amount, date, installments);

        let plan = date
            .checked_add_months(Months::new(1))
            .ok_or_else(|| LedgerError::validation("installment date out of range"))
            .and_then(|first_due| InstallmentPlan::split(amount, installments, first_due));
        let plan = match plan {
            Ok(plan) => plan,
            Err(err) => {
                self.record_rejection(Some(purchase_id), amount, &err);
                return Err(err);
            }
        };

        let updated = self.apply_request(purchase_id, &request)?;
        Ok((updated, plan))
    }

    fn apply_request(&mut self, purchase_id: PurchaseId, request: &PaymentRequest) -> Result<Purchase> {
        let current = self.store.read_purchase(purchase_id)?;

        let allocated = match self.allocator.apply(&current, request, &self.time) {
            Ok(allocated) => allocated,
            Err(err) => {
                self.record_rejection(Some(purchase_id), request.amount, &err);
                return Err(err);
            }
        };

        let changes = [allocated];
        self.commit(&changes)?;

        let [allocated] = changes;
        self.record_applied(&current, &allocated);
        tracing::info!(
            %purchase_id,
            amount = %request.amount,
            method = %request.method,
            remaining = %allocated.purchase.remaining_amount(),
            "payment applied"
        );

        Ok(allocated.purchase)
    }

    /// distribute one payment across several purchases, largest remaining
    /// balance first. returns the purchases that received money.
    pub fn apply_batch_payment(
        &mut self,
        purchase_ids: &[PurchaseId],
        total: Money,
        method: PaymentMethod,
        date: NaiveDate,
    ) -> Result<Vec<Purchase>> {
        let selected = purchase_ids
            .iter()
            .map(|id| self.store.read_purchase(*id))
            .collect::<Result<Vec<_>>>()?;

        let now = self.now();
        let batch = match self.batch.allocate(&selected, total, method, date, &self.time) {
            Ok(batch) => batch,
            Err(err) => {
                self.record_rejection(None, total, &err);
                return Err(err);
            }
        };

        self.commit(&batch.allocations)?;

        for allocated in &batch.allocations {
            if let Some(before) = selected.iter().find(|p| p.id == allocated.purchase.id) {
                self.record_applied(before, allocated);
            }
        }

        let paid: Vec<PurchaseId> = batch.allocations.iter().map(|a| a.purchase.id).collect();
        self.events.emit(Event::BatchPaymentApplied {
            total,
            purchases_paid: paid,
            timestamp: now,
        });
        tracing::info!(
            %total,
            %method,
            purchases = batch.allocations.len(),
            skipped = batch.untouched.len(),
            "batch payment applied"
        );

        Ok(batch.allocations.into_iter().map(|a| a.purchase).collect())
    }

    fn commit(&mut self, changes: &[AllocatedPayment]) -> Result<()> {
        if let Err(err) = self.store.commit(changes) {
            tracing::warn!(changes = changes.len(), error = %err, "failed to persist payments");
            return Err(err);
        }
        Ok(())
    }

    fn record_rejection(&mut self, purchase_id: Option<PurchaseId>, amount: Money, err: &LedgerError) {
        self.events.emit(Event::PaymentRejected {
            purchase_id,
            amount,
            reason: err.to_string(),
            timestamp: self.time.now(),
        });
    }

    fn record_applied(&mut self, before: &Purchase, allocated: &AllocatedPayment) {
        let now = self.now();
        let after = &allocated.purchase;

        self.events.emit(Event::PaymentApplied {
            purchase_id: after.id,
            payment_id: allocated.payment.id,
            amount: allocated.payment.amount,
            method: allocated.payment.method,
            remaining: after.remaining_amount(),
            timestamp: now,
        });

        if before.status() != after.status() {
            self.events.emit(Event::StatusChanged {
                purchase_id: after.id,
                old_status: before.status(),
                new_status: after.status(),
                timestamp: now,
            });
        }

        if after.is_settled() {
            self.events.emit(Event::PurchaseSettled {
                purchase_id: after.id,
                total_paid: after.paid_amount(),
                timestamp: now,
            });
        }
    }

    // reporting

    pub fn summary(&self) -> Result<LedgerSummary> {
        Ok(LedgerSummary::from_purchases(&self.store.list_purchases()?))
    }

    pub fn limit_usage(&self, limit: &SpendingLimit) -> Result<LimitUsage> {
        Ok(limit.evaluate(&self.store.list_purchases()?))
    }

    // goals

    pub fn add_goal(&mut self, goal: Goal) -> Result<GoalId> {
        self.store.write_goal(&goal)?;
        Ok(goal.id)
    }

    pub fn goal(&self, id: GoalId) -> Result<Goal> {
        self.store.read_goal(id)
    }

    /// unreached goals whose deadline is before `today`
    pub fn overdue_goals(&self, today: NaiveDate) -> Result<Vec<Goal>> {
        Ok(self
            .store
            .list_goals()?
            .into_iter()
            .filter(|g| g.is_overdue(today))
            .collect())
    }

    pub fn contribute_to_goal(&mut self, id: GoalId, amount: Money) -> Result<Goal> {
        let now = self.time.now();
        let mut goal = self.store.read_goal(id)?;
        let reached = goal.contribute(amount)?;
        self.store.write_goal(&goal)?;

        self.events.emit(Event::GoalContribution {
            goal_id: id,
            amount,
            new_total: goal.current_amount,
            timestamp: now,
        });
        if reached {
            self.events.emit(Event::GoalReached {
                goal_id: id,
                timestamp: now,
            });
            tracing::info!(goal_id = %id, name = %goal.name, "savings goal reached");
        }

        Ok(goal)
    }
}
