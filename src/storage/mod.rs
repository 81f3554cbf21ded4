pub mod json;
pub mod memory;

use crate::errors::{LedgerError, Result};
use crate::goals::Goal;
use crate::payments::AllocatedPayment;
use crate::purchase::{Payment, Purchase};
use crate::types::{GoalId, PurchaseId, Store, StoreId};

pub use json::JsonFileStore;
pub use memory::MemoryStore;

/// persistence backend for purchases and their payments, plus the stores
/// they were bought at and the savings goals tracked next to them
pub trait PurchaseStore {
    fn read_purchase(&self, id: PurchaseId) -> Result<Purchase>;

    /// upsert with full replace. an existing purchase is only replaced by its
    /// direct successor version.
    fn write_purchase(&mut self, purchase: &Purchase) -> Result<()>;

    fn append_payment(&mut self, payment: &Payment) -> Result<()>;

    /// write every purchase and append every payment, or change nothing
    fn commit(&mut self, changes: &[AllocatedPayment]) -> Result<()>;

    fn list_purchases(&self) -> Result<Vec<Purchase>>;

    fn read_store(&self, id: StoreId) -> Result<Store>;

    fn write_store(&mut self, store: &Store) -> Result<()>;

    fn list_stores(&self) -> Result<Vec<Store>>;

    fn read_goal(&self, id: GoalId) -> Result<Goal>;

    /// upsert with full replace
    fn write_goal(&mut self, goal: &Goal) -> Result<()>;

    fn list_goals(&self) -> Result<Vec<Goal>>;
}

/// reject a write that was not derived from the currently stored version
pub(crate) fn check_version(stored: Option<&Purchase>, incoming: &Purchase) -> Result<()> {
    match stored {
        Some(current) if incoming.version() != current.version() + 1 => {
            Err(LedgerError::ConcurrentModification {
                id: incoming.id,
                expected: incoming.version().saturating_sub(1),
                found: current.version(),
            })
        }
        _ => Ok(()),
    }
}
