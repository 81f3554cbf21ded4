pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod goals;
pub mod ledger;
pub mod limits;
pub mod logging;
pub mod payments;
pub mod purchase;
pub mod reports;
pub mod storage;
pub mod types;

// re-export key types
pub use config::LedgerConfig;
pub use decimal::{Money, Rate};
pub use errors::{LedgerError, Result};
pub use events::{Event, EventStore};
pub use goals::Goal;
pub use ledger::Ledger;
pub use limits::{LimitUsage, SpendingLimit};
pub use payments::{
    project_status, AllocatedPayment, BatchAllocation, BatchAllocator, Installment,
    InstallmentPlan, PaymentAllocator, PaymentRequest,
};
pub use purchase::{Payment, Purchase, PurchaseView};
pub use reports::{LedgerSummary, StatusCounts, StoreSummary};
pub use storage::{JsonFileStore, MemoryStore, PurchaseStore};
pub use types::{
    GoalId, PaymentId, PaymentMethod, PurchaseId, PurchaseStatus, Store, StoreId,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
