//! Ledger planning: validation and entry drafting for the two operations
//! that mutate balances (recharge and transfer), plus period validation
//! for date-bounded listings.
//!
//! Planning is pure: it reads snapshots of the affected accounts and
//! produces entry drafts for the storage layer to persist. The drafts for
//! a transfer are ordered (debit first) so the executor's write order is
//! part of the plan, not a convention.

pub mod error;
pub mod period;
pub mod plan;
pub mod types;

pub use error::LedgerError;
pub use period::{MAX_PERIOD_DAYS, PeriodError, validate_period};
pub use plan::{plan_recharge, plan_transfer};
pub use types::{
    AccountSnapshot, Address, Currency, DisplayInfo, EntryDraft, ReceiverProfile, TransactionKind,
    TransferPlan, UserStatus,
};
