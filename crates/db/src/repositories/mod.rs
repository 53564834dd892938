//! Repository abstractions for data access and the ledger orchestrator.

pub mod account;
pub mod ledger;
pub mod transaction;
pub mod user;

pub use account::AccountRepository;
pub use ledger::LedgerOrchestrator;
pub use transaction::TransactionRepository;
pub use user::UserRepository;
