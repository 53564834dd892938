//! Error types for ledger planning.

use rust_decimal::Decimal;
use thiserror::Error;

use super::types::{Currency, UserStatus};

/// Errors detected while planning a recharge or transfer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Amount must be strictly positive.
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// Transfers move at least one whole unit of currency.
    #[error("transfer amount must be at least 1, got {0}")]
    BelowMinimum(Decimal),

    /// Transfer amount exceeds the sender's balance.
    #[error("insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Sender balance at planning time.
        balance: Decimal,
        /// Requested transfer amount.
        requested: Decimal,
    },

    /// Receiver has not completed onboarding to an eligible trust level.
    #[error("receiver with status '{}' cannot accept transfers", .0.as_str())]
    ReceiverNotEligible(UserStatus),

    /// Sender and receiver resolve to the same account.
    #[error("sender and receiver accounts cannot be the same")]
    SelfTransfer,

    /// Accounts do not share a currency; no conversion is performed.
    #[error("currency mismatch: sender {sender}, receiver {receiver}")]
    CurrencyMismatch {
        /// Sender account currency.
        sender: Currency,
        /// Receiver account currency.
        receiver: Currency,
    },

    /// Supplied address failed the shape check or external verification.
    #[error("invalid address")]
    InvalidAddress,
}
