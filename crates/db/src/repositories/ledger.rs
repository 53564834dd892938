//! Ledger orchestrator: the money-movement workflows.
//!
//! Planning is pure and lives in `monedero_core::ledger`; this module wires
//! the plans to the repositories and decides execution order. A transfer is
//! executed debit-first: if the credit leg fails mid-flight the sender holds
//! an orphan debit that reconciliation can compensate, whereas credit-first
//! could mint money.

use chrono::{DateTime, Utc};
use monedero_core::ledger::{
    Address, DisplayInfo, EntryDraft, LedgerError, ReceiverProfile, plan_recharge, plan_transfer,
};
use monedero_shared::CallerIdentity;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, instrument};
use uuid::Uuid;

use super::account::{self, AccountRepository};
use super::transaction::{self, TransactionRepository};
use super::user::{self, UserRepository};
use crate::entities::sea_orm_active_enums::Currency;
use crate::entities::transactions;

/// Errors surfaced by [`LedgerOrchestrator`].
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// No account carries the presented recharge code.
    #[error("Recharge code not found")]
    RechargeCodeNotFound,
    /// The caller has no account to move money from.
    #[error("Sender account not found")]
    SenderAccountNotFound,
    /// The caller's user row is missing.
    #[error("Sender not found")]
    SenderNotFound,
    /// No user carries the given email address.
    #[error("Receiver not found")]
    ReceiverNotFound,
    /// The receiver exists but has no account.
    #[error("Receiver account not found")]
    ReceiverAccountNotFound,
    /// The recharge address failed external verification.
    #[error("Address could not be verified")]
    AddressRejected,
    /// A planning rule was violated.
    #[error(transparent)]
    Plan(#[from] LedgerError),
    /// Account-side failure.
    #[error(transparent)]
    Account(#[from] account::AccountError),
    /// Ledger-side failure.
    #[error(transparent)]
    Transaction(#[from] transaction::TransactionError),
    /// User-side failure.
    #[error(transparent)]
    User(#[from] user::UserError),
}

impl From<OrchestratorError> for monedero_shared::AppError {
    fn from(err: OrchestratorError) -> Self {
        let message = err.to_string();
        match err {
            OrchestratorError::RechargeCodeNotFound
            | OrchestratorError::SenderAccountNotFound
            | OrchestratorError::SenderNotFound
            | OrchestratorError::ReceiverNotFound
            | OrchestratorError::ReceiverAccountNotFound => Self::NotFound(message),
            OrchestratorError::AddressRejected => Self::Validation(message),
            OrchestratorError::Plan(plan) => match plan {
                LedgerError::NonPositiveAmount(_)
                | LedgerError::BelowMinimum(_)
                | LedgerError::InvalidAddress => Self::Validation(message),
                LedgerError::InsufficientFunds { .. } => Self::InsufficientFunds(message),
                LedgerError::ReceiverNotEligible(_)
                | LedgerError::SelfTransfer
                | LedgerError::CurrencyMismatch { .. } => Self::Conflict(message),
            },
            OrchestratorError::Account(inner) => inner.into(),
            OrchestratorError::Transaction(inner) => inner.into(),
            OrchestratorError::User(user::UserError::Database(_)) => Self::Database(message),
        }
    }
}

impl From<account::AccountError> for monedero_shared::AppError {
    fn from(err: account::AccountError) -> Self {
        let message = err.to_string();
        match err {
            account::AccountError::OwnerHasAccount(_)
            | account::AccountError::CvuAlreadyAssociated(_) => Self::Conflict(message),
            account::AccountError::NotFound(_) => Self::NotFound(message),
            account::AccountError::ExhaustedKeyspace(..) => Self::ExhaustedKeyspace(message),
            account::AccountError::Database(_) => Self::Database(message),
        }
    }
}

impl From<transaction::TransactionError> for monedero_shared::AppError {
    fn from(err: transaction::TransactionError) -> Self {
        let message = err.to_string();
        match err {
            transaction::TransactionError::Period(_) => Self::Validation(message),
            transaction::TransactionError::ExhaustedKeyspace(_) => {
                Self::ExhaustedKeyspace(message)
            }
            transaction::TransactionError::Database(_) => Self::Database(message),
        }
    }
}

/// A recharge request as presented by a payment network.
#[derive(Debug, Clone)]
pub struct RechargeInput {
    /// The account's recharge code.
    pub recharge_code: String,
    /// Human-readable name of the store where cash was deposited.
    pub store: String,
    /// Amount deposited; must be strictly positive.
    pub amount: Decimal,
    /// Timestamp reported by the network. Authoritative for the entry.
    pub date: DateTime<Utc>,
    /// Store address, verified externally when present.
    pub address: Option<Address>,
}

/// The result of a completed transfer, carrying everything the caller needs
/// to respond and to notify the receiver.
#[derive(Debug, Clone)]
pub struct TransferOutcome {
    /// The sender-side (debit) ledger entry.
    pub debit: transactions::Model,
    /// The resolved receiver.
    pub receiver: ReceiverProfile,
    /// The sender as seen by the receiver.
    pub sender_display: DisplayInfo,
    /// Transferred amount (positive).
    pub amount: Decimal,
    /// Currency of both accounts.
    pub currency: Currency,
}

/// Coordinates accounts, users and the ledger for money movements.
#[derive(Debug, Clone)]
pub struct LedgerOrchestrator {
    accounts: AccountRepository,
    transactions: TransactionRepository,
    users: UserRepository,
}

impl LedgerOrchestrator {
    /// Creates an orchestrator over the given repositories.
    #[must_use]
    pub const fn new(
        accounts: AccountRepository,
        transactions: TransactionRepository,
        users: UserRepository,
    ) -> Self {
        Self {
            accounts,
            transactions,
            users,
        }
    }

    /// Credits an account from a cash deposit.
    ///
    /// Resolves the account by recharge code, plans the entry, verifies the
    /// store address through `verify_address` when one is present, then
    /// appends the entry and bumps the balance. The verifier decides and the
    /// workflow fails closed: an unverifiable address rejects the recharge.
    #[instrument(skip(self, verify_address), fields(recharge_code = %input.recharge_code))]
    pub async fn recharge<V, Fut>(
        &self,
        input: RechargeInput,
        verify_address: V,
    ) -> Result<transactions::Model, OrchestratorError>
    where
        V: FnOnce(Address) -> Fut,
        Fut: Future<Output = bool>,
    {
        let account = self
            .accounts
            .find_by_recharge_code(&input.recharge_code)
            .await?
            .ok_or(OrchestratorError::RechargeCodeNotFound)?;

        let draft = plan_recharge(
            &account::snapshot(&account),
            &input.store,
            input.amount,
            input.date,
            input.address.as_ref(),
        )?;

        if let Some(address) = input.address {
            if !verify_address(address).await {
                return Err(OrchestratorError::AddressRejected);
            }
        }

        let entry = self.transactions.record(&draft).await?;
        self.accounts.adjust_balance(account.id, draft.amount).await?;

        info!(
            account_id = %account.id,
            amount = %draft.amount,
            "recharge recorded"
        );
        Ok(entry)
    }

    /// Moves money from the caller's account to the account owned by the
    /// user behind `receiver_email`.
    ///
    /// Fails before touching the ledger when the amount is not positive, the
    /// sender lacks funds, the receiver is missing or ineligible, sender and
    /// receiver coincide, or the currencies differ. On success both legs are
    /// recorded and both balances adjusted, debit leg first.
    #[instrument(skip(self), fields(sender = %caller.user_id))]
    pub async fn transfer(
        &self,
        caller: CallerIdentity,
        receiver_email: &str,
        amount: Decimal,
    ) -> Result<TransferOutcome, OrchestratorError> {
        let sender_account = self
            .accounts
            .find_by_owner(caller.user_id)
            .await?
            .ok_or(OrchestratorError::SenderAccountNotFound)?;
        let sender_snapshot = account::snapshot(&sender_account);

        if amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount(amount).into());
        }
        if amount < Decimal::ONE {
            return Err(LedgerError::BelowMinimum(amount).into());
        }

        // Funds are checked before the receiver is even resolved so a broke
        // sender cannot probe which emails exist.
        if amount > sender_snapshot.balance {
            return Err(LedgerError::InsufficientFunds {
                balance: sender_snapshot.balance,
                requested: amount,
            }
            .into());
        }

        let sender = self
            .users
            .find_by_id(caller.user_id)
            .await?
            .ok_or(OrchestratorError::SenderNotFound)?;
        let sender_display = user::display_info(&sender);

        let receiver: ReceiverProfile = self
            .users
            .find_by_email(receiver_email)
            .await?
            .ok_or(OrchestratorError::ReceiverNotFound)?
            .into();

        let receiver_account = self
            .accounts
            .find_by_owner(receiver.user_id)
            .await?
            .ok_or(OrchestratorError::ReceiverAccountNotFound)?;
        let receiver_snapshot = account::snapshot(&receiver_account);

        let plan = plan_transfer(
            &sender_snapshot,
            &sender_display,
            &receiver,
            &receiver_snapshot,
            amount,
        )?;

        let debit = self.execute_leg(&plan.debit).await?;
        self.execute_leg(&plan.credit).await?;

        info!(
            sender_account = %sender_snapshot.id,
            receiver_account = %receiver_snapshot.id,
            amount = %amount,
            "transfer recorded"
        );

        Ok(TransferOutcome {
            debit,
            receiver,
            sender_display,
            amount,
            currency: sender_account.currency,
        })
    }

    /// Lists the account id for a caller, for read paths that only need it.
    pub async fn account_for(
        &self,
        caller: CallerIdentity,
    ) -> Result<Uuid, OrchestratorError> {
        let account = self
            .accounts
            .find_by_owner(caller.user_id)
            .await?
            .ok_or(OrchestratorError::SenderAccountNotFound)?;
        Ok(account.id)
    }

    async fn execute_leg(
        &self,
        draft: &EntryDraft,
    ) -> Result<transactions::Model, OrchestratorError> {
        let entry = self.transactions.record(draft).await?;
        self.accounts
            .adjust_balance(draft.account_id, draft.amount)
            .await?;
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use monedero_core::ledger::{Currency, UserStatus};
    use monedero_shared::AppError;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn resolution_failures_map_to_not_found() {
        for err in [
            OrchestratorError::RechargeCodeNotFound,
            OrchestratorError::SenderAccountNotFound,
            OrchestratorError::ReceiverNotFound,
            OrchestratorError::ReceiverAccountNotFound,
        ] {
            assert!(matches!(AppError::from(err), AppError::NotFound(_)));
        }
    }

    #[test]
    fn planning_failures_map_by_rule() {
        let cases: Vec<(LedgerError, u16)> = vec![
            (LedgerError::NonPositiveAmount(dec!(-1)), 400),
            (LedgerError::BelowMinimum(dec!(0.5)), 400),
            (LedgerError::InvalidAddress, 400),
            (
                LedgerError::InsufficientFunds {
                    balance: dec!(10),
                    requested: dec!(20),
                },
                422,
            ),
            (LedgerError::ReceiverNotEligible(UserStatus::Pending), 409),
            (LedgerError::SelfTransfer, 409),
            (
                LedgerError::CurrencyMismatch {
                    sender: Currency::Ars,
                    receiver: Currency::Usd,
                },
                409,
            ),
        ];

        for (plan_err, status) in cases {
            let app = AppError::from(OrchestratorError::Plan(plan_err));
            assert_eq!(app.status_code(), status);
        }
    }

    #[test]
    fn keyspace_exhaustion_is_a_server_error() {
        let err = OrchestratorError::Account(account::AccountError::ExhaustedKeyspace(
            "account code",
            32,
        ));
        let app = AppError::from(err);
        assert!(matches!(app, AppError::ExhaustedKeyspace(_)));
        assert_eq!(app.status_code(), 500);
    }
}
