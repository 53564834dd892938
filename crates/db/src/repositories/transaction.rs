//! Transaction repository: the append-only ledger.
//!
//! Rows are only ever inserted. Balance corrections are expressed as new
//! compensating entries, never as updates to history.

use chrono::{DateTime, Utc};
use monedero_core::codegen::{self, CharClass, CodePolicy};
use monedero_core::ledger::{EntryDraft, PeriodError, validate_period};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use thiserror::Error;
use uuid::Uuid;

use crate::entities::transactions;

/// Length of the public transaction code (alphanumeric).
pub const TRANSACTION_CODE_LEN: usize = 16;

/// Errors surfaced by [`TransactionRepository`].
#[derive(Debug, Error)]
pub enum TransactionError {
    /// The requested period failed validation.
    #[error("Invalid period: {0}")]
    Period(#[from] PeriodError),
    /// Could not mint a collision-free transaction code.
    #[error("Could not mint a unique transaction code after {0} attempts")]
    ExhaustedKeyspace(u32),
    /// Underlying database failure.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// A page of ledger entries plus the account's total entry count.
#[derive(Debug, Clone)]
pub struct TransactionPage {
    /// Entries in most-recent-first order.
    pub rows: Vec<transactions::Model>,
    /// Total number of entries for the account, ignoring pagination.
    pub count: u64,
}

/// Data access for ledger entries.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
    policy: CodePolicy,
}

impl TransactionRepository {
    /// Creates a repository with the default code-minting policy.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            policy: CodePolicy::default(),
        }
    }

    /// Overrides the code-minting policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: CodePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Appends a ledger entry from a planned draft, minting a fresh
    /// transaction code. A draft without an explicit timestamp is recorded
    /// at the current server time.
    pub async fn record(
        &self,
        draft: &EntryDraft,
    ) -> Result<transactions::Model, TransactionError> {
        let code = self.mint_transaction_code().await?;
        let entry = active_model_from_draft(code, draft, Utc::now());
        Ok(entry.insert(&self.db).await?)
    }

    /// Lists entries for an account, most recent first, with the total count.
    pub async fn list_page(
        &self,
        account_id: Uuid,
        limit: u64,
        offset: u64,
    ) -> Result<TransactionPage, TransactionError> {
        let rows = transactions::Entity::find()
            .filter(transactions::Column::AccountId.eq(account_id))
            .order_by_desc(transactions::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await?;

        let count = transactions::Entity::find()
            .filter(transactions::Column::AccountId.eq(account_id))
            .count(&self.db)
            .await?;

        Ok(TransactionPage { rows, count })
    }

    /// Lists entries strictly inside `(start, end)` after validating the
    /// period: `start` must precede `end` and the span may not exceed the
    /// configured maximum.
    pub async fn list_period(
        &self,
        account_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<TransactionPage, TransactionError> {
        validate_period(start, end)?;
        self.list_range(account_id, start, end).await
    }

    /// Lists entries strictly inside `(start, end)` without a span cap.
    ///
    /// Reserved for internal aggregation; callers exposing a period to the
    /// outside go through [`Self::list_period`].
    pub async fn list_range(
        &self,
        account_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<TransactionPage, TransactionError> {
        let rows = transactions::Entity::find()
            .filter(transactions::Column::AccountId.eq(account_id))
            .filter(transactions::Column::CreatedAt.gt(start))
            .filter(transactions::Column::CreatedAt.lt(end))
            .order_by_desc(transactions::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let count = rows.len() as u64;
        Ok(TransactionPage { rows, count })
    }

    async fn mint_transaction_code(&self) -> Result<String, TransactionError> {
        for _ in 0..self.policy.max_attempts {
            let candidate = codegen::generate(TRANSACTION_CODE_LEN, CharClass::Alphanumeric);
            let taken = transactions::Entity::find()
                .filter(transactions::Column::Code.eq(&candidate))
                .one(&self.db)
                .await?
                .is_some();
            if !taken {
                return Ok(candidate);
            }
        }
        Err(TransactionError::ExhaustedKeyspace(self.policy.max_attempts))
    }
}

/// Maps a planned draft onto an insertable row. Drafts without a timestamp
/// fall back to `now`.
fn active_model_from_draft(
    code: String,
    draft: &EntryDraft,
    now: DateTime<Utc>,
) -> transactions::ActiveModel {
    transactions::ActiveModel {
        id: Set(Uuid::new_v4()),
        code: Set(code),
        account_id: Set(draft.account_id),
        involved: Set(draft.involved.clone()),
        amount: Set(draft.amount),
        kind: Set(draft.kind.into()),
        currency: Set(draft.currency.into()),
        data: Set(draft.data.clone()),
        created_at: Set(draft.created_at.unwrap_or(now).into()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use monedero_core::ledger::{Currency, TransactionKind};
    use rust_decimal_macros::dec;
    use sea_orm::ActiveValue;
    use serde_json::json;

    use super::*;

    fn draft(created_at: Option<DateTime<Utc>>) -> EntryDraft {
        EntryDraft {
            account_id: Uuid::new_v4(),
            involved: "a1B2c3D4e5".to_string(),
            amount: dec!(-42.50),
            kind: TransactionKind::Transfer,
            currency: Currency::Ars,
            data: Some(json!({"name": "Ana García", "email": "ana@example.com"})),
            created_at,
        }
    }

    #[test]
    fn draft_without_timestamp_is_stamped_with_now() {
        let now = Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap();
        let entry = active_model_from_draft("x".repeat(16), &draft(None), now);
        assert_eq!(entry.created_at, ActiveValue::Set(now.into()));
    }

    #[test]
    fn draft_timestamp_wins_over_now() {
        let stamped = Utc.with_ymd_and_hms(2026, 6, 1, 9, 30, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap();
        let entry = active_model_from_draft("x".repeat(16), &draft(Some(stamped)), now);
        assert_eq!(entry.created_at, ActiveValue::Set(stamped.into()));
    }

    #[test]
    fn draft_fields_map_one_to_one() {
        let d = draft(None);
        let entry = active_model_from_draft("c0d3".repeat(4), &d, Utc::now());
        assert_eq!(entry.account_id, ActiveValue::Set(d.account_id));
        assert_eq!(entry.involved, ActiveValue::Set(d.involved.clone()));
        assert_eq!(entry.amount, ActiveValue::Set(dec!(-42.50)));
        assert_eq!(entry.data, ActiveValue::Set(d.data.clone()));
    }
}
