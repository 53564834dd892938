//! Account repository: account provisioning, balance adjustments and CVU
//! association.
//!
//! Code minting is bounded: every generated identifier gets at most
//! [`CodePolicy::max_attempts`] collision checks before the operation fails
//! with [`AccountError::ExhaustedKeyspace`] instead of looping forever.

use chrono::Utc;
use monedero_core::codegen::{self, CharClass, CodePolicy};
use monedero_core::ledger::AccountSnapshot;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use thiserror::Error;
use uuid::Uuid;

use crate::entities::accounts;
use crate::entities::sea_orm_active_enums::Currency;

/// Length of the public account code (alphanumeric).
pub const ACCOUNT_CODE_LEN: usize = 10;
/// Length of the recharge code handed to payment networks (digits only).
pub const RECHARGE_CODE_LEN: usize = 10;
/// Length of the interbank CVU (digits only).
pub const CVU_LEN: usize = 22;

/// Errors surfaced by [`AccountRepository`].
#[derive(Debug, Error)]
pub enum AccountError {
    /// The user already owns an account; the relation is one-to-one.
    #[error("User {0} already has an account")]
    OwnerHasAccount(Uuid),
    /// No account matched the lookup.
    #[error("Account not found: {0}")]
    NotFound(Uuid),
    /// The account already carries a CVU and re-association is not allowed.
    #[error("Account {0} already has an associated CVU")]
    CvuAlreadyAssociated(Uuid),
    /// Could not mint a collision-free code within the configured attempts.
    #[error("Could not mint a unique {0} after {1} attempts")]
    ExhaustedKeyspace(&'static str, u32),
    /// Underlying database failure.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Data access for wallet accounts.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
    policy: CodePolicy,
}

impl AccountRepository {
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

    /// Provisions an account for `user_id` with a zero balance, a fresh
    /// account code and a fresh recharge code.
    pub async fn create(
        &self,
        user_id: Uuid,
        currency: Currency,
    ) -> Result<accounts::Model, AccountError> {
        if self.find_by_owner(user_id).await?.is_some() {
            return Err(AccountError::OwnerHasAccount(user_id));
        }

        let code = self.mint_account_code().await?;
        let recharge_code = self.mint_recharge_code().await?;
        let now = Utc::now();

        let account = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            code: Set(code),
            recharge_code: Set(recharge_code),
            balance: Set(Decimal::ZERO),
            currency: Set(currency),
            cvu: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        Ok(account.insert(&self.db).await?)
    }

    /// Finds the account owned by `user_id`.
    pub async fn find_by_owner(
        &self,
        user_id: Uuid,
    ) -> Result<Option<accounts::Model>, AccountError> {
        Ok(accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?)
    }

    /// Finds an account by its public code.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<accounts::Model>, AccountError> {
        Ok(accounts::Entity::find()
            .filter(accounts::Column::Code.eq(code))
            .one(&self.db)
            .await?)
    }

    /// Finds an account by its recharge code.
    pub async fn find_by_recharge_code(
        &self,
        recharge_code: &str,
    ) -> Result<Option<accounts::Model>, AccountError> {
        Ok(accounts::Entity::find()
            .filter(accounts::Column::RechargeCode.eq(recharge_code))
            .one(&self.db)
            .await?)
    }

    /// Applies `delta` to the account balance as a single relative `UPDATE`.
    ///
    /// The increment happens entirely inside the database, so two concurrent
    /// adjustments never clobber each other the way a read-modify-write
    /// sequence would.
    pub async fn adjust_balance(
        &self,
        account_id: Uuid,
        delta: Decimal,
    ) -> Result<(), AccountError> {
        let result = accounts::Entity::update_many()
            .col_expr(
                accounts::Column::Balance,
                Expr::col(accounts::Column::Balance).add(Expr::value(delta)),
            )
            .col_expr(accounts::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(accounts::Column::Id.eq(account_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AccountError::NotFound(account_id));
        }
        Ok(())
    }

    /// Associates a CVU with the account. When `cvu` is `None` a fresh
    /// 22-digit value is generated; an account that already carries a CVU
    /// rejects the operation.
    pub async fn associate_cvu(
        &self,
        account_id: Uuid,
        cvu: Option<String>,
    ) -> Result<accounts::Model, AccountError> {
        let account = accounts::Entity::find_by_id(account_id)
            .one(&self.db)
            .await?
            .ok_or(AccountError::NotFound(account_id))?;

        if account.cvu.is_some() {
            return Err(AccountError::CvuAlreadyAssociated(account_id));
        }

        let cvu = cvu.unwrap_or_else(|| codegen::generate(CVU_LEN, CharClass::Numeric));

        let mut active: accounts::ActiveModel = account.into();
        active.cvu = Set(Some(cvu));
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    async fn mint_account_code(&self) -> Result<String, AccountError> {
        for _ in 0..self.policy.max_attempts {
            let candidate = codegen::generate(ACCOUNT_CODE_LEN, CharClass::Alphanumeric);
            if self.find_by_code(&candidate).await?.is_none() {
                return Ok(candidate);
            }
        }
        Err(AccountError::ExhaustedKeyspace(
            "account code",
            self.policy.max_attempts,
        ))
    }

    async fn mint_recharge_code(&self) -> Result<String, AccountError> {
        for _ in 0..self.policy.max_attempts {
            let candidate = codegen::generate(RECHARGE_CODE_LEN, CharClass::Numeric);
            if self.find_by_recharge_code(&candidate).await?.is_none() {
                return Ok(candidate);
            }
        }
        Err(AccountError::ExhaustedKeyspace(
            "recharge code",
            self.policy.max_attempts,
        ))
    }
}

/// Converts a stored account into the snapshot consumed by planning logic.
#[must_use]
pub fn snapshot(account: &accounts::Model) -> AccountSnapshot {
    AccountSnapshot {
        id: account.id,
        code: account.code.clone(),
        balance: account.balance,
        currency: account.currency.into(),
    }
}

/// Pure model of the bounded minting protocol used above: draw candidates
/// until one passes the `exists` probe, giving up after `max_attempts`.
///
/// Extracted so the retry bound can be exercised without a database.
pub fn mint_unique<G, E>(max_attempts: u32, mut generate: G, exists: E) -> Option<String>
where
    G: FnMut() -> String,
    E: Fn(&str) -> bool,
{
    for _ in 0..max_attempts {
        let candidate = generate();
        if !exists(&candidate) {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn snapshot_mirrors_stored_fields() {
        let account = accounts::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            code: "a1B2c3D4e5".to_string(),
            recharge_code: "0123456789".to_string(),
            balance: dec!(150.25),
            currency: Currency::Ars,
            cvu: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        };

        let snap = snapshot(&account);
        assert_eq!(snap.id, account.id);
        assert_eq!(snap.code, "a1B2c3D4e5");
        assert_eq!(snap.balance, dec!(150.25));
        assert_eq!(snap.currency, monedero_core::ledger::Currency::Ars);
    }

    #[test]
    fn mint_unique_returns_first_free_candidate() {
        let taken: HashSet<&str> = ["aaa", "bbb"].into_iter().collect();
        let mut sequence = vec!["ccc", "bbb", "aaa"];
        let minted = mint_unique(
            5,
            || sequence.pop().map(String::from).unwrap_or_default(),
            |c| taken.contains(c),
        );
        assert_eq!(minted.as_deref(), Some("ccc"));
    }

    #[test]
    fn mint_unique_gives_up_when_every_candidate_collides() {
        let minted = mint_unique(4, || "aaa".to_string(), |_| true);
        assert!(minted.is_none());
    }

    #[test]
    fn mint_unique_with_zero_attempts_never_draws() {
        let minted = mint_unique(0, || unreachable!("generator must not run"), |_| false);
        assert!(minted.is_none());
    }

    proptest! {
        #[test]
        fn mint_unique_never_exceeds_the_attempt_budget(max_attempts in 0u32..64) {
            let mut draws = 0u32;
            let _ = mint_unique(
                max_attempts,
                || {
                    draws += 1;
                    codegen::generate(RECHARGE_CODE_LEN, CharClass::Numeric)
                },
                |_| true,
            );
            prop_assert_eq!(draws, max_attempts);
        }

        #[test]
        fn mint_unique_result_is_never_a_taken_code(taken in proptest::collection::hash_set("[0-9]{10}", 0..20)) {
            if let Some(code) = mint_unique(
                32,
                || codegen::generate(RECHARGE_CODE_LEN, CharClass::Numeric),
                |c| taken.contains(c),
            ) {
                prop_assert!(!taken.contains(&code));
            }
        }
    }
}
