//! `SeaORM` Entity for the transactions table (the ledger).
//!
//! Rows are append-only: created once, never mutated or deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{Currency, TransactionKind};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Public transaction code, 16 alphanumeric characters, globally unique.
    #[sea_orm(unique)]
    pub code: String,
    pub account_id: Uuid,
    /// Counterparty reference: store name or counterpart account code.
    pub involved: String,
    /// Signed amount: positive = credit, negative = debit.
    pub amount: Decimal,
    pub kind: TransactionKind,
    /// Copied from the account at creation time.
    pub currency: Currency,
    /// Free-form attached context (address, counterparty display info).
    pub data: Option<Json>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id"
    )]
    Accounts,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
