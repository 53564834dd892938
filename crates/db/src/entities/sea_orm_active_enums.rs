//! Database enum types, with conversions to and from the core domain enums.

use monedero_core::ledger as core;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account and transaction currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "currency")]
pub enum Currency {
    /// Argentine peso.
    #[sea_orm(string_value = "ARS")]
    Ars,
    /// US dollar.
    #[sea_orm(string_value = "USD")]
    Usd,
}

impl From<core::Currency> for Currency {
    fn from(value: core::Currency) -> Self {
        match value {
            core::Currency::Ars => Self::Ars,
            core::Currency::Usd => Self::Usd,
        }
    }
}

impl From<Currency> for core::Currency {
    fn from(value: Currency) -> Self {
        match value {
            Currency::Ars => Self::Ars,
            Currency::Usd => Self::Usd,
        }
    }
}

/// Ledger entry kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_kind")]
pub enum TransactionKind {
    /// Cash-in through a physical payment network.
    #[sea_orm(string_value = "recharge")]
    Recharge,
    /// External bank transfer.
    #[sea_orm(string_value = "transfer")]
    Transfer,
    /// Peer-to-peer debit/credit pair.
    #[sea_orm(string_value = "send")]
    Send,
    /// Card or merchant debit.
    #[sea_orm(string_value = "debit")]
    Debit,
}

impl From<core::TransactionKind> for TransactionKind {
    fn from(value: core::TransactionKind) -> Self {
        match value {
            core::TransactionKind::Recharge => Self::Recharge,
            core::TransactionKind::Transfer => Self::Transfer,
            core::TransactionKind::Send => Self::Send,
            core::TransactionKind::Debit => Self::Debit,
        }
    }
}

impl From<TransactionKind> for core::TransactionKind {
    fn from(value: TransactionKind) -> Self {
        match value {
            TransactionKind::Recharge => Self::Recharge,
            TransactionKind::Transfer => Self::Transfer,
            TransactionKind::Send => Self::Send,
            TransactionKind::Debit => Self::Debit,
        }
    }
}

/// User onboarding status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_status")]
pub enum UserStatus {
    /// Registered, email not confirmed.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Email confirmed.
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    /// Identity verified.
    #[sea_orm(string_value = "protected")]
    Protected,
    /// Fully onboarded.
    #[sea_orm(string_value = "authorized")]
    Authorized,
}

impl From<core::UserStatus> for UserStatus {
    fn from(value: core::UserStatus) -> Self {
        match value {
            core::UserStatus::Pending => Self::Pending,
            core::UserStatus::Confirmed => Self::Confirmed,
            core::UserStatus::Protected => Self::Protected,
            core::UserStatus::Authorized => Self::Authorized,
        }
    }
}

impl From<UserStatus> for core::UserStatus {
    fn from(value: UserStatus) -> Self {
        match value {
            UserStatus::Pending => Self::Pending,
            UserStatus::Confirmed => Self::Confirmed,
            UserStatus::Protected => Self::Protected,
            UserStatus::Authorized => Self::Authorized,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_conversion_roundtrip() {
        for c in [core::Currency::Ars, core::Currency::Usd] {
            assert_eq!(core::Currency::from(Currency::from(c)), c);
        }
    }

    #[test]
    fn test_kind_conversion_roundtrip() {
        for k in [
            core::TransactionKind::Recharge,
            core::TransactionKind::Transfer,
            core::TransactionKind::Send,
            core::TransactionKind::Debit,
        ] {
            assert_eq!(core::TransactionKind::from(TransactionKind::from(k)), k);
        }
    }

    #[test]
    fn test_status_conversion_roundtrip() {
        for s in [
            core::UserStatus::Pending,
            core::UserStatus::Confirmed,
            core::UserStatus::Protected,
            core::UserStatus::Authorized,
        ] {
            assert_eq!(core::UserStatus::from(UserStatus::from(s)), s);
        }
    }
}
