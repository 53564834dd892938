//! Pure planning for the two balance-mutating operations.
//!
//! These functions validate preconditions against account snapshots and
//! produce [`EntryDraft`]s; the storage layer executes the drafts (insert
//! entry, then atomically increment the balance by the draft amount).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{
    AccountSnapshot, Address, DisplayInfo, EntryDraft, ReceiverProfile, TransactionKind,
    TransferPlan,
};

/// Plans a recharge: a single credit entry against the account resolved
/// by recharge code.
///
/// The created-at timestamp is the caller-supplied recharge date. The
/// payment network reports recharges after the fact, so the network's
/// date is authoritative for recharges; transfers always use server time.
///
/// The address, when present, is only shape-checked here. Verifying it
/// against the external address service (fail-closed) is the caller's
/// job and must happen before the draft is executed.
///
/// # Errors
///
/// Returns an error if the amount is not positive or the address is
/// malformed.
pub fn plan_recharge(
    account: &AccountSnapshot,
    store: &str,
    amount: Decimal,
    date: DateTime<Utc>,
    address: Option<&Address>,
) -> Result<EntryDraft, LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount(amount));
    }

    if let Some(addr) = address
        && !addr.is_well_formed()
    {
        return Err(LedgerError::InvalidAddress);
    }

    let data = address
        .map(|addr| serde_json::to_value(addr).unwrap_or(serde_json::Value::Null))
        .map(|value| serde_json::json!({ "address": value }));

    Ok(EntryDraft {
        account_id: account.id,
        involved: store.to_string(),
        amount,
        kind: TransactionKind::Recharge,
        currency: account.currency,
        data,
        created_at: Some(date),
    })
}

/// Plans a transfer: an ordered debit/credit pair between two accounts
/// of matching currency.
///
/// Validation order mirrors the operation: funds first, then receiver
/// eligibility, then the cross-account invariants. Either the whole plan
/// is produced or nothing is; no draft escapes a failed validation.
///
/// # Errors
///
/// Returns an error for an amount below one whole unit, insufficient
/// funds, an ineligible receiver, a self-transfer, or a currency
/// mismatch.
pub fn plan_transfer(
    sender: &AccountSnapshot,
    sender_display: &DisplayInfo,
    receiver: &ReceiverProfile,
    receiver_account: &AccountSnapshot,
    amount: Decimal,
) -> Result<TransferPlan, LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount(amount));
    }

    if amount < Decimal::ONE {
        return Err(LedgerError::BelowMinimum(amount));
    }

    if amount > sender.balance {
        return Err(LedgerError::InsufficientFunds {
            balance: sender.balance,
            requested: amount,
        });
    }

    if !receiver.status.can_receive_transfers() {
        return Err(LedgerError::ReceiverNotEligible(receiver.status));
    }

    if sender.id == receiver_account.id {
        return Err(LedgerError::SelfTransfer);
    }

    if sender.currency != receiver_account.currency {
        return Err(LedgerError::CurrencyMismatch {
            sender: sender.currency,
            receiver: receiver_account.currency,
        });
    }

    let receiver_display = receiver.display_info();

    let debit = EntryDraft {
        account_id: sender.id,
        involved: receiver_account.code.clone(),
        amount: -amount,
        kind: TransactionKind::Send,
        currency: sender.currency,
        data: serde_json::to_value(&receiver_display).ok(),
        created_at: None,
    };

    let credit = EntryDraft {
        account_id: receiver_account.id,
        involved: sender.code.clone(),
        amount,
        kind: TransactionKind::Send,
        currency: sender.currency,
        data: serde_json::to_value(sender_display).ok(),
        created_at: None,
    };

    Ok(TransferPlan { debit, credit })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::{Currency, UserStatus};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn account(balance: Decimal, currency: Currency) -> AccountSnapshot {
        AccountSnapshot {
            id: Uuid::new_v4(),
            code: crate::codegen::generate(10, crate::codegen::CharClass::Alphanumeric),
            balance,
            currency,
        }
    }

    fn receiver(status: UserStatus) -> ReceiverProfile {
        ReceiverProfile {
            user_id: Uuid::new_v4(),
            status,
            name: "Ana".into(),
            surname: "Gomez".into(),
            email: "ana@example.com".into(),
        }
    }

    fn sender_display() -> DisplayInfo {
        DisplayInfo {
            name: "Juan Perez".into(),
            email: "juan@example.com".into(),
        }
    }

    // Scenario: recharge of 500 ARS from store "Kiosco1" at date D.
    #[test]
    fn test_recharge_draft() {
        let acc = account(dec!(0), Currency::Ars);
        let date = Utc::now();

        let draft = plan_recharge(&acc, "Kiosco1", dec!(500), date, None).unwrap();

        assert_eq!(draft.account_id, acc.id);
        assert_eq!(draft.amount, dec!(500));
        assert_eq!(draft.kind, TransactionKind::Recharge);
        assert_eq!(draft.involved, "Kiosco1");
        assert_eq!(draft.currency, Currency::Ars);
        assert_eq!(draft.created_at, Some(date));
    }

    #[test]
    fn test_recharge_keeps_address_in_data() {
        let acc = account(dec!(0), Currency::Ars);
        let addr = Address {
            province: "Buenos Aires".into(),
            department: "La Plata".into(),
            locality: "La Plata".into(),
            street: "Calle 50".into(),
            number: 726,
        };

        let draft = plan_recharge(&acc, "Kiosco1", dec!(100), Utc::now(), Some(&addr)).unwrap();
        let data = draft.data.unwrap();
        assert_eq!(data["address"]["street"], "Calle 50");
        assert_eq!(data["address"]["number"], 726);
    }

    #[test]
    fn test_recharge_rejects_non_positive_amount() {
        let acc = account(dec!(0), Currency::Ars);
        assert!(matches!(
            plan_recharge(&acc, "Kiosco1", dec!(0), Utc::now(), None),
            Err(LedgerError::NonPositiveAmount(_))
        ));
        assert!(matches!(
            plan_recharge(&acc, "Kiosco1", dec!(-5), Utc::now(), None),
            Err(LedgerError::NonPositiveAmount(_))
        ));
    }

    #[test]
    fn test_recharge_rejects_malformed_address() {
        let acc = account(dec!(0), Currency::Ars);
        let addr = Address {
            province: String::new(),
            department: "La Plata".into(),
            locality: "La Plata".into(),
            street: "Calle 50".into(),
            number: 726,
        };
        assert_eq!(
            plan_recharge(&acc, "Kiosco1", dec!(100), Utc::now(), Some(&addr)),
            Err(LedgerError::InvalidAddress)
        );
    }

    // Scenario: sender 1000 ARS transfers 300 to receiver with 50 ARS.
    #[test]
    fn test_transfer_plan_pairs_entries() {
        let sender = account(dec!(1000), Currency::Ars);
        let receiver_acc = account(dec!(50), Currency::Ars);
        let rx = receiver(UserStatus::Authorized);

        let plan =
            plan_transfer(&sender, &sender_display(), &rx, &receiver_acc, dec!(300)).unwrap();

        assert_eq!(plan.debit.account_id, sender.id);
        assert_eq!(plan.debit.amount, dec!(-300));
        assert_eq!(plan.debit.involved, receiver_acc.code);
        assert_eq!(plan.credit.account_id, receiver_acc.id);
        assert_eq!(plan.credit.amount, dec!(300));
        assert_eq!(plan.credit.involved, sender.code);
        assert_eq!(plan.debit.kind, TransactionKind::Send);
        assert_eq!(plan.credit.kind, TransactionKind::Send);
        // Transfers always use server time
        assert_eq!(plan.debit.created_at, None);
        assert_eq!(plan.credit.created_at, None);
    }

    #[test]
    fn test_transfer_carries_display_info_not_codes_in_data() {
        let sender = account(dec!(1000), Currency::Ars);
        let receiver_acc = account(dec!(0), Currency::Ars);
        let rx = receiver(UserStatus::Protected);

        let plan =
            plan_transfer(&sender, &sender_display(), &rx, &receiver_acc, dec!(10)).unwrap();

        let debit_data = plan.debit.data.unwrap();
        assert_eq!(debit_data["name"], "Ana Gomez");
        assert_eq!(debit_data["email"], "ana@example.com");

        let credit_data = plan.credit.data.unwrap();
        assert_eq!(credit_data["name"], "Juan Perez");
        assert_eq!(credit_data["email"], "juan@example.com");
    }

    // Scenario: transfer of 2000 against balance 1000 fails, no drafts.
    #[test]
    fn test_transfer_insufficient_funds() {
        let sender = account(dec!(1000), Currency::Ars);
        let receiver_acc = account(dec!(0), Currency::Ars);
        let rx = receiver(UserStatus::Authorized);

        let result = plan_transfer(&sender, &sender_display(), &rx, &receiver_acc, dec!(2000));
        assert_eq!(
            result,
            Err(LedgerError::InsufficientFunds {
                balance: dec!(1000),
                requested: dec!(2000),
            })
        );
    }

    // Scenario: transfer to self fails before any mutation.
    #[test]
    fn test_transfer_to_self() {
        let sender = account(dec!(1000), Currency::Ars);
        let rx = receiver(UserStatus::Authorized);

        let result = plan_transfer(&sender, &sender_display(), &rx, &sender, dec!(100));
        assert_eq!(result, Err(LedgerError::SelfTransfer));
    }

    #[test]
    fn test_transfer_currency_mismatch() {
        let sender = account(dec!(1000), Currency::Ars);
        let receiver_acc = account(dec!(0), Currency::Usd);
        let rx = receiver(UserStatus::Authorized);

        let result = plan_transfer(&sender, &sender_display(), &rx, &receiver_acc, dec!(100));
        assert_eq!(
            result,
            Err(LedgerError::CurrencyMismatch {
                sender: Currency::Ars,
                receiver: Currency::Usd,
            })
        );
    }

    #[test]
    fn test_transfer_rejects_fractional_minimum() {
        let sender = account(dec!(1000), Currency::Ars);
        let receiver_acc = account(dec!(0), Currency::Ars);
        let rx = receiver(UserStatus::Authorized);

        let result = plan_transfer(&sender, &sender_display(), &rx, &receiver_acc, dec!(0.50));
        assert_eq!(result, Err(LedgerError::BelowMinimum(dec!(0.50))));
    }

    #[test]
    fn test_transfer_receiver_not_eligible() {
        let sender = account(dec!(1000), Currency::Ars);
        let receiver_acc = account(dec!(0), Currency::Ars);

        for status in [UserStatus::Pending, UserStatus::Confirmed] {
            let rx = receiver(status);
            let result = plan_transfer(&sender, &sender_display(), &rx, &receiver_acc, dec!(100));
            assert_eq!(result, Err(LedgerError::ReceiverNotEligible(status)));
        }
    }

    proptest! {
        /// A successful plan always produces additive-inverse amounts in
        /// a single currency: the pair nets to zero.
        #[test]
        fn prop_transfer_entries_are_additive_inverses(
            balance_units in 1u64..1_000_000,
            amount_units in 1u64..1_000_000,
        ) {
            prop_assume!(amount_units <= balance_units);
            let balance = Decimal::from(balance_units);
            let amount = Decimal::from(amount_units);

            let sender = account(balance, Currency::Ars);
            let receiver_acc = account(dec!(0), Currency::Ars);
            let rx = receiver(UserStatus::Authorized);

            let plan = plan_transfer(&sender, &sender_display(), &rx, &receiver_acc, amount)
                .unwrap();

            prop_assert_eq!(plan.debit.amount + plan.credit.amount, Decimal::ZERO);
            prop_assert_eq!(plan.debit.currency, plan.credit.currency);
        }

        /// Balance-consistency law: folding a sequence of planned
        /// operation amounts over a starting balance yields the same
        /// final balance as summing the produced entry amounts.
        #[test]
        fn prop_balance_equals_sum_of_entries(
            start_units in 0u64..10_000,
            recharges in prop::collection::vec(1u64..1_000, 0..10),
        ) {
            let mut balance = Decimal::from(start_units);
            let mut entry_sum = Decimal::ZERO;

            for units in recharges {
                let acc = AccountSnapshot {
                    id: Uuid::new_v4(),
                    code: "ACCOUNT001".into(),
                    balance,
                    currency: Currency::Ars,
                };
                let draft = plan_recharge(
                    &acc,
                    "Kiosco1",
                    Decimal::from(units),
                    Utc::now(),
                    None,
                ).unwrap();

                entry_sum += draft.amount;
                balance += draft.amount;
            }

            prop_assert_eq!(balance, Decimal::from(start_units) + entry_sum);
        }
    }
}
