//! Domain types for ledger planning.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account currency. Immutable once the account is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    /// Argentine peso.
    #[serde(rename = "ARS")]
    Ars,
    /// US dollar.
    #[serde(rename = "USD")]
    Usd,
}

impl Currency {
    /// Returns the ISO-ish wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ars => "ARS",
            Self::Usd => "USD",
        }
    }

    /// Parses a currency from its wire representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ARS" => Some(Self::Ars),
            "USD" => Some(Self::Usd),
            _ => None,
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Cash-in through a physical payment network, keyed by recharge code.
    Recharge,
    /// External bank transfer.
    Transfer,
    /// Peer-to-peer debit/credit pair between two wallet accounts.
    Send,
    /// Card or merchant debit.
    Debit,
}

impl TransactionKind {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Recharge => "recharge",
            Self::Transfer => "transfer",
            Self::Send => "send",
            Self::Debit => "debit",
        }
    }

    /// Whether the `involved` field of an entry of this kind is stripped
    /// when the entry is exposed externally. The sender-side record of a
    /// `send` never reveals the counterparty account code; the display
    /// info carried in `data` is what the client renders instead.
    #[must_use]
    pub const fn redacts_involved(self) -> bool {
        matches!(self, Self::Send)
    }
}

/// Onboarding status of a user, as recorded by the user directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Registered, email not confirmed.
    Pending,
    /// Email confirmed.
    Confirmed,
    /// Identity verified.
    Protected,
    /// Fully onboarded.
    Authorized,
}

impl UserStatus {
    /// Whether a user at this trust level can receive transfers.
    #[must_use]
    pub const fn can_receive_transfers(self) -> bool {
        matches!(self, Self::Protected | Self::Authorized)
    }

    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Protected => "protected",
            Self::Authorized => "authorized",
        }
    }
}

/// Snapshot of an account, as read from the store at planning time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSnapshot {
    /// Account ID.
    pub id: Uuid,
    /// Public account code.
    pub code: String,
    /// Balance at read time.
    pub balance: Decimal,
    /// Account currency.
    pub currency: Currency,
}

/// Counterparty display info attached to `send` entries in place of the
/// raw account code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayInfo {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
}

/// Receiver as resolved by the user directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiverProfile {
    /// User ID.
    pub user_id: Uuid,
    /// Onboarding status.
    pub status: UserStatus,
    /// First name.
    pub name: String,
    /// Surname.
    pub surname: String,
    /// Email address.
    pub email: String,
}

impl ReceiverProfile {
    /// Display info for the receiver, as attached to the sender's entry.
    #[must_use]
    pub fn display_info(&self) -> DisplayInfo {
        DisplayInfo {
            name: format!("{} {}", self.name, self.surname),
            email: self.email.clone(),
        }
    }
}

/// A store address attached to a recharge, verified externally before use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Province name.
    pub province: String,
    /// Department name.
    pub department: String,
    /// Locality name.
    pub locality: String,
    /// Street name.
    pub street: String,
    /// Street number.
    pub number: u32,
}

impl Address {
    /// Cross-field shape check: all name parts present, number positive.
    /// External verification against the address service happens after
    /// this and is the caller's responsibility.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.number > 0
            && ![
                &self.province,
                &self.department,
                &self.locality,
                &self.street,
            ]
            .iter()
            .any(|s| s.trim().is_empty())
    }
}

/// A ledger entry waiting to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    /// Account the entry belongs to.
    pub account_id: Uuid,
    /// Counterparty reference: store name or counterpart account code.
    pub involved: String,
    /// Signed amount: positive = credit, negative = debit.
    pub amount: Decimal,
    /// Entry kind.
    pub kind: TransactionKind,
    /// Currency, copied from the account at planning time.
    pub currency: Currency,
    /// Free-form attached context (address, counterparty display info).
    pub data: Option<serde_json::Value>,
    /// Caller-supplied creation time; `None` means server time at insert.
    pub created_at: Option<DateTime<Utc>>,
}

/// The ordered pair of entries a transfer produces. The debit must be
/// durably recorded (and the sender's balance adjusted) before the credit
/// side begins, so a crash mid-transfer leaves at most an orphaned debit
/// with a ledger trace, never an unaccounted balance change.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferPlan {
    /// Sender-side entry (negative amount).
    pub debit: EntryDraft,
    /// Receiver-side entry (positive amount).
    pub credit: EntryDraft,
}
