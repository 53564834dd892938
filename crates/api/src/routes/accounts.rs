//! Wallet account routes: recharge, transfer, listings, statistics and
//! CVU association.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use monedero_core::ledger::{Address, Currency, TransactionKind};
use monedero_core::stats::{Frequency, PeriodWindow, StatEntry, aggregate, effective_limit};
use monedero_db::entities::transactions;
use monedero_db::repositories::ledger::RechargeInput;
use monedero_db::{
    AccountRepository, LedgerOrchestrator, TransactionRepository, UserRepository,
};
use monedero_shared::AppError;

/// Page-size bounds for the transaction listing.
const PAGE_LIMIT_MIN: u64 = 5;
const PAGE_LIMIT_MAX: u64 = 50;
const PAGE_LIMIT_DEFAULT: u64 = 15;

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts/recharge", post(recharge))
        .route("/accounts/transfer", post(transfer))
        .route("/accounts/transactions", get(list_transactions))
        .route("/accounts/statistics", get(statistics))
        .route("/accounts/current", get(current_account))
        .route("/accounts/cvu", post(associate_cvu))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for a recharge.
#[derive(Debug, Deserialize)]
pub struct RechargeRequest {
    /// The account's recharge code.
    pub recharge_code: String,
    /// Store where the cash was deposited.
    pub store: String,
    /// Deposited amount.
    pub amount: Decimal,
    /// Timestamp reported by the payment network; defaults to now.
    pub date: Option<DateTime<Utc>>,
    /// Store address, verified externally when present.
    pub address: Option<Address>,
}

/// Request body for a transfer.
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    /// Receiver's email address.
    pub email: String,
    /// Amount to move.
    pub amount: Decimal,
}

/// Request body for CVU association.
#[derive(Debug, Default, Deserialize)]
pub struct AssociateCvuRequest {
    /// Externally assigned CVU; a fresh one is generated when omitted.
    pub cvu: Option<String>,
}

/// Query parameters for the transaction listing.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Page size, clamped to 5..=50 (default: 15).
    pub limit: Option<u64>,
    /// Number of entries to skip (default: 0).
    pub offset: Option<u64>,
}

/// Query parameters for statistics.
#[derive(Debug, Deserialize)]
pub struct StatisticsQuery {
    /// Bucket width: "day", "week" or "month" (default: day).
    pub frequency: Option<String>,
    /// Number of buckets, capped at twice the frequency default.
    pub limit: Option<u32>,
}

/// A ledger entry as exposed to clients, with the redaction rule applied.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: Uuid,
    /// Public transaction code.
    pub code: String,
    /// Counterparty reference; absent on `send` entries.
    pub involved: Option<String>,
    /// Signed amount.
    pub amount: Decimal,
    /// Entry kind.
    pub kind: &'static str,
    /// Currency.
    pub currency: &'static str,
    /// Attached payload (store address or counterparty display info).
    pub data: Option<serde_json::Value>,
    /// Creation timestamp.
    pub created_at: String,
}

impl From<transactions::Model> for TransactionResponse {
    fn from(model: transactions::Model) -> Self {
        let kind = TransactionKind::from(model.kind);
        let currency = Currency::from(model.currency);
        let involved = if kind.redacts_involved() {
            None
        } else {
            Some(model.involved)
        };

        Self {
            id: model.id,
            code: model.code,
            involved,
            amount: model.amount,
            kind: kind.as_str(),
            currency: currency.as_str(),
            data: model.data,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

/// The caller's account as exposed to clients.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Account ID.
    pub id: Uuid,
    /// Public account code.
    pub code: String,
    /// Recharge code for cash-in networks.
    pub recharge_code: String,
    /// Current balance.
    pub balance: Decimal,
    /// Currency.
    pub currency: &'static str,
    /// Interbank CVU, when associated.
    pub cvu: Option<String>,
}

impl From<monedero_db::entities::accounts::Model> for AccountResponse {
    fn from(model: monedero_db::entities::accounts::Model) -> Self {
        let currency = Currency::from(model.currency);
        Self {
            id: model.id,
            code: model.code,
            recharge_code: model.recharge_code,
            balance: model.balance,
            currency: currency.as_str(),
            cvu: model.cvu,
        }
    }
}

/// Clamps a requested page size into the allowed bounds.
fn clamp_page_limit(requested: Option<u64>) -> u64 {
    requested
        .unwrap_or(PAGE_LIMIT_DEFAULT)
        .clamp(PAGE_LIMIT_MIN, PAGE_LIMIT_MAX)
}

/// Renders an [`AppError`] as a JSON error response.
fn error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.to_string(),
        })),
    )
        .into_response()
}

fn orchestrator(state: &AppState) -> LedgerOrchestrator {
    LedgerOrchestrator::new(
        AccountRepository::new((*state.db).clone()).with_policy(state.code_policy),
        TransactionRepository::new((*state.db).clone()).with_policy(state.code_policy),
        UserRepository::new((*state.db).clone()),
    )
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/accounts/recharge` - Credit an account from a cash deposit.
async fn recharge(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<RechargeRequest>,
) -> impl IntoResponse {
    if let Err(rejection) = auth.require_authorized() {
        return rejection.into_response();
    }

    let georef = state.georef.clone();
    let input = RechargeInput {
        recharge_code: payload.recharge_code,
        store: payload.store,
        amount: payload.amount,
        date: payload.date.unwrap_or_else(Utc::now),
        address: payload.address,
    };

    let result = orchestrator(&state)
        .recharge(input, move |address| async move {
            georef.verify(&address).await
        })
        .await;

    match result {
        Ok(entry) => (
            StatusCode::CREATED,
            Json(json!({ "transaction": TransactionResponse::from(entry) })),
        )
            .into_response(),
        Err(e) => {
            let app = AppError::from(e);
            error!(error = %app, "recharge failed");
            error_response(&app)
        }
    }
}

/// POST `/accounts/transfer` - Move money to another user by email.
async fn transfer(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<TransferRequest>,
) -> impl IntoResponse {
    if let Err(rejection) = auth.require_authorized() {
        return rejection.into_response();
    }

    let result = orchestrator(&state)
        .transfer(auth.caller(), &payload.email, payload.amount)
        .await;

    match result {
        Ok(outcome) => {
            info!(
                receiver = %outcome.receiver.email,
                amount = %outcome.amount,
                "transfer completed"
            );

            // Notification must never block or fail the response.
            let email_service = state.email_service.clone();
            let receiver_email = outcome.receiver.email.clone();
            let receiver_name = outcome.receiver.name.clone();
            let sender_name = outcome.sender_display.name.clone();
            let amount = outcome.amount.to_string();
            let currency = Currency::from(outcome.currency).as_str();
            tokio::spawn(async move {
                if let Err(e) = email_service
                    .send_transfer_received(
                        &receiver_email,
                        &receiver_name,
                        &sender_name,
                        &amount,
                        currency,
                    )
                    .await
                {
                    warn!(error = %e, "transfer notification email failed");
                }
            });

            (
                StatusCode::CREATED,
                Json(json!({ "transaction": TransactionResponse::from(outcome.debit) })),
            )
                .into_response()
        }
        Err(e) => {
            let app = AppError::from(e);
            error!(error = %app, "transfer failed");
            error_response(&app)
        }
    }
}

/// GET `/accounts/transactions` - Paginated ledger listing for the caller.
async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListTransactionsQuery>,
) -> impl IntoResponse {
    if let Err(rejection) = auth.require_authorized() {
        return rejection.into_response();
    }

    let account_id = match orchestrator(&state).account_for(auth.caller()).await {
        Ok(id) => id,
        Err(e) => return error_response(&AppError::from(e)),
    };

    let limit = clamp_page_limit(query.limit);
    let offset = query.offset.unwrap_or(0);

    let tx_repo = TransactionRepository::new((*state.db).clone());
    match tx_repo.list_page(account_id, limit, offset).await {
        Ok(page) => {
            let rows: Vec<TransactionResponse> =
                page.rows.into_iter().map(TransactionResponse::from).collect();
            (
                StatusCode::OK,
                Json(json!({ "transactions": rows, "count": page.count })),
            )
                .into_response()
        }
        Err(e) => error_response(&AppError::from(e)),
    }
}

/// GET `/accounts/statistics` - Incoming/outgoing buckets for the caller.
async fn statistics(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<StatisticsQuery>,
) -> impl IntoResponse {
    if let Err(rejection) = auth.require_authorized() {
        return rejection.into_response();
    }

    let frequency = match query.frequency.as_deref() {
        None => Frequency::Day,
        Some(s) => match Frequency::parse(s) {
            Some(f) => f,
            None => {
                return error_response(&AppError::Validation(format!(
                    "unknown frequency '{s}', expected day, week or month"
                )));
            }
        },
    };
    let limit = effective_limit(frequency, query.limit);
    let window = PeriodWindow::compute(Utc::now(), frequency, limit);

    let account_id = match orchestrator(&state).account_for(auth.caller()).await {
        Ok(id) => id,
        Err(e) => return error_response(&AppError::from(e)),
    };

    let tx_repo = TransactionRepository::new((*state.db).clone());
    let page = match tx_repo
        .list_range(account_id, window.start, window.end)
        .await
    {
        Ok(page) => page,
        Err(e) => return error_response(&AppError::from(e)),
    };

    let entries: Vec<StatEntry> = page
        .rows
        .iter()
        .map(|row| StatEntry {
            amount: row.amount,
            created_at: row.created_at.to_utc(),
        })
        .collect();

    let stats = aggregate(&entries, window.start, frequency, limit);
    (StatusCode::OK, Json(stats)).into_response()
}

/// GET `/accounts/current` - The caller's account.
async fn current_account(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(rejection) = auth.require_authorized() {
        return rejection.into_response();
    }

    let account_repo = AccountRepository::new((*state.db).clone());
    match account_repo.find_by_owner(auth.user_id()).await {
        Ok(Some(account)) => (
            StatusCode::OK,
            Json(json!({ "account": AccountResponse::from(account) })),
        )
            .into_response(),
        Ok(None) => error_response(&AppError::NotFound("account not found".to_string())),
        Err(e) => error_response(&AppError::from(e)),
    }
}

/// POST `/accounts/cvu` - Associate a CVU with the caller's account.
async fn associate_cvu(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Option<Json<AssociateCvuRequest>>,
) -> impl IntoResponse {
    if let Err(rejection) = auth.require_authorized() {
        return rejection.into_response();
    }

    let Json(payload) = payload.unwrap_or_default();

    let account_repo = AccountRepository::new((*state.db).clone());
    let account = match account_repo.find_by_owner(auth.user_id()).await {
        Ok(Some(account)) => account,
        Ok(None) => return error_response(&AppError::NotFound("account not found".to_string())),
        Err(e) => return error_response(&AppError::from(e)),
    };

    match account_repo.associate_cvu(account.id, payload.cvu).await {
        Ok(updated) => {
            info!(account_id = %updated.id, "cvu associated");
            (
                StatusCode::OK,
                Json(json!({ "account": AccountResponse::from(updated) })),
            )
                .into_response()
        }
        Err(e) => error_response(&AppError::from(e)),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use monedero_db::entities::sea_orm_active_enums;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    use super::*;

    fn entry(kind: sea_orm_active_enums::TransactionKind) -> transactions::Model {
        transactions::Model {
            id: Uuid::new_v4(),
            code: "a".repeat(16),
            account_id: Uuid::new_v4(),
            involved: "counterparty".to_string(),
            amount: dec!(100),
            kind,
            currency: sea_orm_active_enums::Currency::Ars,
            data: None,
            created_at: Utc::now().into(),
        }
    }

    #[rstest]
    #[case(None, 15)]
    #[case(Some(0), 5)]
    #[case(Some(5), 5)]
    #[case(Some(23), 23)]
    #[case(Some(50), 50)]
    #[case(Some(500), 50)]
    fn page_limit_is_clamped(#[case] requested: Option<u64>, #[case] expected: u64) {
        assert_eq!(clamp_page_limit(requested), expected);
    }

    #[test]
    fn send_entries_are_redacted() {
        let response =
            TransactionResponse::from(entry(sea_orm_active_enums::TransactionKind::Send));
        assert_eq!(response.involved, None);
        assert_eq!(response.kind, "send");
    }

    #[test]
    fn non_send_entries_keep_involved() {
        for kind in [
            sea_orm_active_enums::TransactionKind::Recharge,
            sea_orm_active_enums::TransactionKind::Transfer,
            sea_orm_active_enums::TransactionKind::Debit,
        ] {
            let response = TransactionResponse::from(entry(kind));
            assert_eq!(response.involved.as_deref(), Some("counterparty"));
        }
    }
}
