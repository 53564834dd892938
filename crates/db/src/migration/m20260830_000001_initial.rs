//! Initial database migration.
//!
//! Creates the enums, the users / accounts / transactions tables, and the
//! unique and foreign-key indexes the repositories rely on.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(TRANSACTIONS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Account and transaction currency
CREATE TYPE currency AS ENUM ('ARS', 'USD');

-- Ledger entry kinds
CREATE TYPE transaction_kind AS ENUM (
    'recharge',
    'transfer',
    'send',
    'debit'
);

-- User onboarding status
CREATE TYPE user_status AS ENUM (
    'pending',
    'confirmed',
    'protected',
    'authorized'
);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY,
    email VARCHAR(255) NOT NULL UNIQUE,
    name VARCHAR(100) NOT NULL,
    surname VARCHAR(100) NOT NULL,
    status user_status NOT NULL DEFAULT 'pending',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_users_email ON users (email);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL UNIQUE REFERENCES users (id),
    code VARCHAR(10) NOT NULL UNIQUE,
    recharge_code VARCHAR(10) NOT NULL UNIQUE,
    balance NUMERIC(19, 4) NOT NULL DEFAULT 0,
    currency currency NOT NULL DEFAULT 'ARS',
    cvu VARCHAR(22),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_accounts_code ON accounts (code);
CREATE INDEX idx_accounts_recharge_code ON accounts (recharge_code);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY,
    code VARCHAR(16) NOT NULL UNIQUE,
    account_id UUID NOT NULL REFERENCES accounts (id),
    involved VARCHAR(255) NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    kind transaction_kind NOT NULL,
    currency currency NOT NULL,
    data JSONB,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_transactions_code ON transactions (code);
CREATE INDEX idx_transactions_account_created
    ON transactions (account_id, created_at DESC);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS transactions;
DROP TABLE IF EXISTS accounts;
DROP TABLE IF EXISTS users;
DROP TYPE IF EXISTS transaction_kind;
DROP TYPE IF EXISTS user_status;
DROP TYPE IF EXISTS currency;
";
