//! Initial database migration.
//!
//! Creates the enums, tables, constraints, and indexes of the wallet ledger
//! schema. Balance integrity is enforced twice: the repository code refuses
//! overdrafts under a row lock, and the `CHECK (balance >= 0)` constraint
//! backstops any path that slips past it.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: WALLETS & PINS
        // ============================================================
        db.execute_unprepared(WALLETS_SQL).await?;
        db.execute_unprepared(TRANSFER_PINS_SQL).await?;

        // ============================================================
        // PART 3: LEDGER ENTRIES
        // ============================================================
        db.execute_unprepared(LEDGER_ENTRIES_SQL).await?;

        // ============================================================
        // PART 4: LOANS
        // ============================================================
        db.execute_unprepared(LOANS_SQL).await?;

        // ============================================================
        // PART 5: M-PESA TRANSACTIONS
        // ============================================================
        db.execute_unprepared(MPESA_TRANSACTIONS_SQL).await?;

        // ============================================================
        // PART 6: NOTIFICATIONS
        // ============================================================
        db.execute_unprepared(NOTIFICATIONS_SQL).await?;

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
-- Ledger entry kinds
CREATE TYPE entry_type AS ENUM (
    'top_up',
    'withdraw',
    'transfer'
);

-- Ledger entry status
CREATE TYPE entry_status AS ENUM (
    'pending',
    'completed',
    'failed'
);

-- Loan status
CREATE TYPE loan_status AS ENUM (
    'pending',
    'approved',
    'rejected',
    'repaid'
);

-- M-Pesa transaction status
CREATE TYPE mpesa_status AS ENUM (
    'pending',
    'completed',
    'failed',
    'cancelled'
);

-- Notification kinds
CREATE TYPE notification_kind AS ENUM (
    'low_balance',
    'loan_due',
    'deposit_success',
    'transfer_received'
);
";

const WALLETS_SQL: &str = r"
CREATE TABLE wallets (
    id UUID PRIMARY KEY,
    owner_id UUID NOT NULL UNIQUE,
    account_number VARCHAR(10) NOT NULL UNIQUE,
    balance NUMERIC(12, 2) NOT NULL DEFAULT 0 CHECK (balance >= 0),
    is_active BOOLEAN NOT NULL DEFAULT true,
    is_frozen BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const TRANSFER_PINS_SQL: &str = r"
CREATE TABLE transfer_pins (
    owner_id UUID PRIMARY KEY,
    pin_hash TEXT NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const LEDGER_ENTRIES_SQL: &str = r"
CREATE TABLE ledger_entries (
    id UUID PRIMARY KEY,
    entry_type entry_type NOT NULL,
    status entry_status NOT NULL,
    amount NUMERIC(12, 2) NOT NULL CHECK (amount > 0),
    sender_wallet_id UUID REFERENCES wallets(id),
    recipient_wallet_id UUID REFERENCES wallets(id),
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CHECK (sender_wallet_id IS NOT NULL OR recipient_wallet_id IS NOT NULL)
);

CREATE INDEX idx_ledger_entries_sender ON ledger_entries (sender_wallet_id, created_at DESC);
CREATE INDEX idx_ledger_entries_recipient ON ledger_entries (recipient_wallet_id, created_at DESC);
CREATE INDEX idx_ledger_entries_created_at ON ledger_entries (created_at DESC);
";

const LOANS_SQL: &str = r"
CREATE TABLE loans (
    id UUID PRIMARY KEY,
    owner_id UUID NOT NULL,
    principal NUMERIC(12, 2) NOT NULL CHECK (principal > 0),
    interest_rate NUMERIC(5, 2) NOT NULL CHECK (interest_rate >= 0),
    total_due NUMERIC(12, 2) NOT NULL CHECK (total_due >= principal),
    status loan_status NOT NULL,
    score SMALLINT NOT NULL CHECK (score BETWEEN 0 AND 100),
    applied_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    due_date DATE NOT NULL
);

-- At most one outstanding loan per owner.
CREATE UNIQUE INDEX uq_loans_one_approved_per_owner
    ON loans (owner_id) WHERE status = 'approved';
CREATE INDEX idx_loans_owner_applied_at ON loans (owner_id, applied_at DESC);
";

const MPESA_TRANSACTIONS_SQL: &str = r"
CREATE TABLE mpesa_transactions (
    id UUID PRIMARY KEY,
    owner_id UUID NOT NULL,
    phone_number VARCHAR(13) NOT NULL,
    amount NUMERIC(12, 2) NOT NULL CHECK (amount > 0),
    account_reference VARCHAR(100),
    description TEXT,
    checkout_request_id VARCHAR(100) NOT NULL UNIQUE,
    merchant_request_id VARCHAR(100),
    mpesa_receipt_number VARCHAR(100),
    result_code VARCHAR(10),
    result_desc VARCHAR(255),
    status mpesa_status NOT NULL DEFAULT 'pending',
    ledger_entry_id UUID NOT NULL REFERENCES ledger_entries(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_mpesa_transactions_owner ON mpesa_transactions (owner_id, created_at DESC);
";

const NOTIFICATIONS_SQL: &str = r"
CREATE TABLE notifications (
    id UUID PRIMARY KEY,
    owner_id UUID NOT NULL,
    kind notification_kind NOT NULL,
    message TEXT NOT NULL,
    is_read BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_notifications_owner ON notifications (owner_id, created_at DESC);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS notifications;
DROP TABLE IF EXISTS mpesa_transactions;
DROP TABLE IF EXISTS loans;
DROP TABLE IF EXISTS ledger_entries;
DROP TABLE IF EXISTS transfer_pins;
DROP TABLE IF EXISTS wallets;

DROP TYPE IF EXISTS notification_kind;
DROP TYPE IF EXISTS mpesa_status;
DROP TYPE IF EXISTS loan_status;
DROP TYPE IF EXISTS entry_status;
DROP TYPE IF EXISTS entry_type;
";
