//! Initial database migration.
//!
//! Creates the agency-scoped CRM schema: enums, tables, the `updated_at`
//! trigger, the `client_summary` view and the lookup indexes.

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
        // PART 2: TENANTS
        // ============================================================
        db.execute_unprepared(AGENCIES_SQL).await?;

        // ============================================================
        // PART 3: CLIENTS & POLICIES
        // ============================================================
        db.execute_unprepared(CLIENTS_SQL).await?;
        db.execute_unprepared(CLIENT_NOTES_SQL).await?;
        db.execute_unprepared(POLICIES_SQL).await?;

        // ============================================================
        // PART 4: ACTIVITIES & DOCUMENTS
        // ============================================================
        db.execute_unprepared(ACTIVITIES_SQL).await?;
        db.execute_unprepared(DOCUMENTS_SQL).await?;

        // ============================================================
        // PART 5: TRIGGERS & FUNCTIONS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        // ============================================================
        // PART 6: VIEWS
        // ============================================================
        db.execute_unprepared(VIEWS_SQL).await?;

        // ============================================================
        // PART 7: INDEXES
        // ============================================================
        db.execute_unprepared(INDEXES_SQL).await?;

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
-- Line of insurance
CREATE TYPE policy_type AS ENUM (
    'auto',
    'home',
    'life',
    'health',
    'business',
    'umbrella',
    'other'
);

-- Policy lifecycle
CREATE TYPE policy_status AS ENUM (
    'active',
    'expired',
    'cancelled',
    'pending'
);

-- Activity kinds
CREATE TYPE activity_type AS ENUM (
    'call',
    'email',
    'task',
    'meeting',
    'note'
);
";

const AGENCIES_SQL: &str = r"
CREATE TABLE agencies (
    id              UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name            VARCHAR(255) NOT NULL,
    timezone        VARCHAR(50) NOT NULL DEFAULT 'UTC',
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const CLIENTS_SQL: &str = r"
CREATE TABLE clients (
    id              UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    agency_id       UUID NOT NULL REFERENCES agencies(id) ON DELETE CASCADE,
    first_name      VARCHAR(100) NOT NULL,
    last_name       VARCHAR(100) NOT NULL,
    email           VARCHAR(255),
    phone           VARCHAR(20),
    address         TEXT,
    notes           TEXT,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_client_first_name CHECK (length(trim(first_name)) > 0),
    CONSTRAINT chk_client_last_name CHECK (length(trim(last_name)) > 0)
);

-- One client per email per agency, case-insensitive
CREATE UNIQUE INDEX uq_clients_agency_email
    ON clients(agency_id, lower(email))
    WHERE email IS NOT NULL;
";

const CLIENT_NOTES_SQL: &str = r"
CREATE TABLE client_notes (
    id              UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    agency_id       UUID NOT NULL REFERENCES agencies(id) ON DELETE CASCADE,
    client_id       UUID NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
    content         TEXT NOT NULL,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_note_content CHECK (length(trim(content)) > 0)
);
";

const POLICIES_SQL: &str = r"
CREATE TABLE policies (
    id              UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    agency_id       UUID NOT NULL REFERENCES agencies(id) ON DELETE CASCADE,
    client_id       UUID NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
    carrier         VARCHAR(255) NOT NULL,
    policy_number   VARCHAR(100) NOT NULL,
    policy_type     policy_type NOT NULL,
    effective_date  DATE NOT NULL,
    expiration_date DATE NOT NULL,
    premium         NUMERIC(12, 2) NOT NULL DEFAULT 0,
    details         JSONB NOT NULL DEFAULT '{}',
    status          policy_status NOT NULL DEFAULT 'active',
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_policy_term CHECK (expiration_date > effective_date),
    CONSTRAINT chk_policy_premium CHECK (premium >= 0),
    CONSTRAINT chk_policy_details CHECK (jsonb_typeof(details) = 'object')
);
";

const ACTIVITIES_SQL: &str = r"
CREATE TABLE activities (
    id              UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    agency_id       UUID NOT NULL REFERENCES agencies(id) ON DELETE CASCADE,
    activity_type   activity_type NOT NULL,
    description     TEXT NOT NULL,
    client_id       UUID REFERENCES clients(id) ON DELETE CASCADE,
    policy_id       UUID REFERENCES policies(id) ON DELETE CASCADE,
    due_date        TIMESTAMPTZ,
    completed       BOOLEAN NOT NULL DEFAULT false,
    completed_at    TIMESTAMPTZ,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_activity_description CHECK (length(trim(description)) > 0),
    CONSTRAINT chk_activity_completion CHECK (completed OR completed_at IS NULL)
);
";

const DOCUMENTS_SQL: &str = r"
CREATE TABLE documents (
    id              UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    agency_id       UUID NOT NULL REFERENCES agencies(id) ON DELETE CASCADE,
    client_id       UUID REFERENCES clients(id) ON DELETE CASCADE,
    policy_id       UUID REFERENCES policies(id) ON DELETE CASCADE,
    file_name       VARCHAR(255) NOT NULL,
    file_path       TEXT NOT NULL,
    file_size       BIGINT,
    mime_type       VARCHAR(100),
    uploaded_at     TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_documents_path UNIQUE (file_path),
    CONSTRAINT chk_document_size CHECK (file_size IS NULL OR file_size >= 0)
);
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: set_updated_at
-- Stamps updated_at on every row update
-- ============================================================
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = NOW();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_agencies_updated_at
BEFORE UPDATE ON agencies
FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_clients_updated_at
BEFORE UPDATE ON clients
FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_client_notes_updated_at
BEFORE UPDATE ON client_notes
FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_policies_updated_at
BEFORE UPDATE ON policies
FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_activities_updated_at
BEFORE UPDATE ON activities
FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const VIEWS_SQL: &str = r"
-- ============================================================
-- VIEW: client_summary
-- Clients with policy counts and active premium
-- ============================================================
CREATE VIEW client_summary AS
SELECT
    c.id,
    c.agency_id,
    c.first_name,
    c.last_name,
    c.email,
    c.phone,
    c.address,
    c.notes,
    c.created_at,
    c.updated_at,
    COUNT(p.id)::BIGINT AS policy_count,
    COUNT(p.id) FILTER (WHERE p.status = 'active')::BIGINT AS active_policies,
    COALESCE(SUM(p.premium) FILTER (WHERE p.status = 'active'), 0)::NUMERIC(14, 2)
        AS total_premium
FROM clients c
LEFT JOIN policies p ON p.client_id = c.id
GROUP BY c.id;
";

const INDEXES_SQL: &str = r"
CREATE INDEX idx_clients_agency ON clients(agency_id, created_at DESC);
CREATE INDEX idx_clients_name ON clients(agency_id, lower(last_name), lower(first_name));

CREATE INDEX idx_client_notes_client ON client_notes(agency_id, client_id, created_at DESC);

CREATE INDEX idx_policies_agency ON policies(agency_id, created_at DESC);
CREATE INDEX idx_policies_client ON policies(agency_id, client_id);
CREATE INDEX idx_policies_status ON policies(agency_id, status);
CREATE INDEX idx_policies_type ON policies(agency_id, policy_type);
CREATE INDEX idx_policies_expiration ON policies(agency_id, expiration_date)
    WHERE status = 'active';
CREATE INDEX idx_policies_number ON policies(agency_id, lower(policy_number));

CREATE INDEX idx_activities_agency_due ON activities(agency_id, due_date);
CREATE INDEX idx_activities_client ON activities(agency_id, client_id);
CREATE INDEX idx_activities_policy ON activities(agency_id, policy_id);
CREATE INDEX idx_activities_open ON activities(agency_id, due_date)
    WHERE completed = false;

CREATE INDEX idx_documents_agency ON documents(agency_id, uploaded_at DESC);
CREATE INDEX idx_documents_client ON documents(agency_id, client_id);
CREATE INDEX idx_documents_policy ON documents(agency_id, policy_id);
";

const DROP_ALL_SQL: &str = r"
-- ============================================================
-- DROP ALL: Rollback migration
-- Order matters due to foreign key constraints
-- ============================================================

-- Drop views first
DROP VIEW IF EXISTS client_summary CASCADE;

-- Drop triggers
DROP TRIGGER IF EXISTS trg_activities_updated_at ON activities;
DROP TRIGGER IF EXISTS trg_policies_updated_at ON policies;
DROP TRIGGER IF EXISTS trg_client_notes_updated_at ON client_notes;
DROP TRIGGER IF EXISTS trg_clients_updated_at ON clients;
DROP TRIGGER IF EXISTS trg_agencies_updated_at ON agencies;

-- Drop functions
DROP FUNCTION IF EXISTS set_updated_at();

-- Drop tables (reverse order of creation)
DROP TABLE IF EXISTS documents CASCADE;
DROP TABLE IF EXISTS activities CASCADE;
DROP TABLE IF EXISTS policies CASCADE;
DROP TABLE IF EXISTS client_notes CASCADE;
DROP TABLE IF EXISTS clients CASCADE;
DROP TABLE IF EXISTS agencies CASCADE;

-- Drop enums
DROP TYPE IF EXISTS activity_type CASCADE;
DROP TYPE IF EXISTS policy_status CASCADE;
DROP TYPE IF EXISTS policy_type CASCADE;
";
