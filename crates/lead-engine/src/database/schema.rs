//! Database schema definitions for the lead distributor.
//!
//! Tables for operators, leads, sources, operator-source assignments and
//! contacts. All DDL is idempotent (`IF NOT EXISTS`) and runs at startup.
//!
//! `REFERENCES` clauses are declarative only: the distribution path must
//! treat an unknown source as "no eligible operators", and assignment
//! creation validates its referents in code.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::Result;

/// Create the operators table
pub async fn create_operators_table(pool: &SqlitePool) -> Result<()> {
    debug!("📋 Creating operators table");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS operators (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT true,
            max_load INTEGER NOT NULL DEFAULT 10,
            current_load INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the leads table
pub async fn create_leads_table(pool: &SqlitePool) -> Result<()> {
    debug!("📋 Creating leads table");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS leads (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            external_id TEXT NOT NULL UNIQUE,
            email TEXT,
            phone TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the sources table
pub async fn create_sources_table(pool: &SqlitePool) -> Result<()> {
    debug!("📋 Creating sources table");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sources (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the operator-source assignments table
pub async fn create_assignments_table(pool: &SqlitePool) -> Result<()> {
    debug!("📋 Creating assignments table");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS assignments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            operator_id INTEGER NOT NULL REFERENCES operators(id),
            source_id INTEGER NOT NULL REFERENCES sources(id),
            weight INTEGER NOT NULL DEFAULT 1
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the contacts table
pub async fn create_contacts_table(pool: &SqlitePool) -> Result<()> {
    debug!("📋 Creating contacts table");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS contacts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            lead_id INTEGER NOT NULL REFERENCES leads(id),
            source_id INTEGER NOT NULL REFERENCES sources(id),
            operator_id INTEGER REFERENCES operators(id),
            message TEXT,
            status TEXT NOT NULL DEFAULT 'new',
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create indexes for common lookups
pub async fn create_indexes(pool: &SqlitePool) -> Result<()> {
    debug!("📋 Creating indexes");

    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_assignments_source ON assignments(source_id)",
        "CREATE INDEX IF NOT EXISTS idx_assignments_operator ON assignments(operator_id)",
        "CREATE INDEX IF NOT EXISTS idx_contacts_lead ON contacts(lead_id)",
        "CREATE INDEX IF NOT EXISTS idx_contacts_operator ON contacts(operator_id)",
        "CREATE INDEX IF NOT EXISTS idx_contacts_source ON contacts(source_id)",
    ];

    for index in indexes {
        sqlx::query(index).execute(pool).await?;
    }

    Ok(())
}
