// src/storage/postgres.rs

//! PostgreSQL store for debtor records.
//!
//! Owns the connection pool and implements the upsert sink, the stale-row
//! reaper and the DDL capability used by the shadow-swap manager. Every
//! method that interpolates a table name validates it first.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::config::DatabaseConfig;
use crate::error::Result;
use crate::models::{CompletedCrawl, DebtorRecord, Variant};
use crate::storage::{
    INSERT_COLUMNS, RecordSink, reap_statement, swap_statements, upsert_conflict_clause,
    validate_identifier,
};

pub struct DebtorStore {
    pool: PgPool,
}

impl DebtorStore {
    /// Connect a pool with the configured size.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;
        Ok(Self { pool })
    }

    /// Create the debtor table and the variant reference table if absent,
    /// then seed the six reference rows.
    pub async fn init_schema(&self, table: &str) -> Result<()> {
        validate_identifier(table)?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS debt_type_ref (
                id BIGINT PRIMARY KEY,
                title TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id BIGSERIAL PRIMARY KEY,
                created TIMESTAMPTZ NOT NULL DEFAULT now(),
                last_updated TIMESTAMPTZ NOT NULL DEFAULT now(),
                identifier TEXT,
                debt_type_id BIGINT REFERENCES debt_type_ref (id),
                fio TEXT,
                category TEXT,
                provider TEXT,
                app_num TEXT,
                app_date TIMESTAMP,
                procedure_start_date TIMESTAMP,
                procedure_end_date TIMESTAMP,
                procedure_stop_num TEXT,
                decision_date TIMESTAMP,
                decision_start_date TIMESTAMP,
                stop_initiator TEXT,
                status TEXT,
                creditors_list TEXT,
                debt_sum BIGINT,
                region TEXT,
                hash_value TEXT NOT NULL,
                CONSTRAINT uq_hash_value UNIQUE (hash_value)
            )"
        ))
        .execute(&self.pool)
        .await?;

        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS idx_{table}_identifier ON {table} (identifier)"
        ))
        .execute(&self.pool)
        .await?;

        for variant in Variant::ALL {
            sqlx::query(
                "INSERT INTO debt_type_ref (id, title) VALUES ($1, $2)
                 ON CONFLICT (id) DO NOTHING",
            )
            .bind(variant.id())
            .bind(variant.title())
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    /// Upsert a batch in one statement inside one transaction.
    ///
    /// New rows are inserted; an existing identity hash refreshes all
    /// business fields and bumps `last_updated`, leaving `created` alone.
    pub async fn bulk_upsert(&self, table: &str, batch: &[DebtorRecord]) -> Result<u64> {
        validate_identifier(table)?;
        if batch.is_empty() {
            return Ok(0);
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "INSERT INTO {table} ({}) ",
            INSERT_COLUMNS.join(", ")
        ));
        builder.push_values(batch, |mut row, record| {
            row.push_bind(&record.hash_value)
                .push_bind(record.debt_type_id)
                .push_bind(&record.identifier)
                .push_bind(&record.fio)
                .push_bind(&record.category)
                .push_bind(&record.provider)
                .push_bind(&record.app_num)
                .push_bind(record.app_date)
                .push_bind(record.procedure_start_date)
                .push_bind(record.procedure_end_date)
                .push_bind(&record.procedure_stop_num)
                .push_bind(record.decision_date)
                .push_bind(record.decision_start_date)
                .push_bind(&record.stop_initiator)
                .push_bind(&record.status)
                .push_bind(&record.creditors_list)
                .push_bind(record.debt_sum)
                .push_bind(&record.region);
        });
        builder.push(upsert_conflict_clause());

        let mut tx = self.pool.begin().await?;
        let result = builder.build().execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(result.rows_affected())
    }

    /// Delete the crawled variant's rows not touched since the run began.
    ///
    /// Takes the completion proof rather than a bare cutoff so only a
    /// fully successful crawl can trigger deletion.
    pub async fn reap(&self, table: &str, crawl: &CompletedCrawl) -> Result<u64> {
        validate_identifier(table)?;
        let result = sqlx::query(&reap_statement(table))
            .bind(crawl.variant().id())
            .bind(crawl.started_at())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn drop_table_if_exists(&self, table: &str) -> Result<()> {
        validate_identifier(table)?;
        sqlx::query(&format!("DROP TABLE IF EXISTS {table}"))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Create `table` with the same columns, constraints and indexes as
    /// `like`.
    pub async fn create_table_like(&self, table: &str, like: &str) -> Result<()> {
        validate_identifier(table)?;
        validate_identifier(like)?;
        sqlx::query(&format!(
            "CREATE TABLE {table} (LIKE {like} INCLUDING ALL)"
        ))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn table_exists(&self, table: &str) -> Result<bool> {
        validate_identifier(table)?;
        let found: Option<String> = sqlx::query_scalar("SELECT to_regclass($1)::text")
            .bind(table)
            .fetch_one(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    /// Atomically promote the shadow table: rename the base away, rename
    /// the shadow into its place, drop the renamed-away base. All three
    /// steps run in one transaction, so concurrent readers observe either
    /// the old table or the new one, never an intermediate state.
    pub async fn swap_tables(&self, base: &str, shadow: &str, backup: &str) -> Result<()> {
        validate_identifier(base)?;
        validate_identifier(shadow)?;
        validate_identifier(backup)?;

        let mut tx = self.pool.begin().await?;
        for statement in swap_statements(base, shadow, backup) {
            sqlx::query(&statement).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl RecordSink for DebtorStore {
    async fn upsert_batch(&self, table: &str, batch: &[DebtorRecord]) -> Result<u64> {
        self.bulk_upsert(table, batch).await
    }
}
