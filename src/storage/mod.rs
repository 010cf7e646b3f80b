// src/storage/mod.rs

//! Persistence seam for debtor records.
//!
//! The pipeline writes through the [`RecordSink`] trait so the shadow-swap
//! manager can point a full crawl at a working table, and so crawl logic
//! stays testable without a live database. SQL text for the fixed
//! statements is built by pure helpers here; the Postgres implementation
//! lives in [`postgres`].

pub mod postgres;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::DebtorRecord;

pub use postgres::DebtorStore;

/// Insert column order for debtor rows. `created`/`last_updated` are
/// server-assigned and never appear here.
pub(crate) const INSERT_COLUMNS: &[&str] = &[
    "hash_value",
    "debt_type_id",
    "identifier",
    "fio",
    "category",
    "provider",
    "app_num",
    "app_date",
    "procedure_start_date",
    "procedure_end_date",
    "procedure_stop_num",
    "decision_date",
    "decision_start_date",
    "stop_initiator",
    "status",
    "creditors_list",
    "debt_sum",
    "region",
];

/// Batch upsert capability, keyed by identity hash.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Persist a batch: insert new rows, refresh existing ones by hash.
    async fn upsert_batch(&self, table: &str, batch: &[DebtorRecord]) -> Result<u64>;
}

/// Reject any table identifier that is not a plain lowercase SQL name.
///
/// Table names here are fixed or derived from configuration, never user
/// input, but DDL interpolates them into statements, so the interface
/// still refuses unexpected identifiers.
pub fn validate_identifier(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_lowercase() || first == '_' => {
            chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(AppError::config(format!("invalid table identifier '{name}'")))
    }
}

/// `ON CONFLICT` clause refreshing every business field plus the
/// last-updated timestamp; `created` is deliberately left alone.
pub(crate) fn upsert_conflict_clause() -> String {
    let updates = INSERT_COLUMNS
        .iter()
        .filter(|column| **column != "hash_value")
        .map(|column| format!("{column} = EXCLUDED.{column}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(" ON CONFLICT (hash_value) DO UPDATE SET {updates}, last_updated = now()")
}

/// Variant-scoped stale-row delete with a strict cutoff comparison.
pub(crate) fn reap_statement(table: &str) -> String {
    format!("DELETE FROM {table} WHERE debt_type_id = $1 AND last_updated < $2")
}

/// The three statements of the atomic table swap, in execution order.
pub(crate) fn swap_statements(base: &str, shadow: &str, backup: &str) -> [String; 3] {
    [
        format!("ALTER TABLE {base} RENAME TO {backup}"),
        format!("ALTER TABLE {shadow} RENAME TO {base}"),
        format!("DROP TABLE {backup}"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_validation() {
        assert!(validate_identifier("debtor").is_ok());
        assert!(validate_identifier("debtor_shadow").is_ok());
        assert!(validate_identifier("_tmp2").is_ok());

        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("2fast").is_err());
        assert!(validate_identifier("Debtor").is_err());
        assert!(validate_identifier("debtor; DROP TABLE debtor").is_err());
        assert!(validate_identifier("debtor-shadow").is_err());
    }

    #[test]
    fn conflict_clause_refreshes_fields_but_not_created() {
        let clause = upsert_conflict_clause();
        assert!(clause.starts_with(" ON CONFLICT (hash_value) DO UPDATE SET"));
        assert!(clause.contains("status = EXCLUDED.status"));
        assert!(clause.contains("debt_sum = EXCLUDED.debt_sum"));
        assert!(clause.ends_with("last_updated = now()"));
        assert!(!clause.contains("created ="));
        assert!(!clause.contains("hash_value = EXCLUDED"));
    }

    #[test]
    fn reap_cutoff_is_strict_and_variant_scoped() {
        assert_eq!(
            reap_statement("debtor"),
            "DELETE FROM debtor WHERE debt_type_id = $1 AND last_updated < $2"
        );
    }

    #[test]
    fn swap_renames_base_away_before_promoting_shadow() {
        let [first, second, third] = swap_statements("debtor", "debtor_shadow", "debtor_old");
        assert_eq!(first, "ALTER TABLE debtor RENAME TO debtor_old");
        assert_eq!(second, "ALTER TABLE debtor_shadow RENAME TO debtor");
        assert_eq!(third, "DROP TABLE debtor_old");
    }

    #[test]
    fn insert_columns_match_record_shape() {
        assert_eq!(INSERT_COLUMNS.len(), 18);
        assert!(INSERT_COLUMNS.contains(&"hash_value"));
        assert!(!INSERT_COLUMNS.contains(&"created"));
        assert!(!INSERT_COLUMNS.contains(&"last_updated"));
    }
}
