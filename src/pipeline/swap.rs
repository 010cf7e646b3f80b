// src/pipeline/swap.rs

//! Shadow-table swap for full dataset replacement.
//!
//! A full-replace run crawls into a working copy of the base table and
//! promotes it in one atomic rename cycle, so readers of the base table
//! never observe a partially populated dataset. The reaper is not involved:
//! the old table is discarded wholesale.

use std::fmt;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{RunState, Variant};
use crate::pipeline::crawl::crawl_variant;
use crate::storage::DebtorStore;
use crate::utils::http::Fetcher;

/// States of a full-replace run. `Failed` is reachable from any of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapState {
    Prepare,
    Populate,
    Validate,
    Swap,
    Cleanup,
    Failed,
}

impl fmt::Display for SwapState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Prepare => "PREPARE",
            Self::Populate => "POPULATE",
            Self::Validate => "VALIDATE",
            Self::Swap => "SWAP",
            Self::Cleanup => "CLEANUP",
            Self::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// Working-table name for a base table.
pub(crate) fn shadow_table(base: &str) -> String {
    format!("{base}_shadow")
}

/// Backup name the base table briefly holds during the swap transaction.
pub(crate) fn backup_table(base: &str) -> String {
    format!("{base}_old")
}

/// Full-replace run: crawl the variant into a shadow table and swap it in.
///
/// On any failure the original base table is left untouched and correctly
/// named (the swap transaction rolls back in full) and the working table is
/// dropped, so no intermediate state survives.
pub async fn run_swap(
    config: &Config,
    store: &DebtorStore,
    fetcher: &Fetcher,
    variant: Variant,
) -> Result<RunState> {
    let base = config.database.table.clone();
    let shadow = shadow_table(&base);
    let backup = backup_table(&base);

    match drive(config, store, fetcher, variant, &base, &shadow, &backup).await {
        Ok(run) => Ok(run),
        Err(err) => {
            log::error!("[{}] full-replace run failed: {err}", SwapState::Failed);
            if let Err(cleanup_err) = store.drop_table_if_exists(&shadow).await {
                log::warn!("could not drop working table {shadow}: {cleanup_err}");
            }
            Err(err)
        }
    }
}

async fn drive(
    config: &Config,
    store: &DebtorStore,
    fetcher: &Fetcher,
    variant: Variant,
    base: &str,
    shadow: &str,
    backup: &str,
) -> Result<RunState> {
    log::info!("[{}] recreating working table {shadow}", SwapState::Prepare);
    store.drop_table_if_exists(shadow).await?;
    store.create_table_like(shadow, base).await?;

    log::info!("[{}] crawling type_id {} into {shadow}", SwapState::Populate, variant.id());
    let (_completed, run) = crawl_variant(fetcher, store, shadow, variant, &config.crawler).await?;

    log::info!("[{}] checking base and working tables", SwapState::Validate);
    if !store.table_exists(base).await? {
        return Err(AppError::validation(format!(
            "base table {base} is missing; aborting swap"
        )));
    }
    if !store.table_exists(shadow).await? {
        return Err(AppError::validation(format!(
            "working table {shadow} is missing; aborting swap"
        )));
    }

    log::info!("[{}] promoting {shadow} to {base}", SwapState::Swap);
    store.swap_tables(base, shadow, backup).await?;

    log::info!("[{}] nothing to do", SwapState::Cleanup);
    Ok(run)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn working_table_names_derive_from_base() {
        assert_eq!(shadow_table("debtor"), "debtor_shadow");
        assert_eq!(backup_table("debtor"), "debtor_old");
    }

    #[test]
    fn state_labels_render_for_logging() {
        assert_eq!(SwapState::Prepare.to_string(), "PREPARE");
        assert_eq!(SwapState::Swap.to_string(), "SWAP");
        assert_eq!(SwapState::Failed.to_string(), "FAILED");
    }
}
